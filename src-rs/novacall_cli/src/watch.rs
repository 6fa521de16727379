use novacall_rs::transcript::{TranscriptViewer, ViewerSnapshot};

use crate::render::{self, TranscriptPrinter};

/// Prints transcript updates until the call settles or the user presses Ctrl-C.
///
/// Returns the last snapshot seen. Ctrl-C only stops following; the viewer
/// keeps polling until its owner unmounts it.
pub async fn follow(viewer: &TranscriptViewer) -> ViewerSnapshot {
    let mut rx = viewer.subscribe();
    let mut printer = TranscriptPrinter::new();
    loop {
        let snap = rx.borrow_and_update().clone();
        for line in printer.update(&snap) {
            render::info(&line);
        }
        if !snap.live {
            return snap;
        }
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return snap;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                render::info("stopped following");
                return snap;
            }
        }
    }
}
