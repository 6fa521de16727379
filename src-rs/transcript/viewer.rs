use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::types::{terminal_outcome, TranscriptEntry};
use crate::api::CallTaskApi;
use crate::config::PollSettings;

#[derive(Clone, Debug, PartialEq)]
pub enum StopReason {
    Outcome(String),
    TooManyFailures(u32),
}

/// What the transcript view shows at one point in time.
#[derive(Clone, Debug)]
pub struct ViewerSnapshot {
    pub call_id: String,
    pub items: Vec<TranscriptEntry>,
    pub error: Option<String>,
    pub live: bool,
    pub fetches: u64,
    pub consecutive_failures: u32,
    pub stopped: Option<StopReason>,
}

impl ViewerSnapshot {
    fn new(call_id: &str) -> Self {
        Self {
            call_id: call_id.to_string(),
            items: Vec::new(),
            error: None,
            live: true,
            fetches: 0,
            consecutive_failures: 0,
            stopped: None,
        }
    }
}

/// Polls the transcript of one call in the background until a terminal
/// outcome shows up or the viewer is unmounted.
///
/// Dropping the viewer aborts the poll task; `unmount` does the same and also
/// waits for the task to be gone. An in-flight fetch is abandoned either way.
pub struct TranscriptViewer {
    call_id: String,
    state: watch::Receiver<ViewerSnapshot>,
    task: Option<JoinHandle<()>>,
}

impl TranscriptViewer {
    /// Starts polling for `call_id`. A blank id mounts nothing.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(call_id: &str, api: Arc<dyn CallTaskApi>, settings: PollSettings) -> Option<Self> {
        if call_id.trim().is_empty() {
            return None;
        }
        let (tx, rx) = watch::channel(ViewerSnapshot::new(call_id));
        tracing::debug!(call_id, interval_ms = settings.interval.as_millis() as u64, "mounting transcript viewer");
        let task = tokio::spawn(poll_loop(call_id.to_string(), api, settings, tx));
        Some(Self {
            call_id: call_id.to_string(),
            state: rx,
            task: Some(task),
        })
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn snapshot(&self) -> ViewerSnapshot {
        self.state.borrow().clone()
    }

    pub fn is_live(&self) -> bool {
        self.state.borrow().live
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewerSnapshot> {
        self.state.clone()
    }

    /// Resolves once polling has stopped on its own.
    pub async fn wait_until_settled(&self) -> ViewerSnapshot {
        let mut rx = self.state.clone();
        if let Ok(snap) = rx.wait_for(|snap| !snap.live).await {
            return snap.clone();
        }
        let snap = rx.borrow().clone();
        snap
    }

    pub async fn unmount(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        tracing::debug!(call_id = %self.call_id, "transcript viewer unmounted");
    }
}

impl Drop for TranscriptViewer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn poll_loop(
    call_id: String,
    api: Arc<dyn CallTaskApi>,
    settings: PollSettings,
    tx: watch::Sender<ViewerSnapshot>,
) {
    let max_failures = settings.max_consecutive_failures.filter(|max| *max > 0);
    // First tick fires immediately, which gives the initial load.
    let mut ticker = tokio::time::interval(settings.interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Each fetch is awaited before the next tick, so requests never overlap.
    loop {
        ticker.tick().await;
        match api.fetch_transcripts(&call_id, settings.limit).await {
            Ok(items) => {
                let outcome = terminal_outcome(&items).map(str::to_string);
                let count = items.len();
                tx.send_modify(|snap| {
                    snap.items = items;
                    snap.fetches += 1;
                    snap.consecutive_failures = 0;
                    if let Some(outcome) = &outcome {
                        snap.live = false;
                        snap.stopped = Some(StopReason::Outcome(outcome.clone()));
                    }
                });
                if let Some(outcome) = outcome {
                    tracing::info!(call_id = %call_id, outcome = %outcome, entries = count, "call reached a terminal outcome; polling stopped");
                    return;
                }
            }
            Err(err) => {
                let message = err.fetch_message();
                let mut give_up = false;
                let mut streak = 0;
                tx.send_modify(|snap| {
                    snap.error = Some(message);
                    snap.fetches += 1;
                    snap.consecutive_failures += 1;
                    if let Some(max) = max_failures {
                        if snap.consecutive_failures >= max {
                            snap.live = false;
                            snap.stopped = Some(StopReason::TooManyFailures(snap.consecutive_failures));
                            give_up = true;
                        }
                    }
                    streak = snap.consecutive_failures;
                });
                if streak == 1 {
                    tracing::warn!(call_id = %call_id, error = %err, "transcript fetch failed");
                } else {
                    tracing::debug!(call_id = %call_id, error = %err, failures = streak, "transcript fetch failed again");
                }
                if give_up {
                    tracing::warn!(call_id = %call_id, "too many consecutive transcript failures; polling stopped");
                    return;
                }
            }
        }
    }
}
