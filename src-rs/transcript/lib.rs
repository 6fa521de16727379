pub mod types;
pub mod viewer;

pub use types::{terminal_outcome, Timestamp, TranscriptEntry, TranscriptPage};
pub use viewer::{StopReason, TranscriptViewer, ViewerSnapshot};
