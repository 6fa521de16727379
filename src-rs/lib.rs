pub mod app;
pub mod config;
pub mod error;
pub mod helpers;

#[path = "api/lib.rs"]
pub mod api;
#[path = "call_task/lib.rs"]
pub mod call_task;
#[path = "transcript/lib.rs"]
pub mod transcript;

pub use app::App;
pub use config::{ClientConfig, PollSettings};
pub use error::ClientError;
