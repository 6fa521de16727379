pub mod form;
pub mod types;

pub use form::{CallTaskForm, FormError, FormField};
pub use types::{CallTaskRequest, CallTaskResponse, DEFAULT_FALLBACK_CONDITIONS, PENDING_STATUS};
