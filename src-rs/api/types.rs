use async_trait::async_trait;

use crate::call_task::{CallTaskRequest, CallTaskResponse};
use crate::error::ClientError;
use crate::transcript::TranscriptEntry;

/// The two backend endpoints the client talks to.
#[async_trait]
pub trait CallTaskApi: Send + Sync {
    async fn create_call_task(&self, request: &CallTaskRequest) -> Result<CallTaskResponse, ClientError>;

    async fn fetch_transcripts(&self, call_id: &str, limit: usize) -> Result<Vec<TranscriptEntry>, ClientError>;
}
