use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, Url};

use super::types::CallTaskApi;
use crate::call_task::{CallTaskRequest, CallTaskResponse};
use crate::error::ClientError;
use crate::transcript::{TranscriptEntry, TranscriptPage};

pub struct HttpApi {
    base_url: Url,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|err| ClientError::InvalidConfig(format!("{}: {}", base_url, err)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidConfig(format!(
                "backend url cannot be a base: {}",
                base_url
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::InvalidConfig(err.to_string()))?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidConfig(format!("bad backend url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn call_tasks_url(&self) -> Result<Url, ClientError> {
        self.endpoint(&["api", "call-tasks"])
    }

    pub fn transcripts_url(&self, call_id: &str, limit: usize) -> Result<Url, ClientError> {
        let mut url = self.endpoint(&["api", "transcripts", call_id])?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        Ok(url)
    }
}

#[async_trait]
impl CallTaskApi for HttpApi {
    async fn create_call_task(&self, request: &CallTaskRequest) -> Result<CallTaskResponse, ClientError> {
        let url = self.call_tasks_url()?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(url = %url, target_phone = %request.target_phone, "creating call task");
        let resp = self
            .client
            .post(url)
            .headers(headers)
            .json(request)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        let created = resp.json::<CallTaskResponse>().await?;
        tracing::info!(call_id = %created.id, "call task created");
        Ok(created)
    }

    async fn fetch_transcripts(&self, call_id: &str, limit: usize) -> Result<Vec<TranscriptEntry>, ClientError> {
        let url = self.transcripts_url(call_id, limit)?;
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        let page = resp.json::<TranscriptPage>().await?;
        Ok(page.into_items())
    }
}

async fn ensure_success(resp: Response) -> Result<Response, ClientError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(status, body_len = body.len(), "backend returned an error status");
    Err(ClientError::Http { status, body })
}
