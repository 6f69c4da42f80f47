use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;

/// Status line of a completed transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferResponse {
    pub status: StatusCode,
}

impl TransferResponse {
    pub fn new(status: StatusCode) -> Self {
        Self { status }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// e.g. "403 Forbidden"
    pub fn status_text(&self) -> String {
        self.status.to_string()
    }
}

/// HTTP client leg used to push bytes to a signed URL.
#[async_trait]
pub trait ObjectTransport: Send + Sync {
    async fn put(&self, url: &str, body: Bytes, content_type: &str) -> Result<TransferResponse>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl ObjectTransport for ReqwestTransport {
    async fn put(&self, url: &str, body: Bytes, content_type: &str) -> Result<TransferResponse> {
        let size = body.len();
        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        tracing::debug!(
            "📤 PUT {} bytes ({}) finished with status {}",
            size,
            content_type,
            response.status()
        );

        Ok(TransferResponse::new(response.status()))
    }
}
