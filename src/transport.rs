use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use tracing::debug;

use crate::error::TransportError;
use crate::request::DebateRequest;

/// Byte chunks as the transport delivers them. Chunk boundaries are
/// arbitrary and carry no framing information.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, TransportError>> + Send>>;

/// Opens the debate stream. One request in, one live byte stream out.
/// No retries, no state.
#[async_trait]
pub trait DebateTransport: Send + Sync {
    async fn open(&self, request: &DebateRequest) -> Result<ByteStream, TransportError>;
}

/// Blanket impl so `Box<dyn DebateTransport>` can be passed directly to
/// `DebateClient::new()`.
#[async_trait]
impl DebateTransport for Box<dyn DebateTransport> {
    async fn open(&self, request: &DebateRequest) -> Result<ByteStream, TransportError> {
        (**self).open(request).await
    }
}

/// HTTP client for the writing-assistant backend's debate endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Connect to the locally bundled backend at its default address.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "http://127.0.0.1:8765".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Supply a preconfigured client; timeout policy lives there.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DebateTransport for HttpTransport {
    async fn open(&self, request: &DebateRequest) -> Result<ByteStream, TransportError> {
        let resp = self
            .client
            .post(format!("{}/api/debate/start", self.base_url))
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_else(|_| "<no body>".into());
            return Err(TransportError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "debate stream open");
        let stream = resp.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| TransportError::Stream(e.to_string()))
        });
        Ok(Box::pin(stream))
    }
}
