#[derive(Debug, thiserror::Error)]
pub enum DebateError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("debate cancelled")]
    Cancelled,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("stream interrupted: {0}")]
    Stream(String),
}
