use serde_json::Value;

/// A search call that did not produce a usable page.
///
/// Network errors, timeouts, non-success HTTP statuses, undecodable bodies and
/// `ack=Failure` envelopes all end up here. `payload` keeps whatever raw JSON the
/// service sent back, when there was any.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct SearchFailure {
    pub message: String,
    pub payload: Option<Value>,
}

impl SearchFailure {
    pub fn new(message: impl Into<String>) -> Self {
        SearchFailure {
            message: message.into(),
            payload: None,
        }
    }

    pub fn with_payload(message: impl Into<String>, payload: Value) -> Self {
        SearchFailure {
            message: message.into(),
            payload: Some(payload),
        }
    }
}

impl From<reqwest::Error> for SearchFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchFailure::new(format!("Request timed out: {}", err))
        } else {
            SearchFailure::new(format!("Connection failed: {}", err))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Search failed: {0}")]
    SearchFailed(SearchFailure),

    #[error("Search failed on page {page}: {source}")]
    PageFailed { page: u32, source: SearchFailure },

    #[error("Malformed end time {value:?}: {reason}")]
    MalformedTimestamp { value: String, reason: String },

    #[error("Malformed price {0:?}")]
    MalformedPrice(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Run did not finish within {0} seconds")]
    DeadlineExceeded(u64),

    #[error("Failed to encode query: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
