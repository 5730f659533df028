use thiserror::Error;

/// Everything that can go wrong between sending a request and holding a
/// decoded response.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("prediction service unavailable: {0}")]
    Unavailable(String),
    #[error("invalid endpoint path '{path}': {source}")]
    InvalidEndpoint {
        path: String,
        source: url::ParseError,
    },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("{endpoint} returned an unreadable body: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
}

impl PredictionError {
    /// Short tag used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::Unavailable(_) => "unavailable",
            PredictionError::InvalidEndpoint { .. } => "invalid_endpoint",
            PredictionError::Transport { .. } => "transport",
            PredictionError::Status { .. } => "status",
            PredictionError::Decode { .. } => "decode",
        }
    }
}
