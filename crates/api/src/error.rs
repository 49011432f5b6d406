#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("invalid API url: {0}")]
    InvalidUrl(String),

    #[error("{context} (Status: {status})")]
    Status { context: &'static str, status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Location not found for TIPLOC: {0}")]
    NotFound(String),

    #[error("response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether retrying the same request might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
