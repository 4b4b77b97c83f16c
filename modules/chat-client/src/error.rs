use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Model {0} returned an empty reply")]
    Empty(String),

    #[error("No chat models configured")]
    NoModels,
}

impl ChatError {
    /// The model is missing or off-limits for this key; another one might work.
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, ChatError::Api { status: 403 | 404, .. })
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Parse(err.to_string())
    }
}
