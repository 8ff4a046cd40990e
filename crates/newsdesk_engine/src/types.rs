use newsdesk_core::SearchFailure;
use thiserror::Error;

/// Classified search failure plus the detail worth logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct SearchError {
    pub kind: SearchFailure,
    pub message: String,
}

impl SearchError {
    pub(crate) fn new(kind: SearchFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("auth transport error: {0}")]
    Transport(String),
    #[error("auth endpoint returned status {0}")]
    Status(u16),
    #[error("auth response could not be decoded: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AuthError::Decode(err.to_string())
        } else {
            AuthError::Transport(err.to_string())
        }
    }
}
