//! Jarvis Error Types
//!
//! Centralized error handling for adapters, stores and engines.

use thiserror::Error;

/// Central error type for Jarvis
#[derive(Error, Debug)]
pub enum JarvisError {
    #[error("Speech recognition error: {0}")]
    Asr(String),

    #[error("Speech synthesis error: {0}")]
    Tts(String),

    #[error("Audio capture error: {0}")]
    Audio(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{service} error: {message}")]
    Service {
        service: &'static str,
        message: String,
    },

    #[error("Desktop control error: {0}")]
    Desktop(String),

    #[error("Lock poisoned: {0}")]
    Lock(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl JarvisError {
    /// Build a service error for a remote API that answered with something unusable
    pub fn service(service: &'static str, message: impl Into<String>) -> Self {
        JarvisError::Service {
            service,
            message: message.into(),
        }
    }
}

/// Result type alias for Jarvis operations
pub type JarvisResult<T> = Result<T, JarvisError>;

/// Helper to convert Mutex poison errors
impl<T> From<std::sync::PoisonError<T>> for JarvisError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        JarvisError::Lock(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_message() {
        let err = JarvisError::service("GitHub", "403 Forbidden");
        assert_eq!(err.to_string(), "GitHub error: 403 Forbidden");
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err: JarvisError = io.into();
        assert_eq!(err.to_string(), "missing file");
    }
}
