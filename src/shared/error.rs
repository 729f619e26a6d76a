use super::config::ConfigError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// No response from the remote store (connection refused, timeout, DNS).
    Network(String),
    /// The remote store answered with a non-success status.
    RemoteRejected { status: u16, context: String },
    /// The remote store answered, but the body was not what the protocol promises.
    MalformedResponse(String),
    NotFound(String),
    /// A create/update submission is already running.
    Busy(String),
    Storage(String),
    ValidationError(String),
    ConfigurationError(String),
    SerializationError(String),
    DeserializationError(String),
    Internal(String),
}

impl AppError {
    /// Failures of a remote call, which roll the optimistic change back.
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            AppError::Network(_)
                | AppError::RemoteRejected { .. }
                | AppError::MalformedResponse(_)
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::RemoteRejected { status, context } => {
                write!(f, "Remote rejected {} with status {}", context, status)
            }
            AppError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Busy(msg) => write!(f, "Busy: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppError::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::MalformedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            AppError::RemoteRejected {
                status: status.as_u16(),
                context: err.url().map(|url| url.to_string()).unwrap_or_default(),
            }
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            AppError::DeserializationError(err.to_string())
        } else {
            AppError::SerializationError(err.to_string())
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::ConfigurationError(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Internal(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
