//! Error types for pioneer-state

use std::fmt;

/// Result type for pioneer-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur while refreshing device state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The receiver could not be reached; the refresh cycle was skipped
    Connection(String),

    /// Error from pioneer-api
    Api(pioneer_api::ApiError),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Connection(msg) => write!(f, "Connection failed: {}", msg),
            StateError::Api(err) => write!(f, "API error: {}", err),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<pioneer_api::ApiError> for StateError {
    fn from(err: pioneer_api::ApiError) -> Self {
        match err {
            pioneer_api::ApiError::NetworkError(msg) => StateError::Connection(msg),
            pioneer_api::ApiError::Timeout => StateError::Connection("connect timed out".to_string()),
            other => StateError::Api(other),
        }
    }
}
