use telnet_client::TelnetError;
use thiserror::Error;

/// High-level API errors for Pioneer operations
///
/// These abstract away the socket details and describe the failure in terms
/// a caller controlling a receiver cares about.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network communication error
    ///
    /// The receiver refused the connection, could not be resolved or dropped
    /// the socket. Receivers recover on their own, so callers usually retry
    /// on the next cycle.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// A connect or write did not complete within its timeout
    #[error("Timed out talking to receiver")]
    Timeout,

    /// Invalid parameter value
    ///
    /// Returned before anything is sent, e.g. a slot code that is not numeric.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A sound mode name outside the supported enumeration
    #[error("Unknown sound mode: {0}")]
    UnknownSoundMode(String),

    /// An entry would break the one-to-one name/code mapping
    #[error("Mapping conflict: '{name}' -> '{code}' clashes with '{existing_name}' -> '{existing_code}'")]
    MappingConflict {
        name: String,
        code: String,
        existing_name: String,
        existing_code: String,
    },
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<TelnetError> for ApiError {
    fn from(error: TelnetError) -> Self {
        match error {
            TelnetError::Timeout => ApiError::Timeout,
            TelnetError::Connection(msg) | TelnetError::Io(msg) => ApiError::NetworkError(msg),
            TelnetError::Closed => ApiError::NetworkError("connection closed".to_string()),
        }
    }
}
