use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Receiver unreachable: {0}")]
    Unreachable(String),

    #[error("State management error: {0}")]
    StateError(pioneer_state::StateError),

    #[error("API error: {0}")]
    ApiError(#[from] pioneer_api::ApiError),
}

impl From<pioneer_state::StateError> for SdkError {
    fn from(error: pioneer_state::StateError) -> Self {
        match error {
            pioneer_state::StateError::Connection(msg) => SdkError::Unreachable(msg),
            other => SdkError::StateError(other),
        }
    }
}
