use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a name is parsed without passing `DeviceIdentifier::is_valid` first.
    #[error("invalid BSD device identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
