use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed registry archive: {0}")]
    Plist(#[from] plist::Error),

    #[error("unexpected registry archive layout: {0}")]
    UnexpectedLayout(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
