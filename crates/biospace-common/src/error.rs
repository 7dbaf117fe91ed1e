use thiserror::Error;

#[derive(Debug, Error)]
pub enum BiospaceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BiospaceError>;
