use thiserror::Error;

/// Error type that captures storage and configuration failures.
///
/// These never cross the store boundary: [`crate::storage::Persistence`]
/// logs and absorbs them.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
