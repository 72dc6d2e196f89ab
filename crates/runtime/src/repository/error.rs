//! Failures of the save stores.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("save store lock was poisoned")]
    LockPoisoned,

    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The save document could not be serialized.
    #[error("failed to encode save: {0}")]
    Encode(String),

    /// A save file exists but is not a valid document.
    #[error("save is corrupted: {0}")]
    CorruptedSave(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
