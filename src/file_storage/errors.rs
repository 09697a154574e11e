//! # File Storage Errors

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// File storage errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl StorageError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::ObjectNotFound(_) => "DOCBIND_STORAGE_NOT_FOUND",
            StorageError::InvalidPath(_) => "DOCBIND_STORAGE_INVALID_PATH",
            StorageError::IoError(_) => "DOCBIND_STORAGE_IO_ERROR",
        }
    }

    pub(crate) fn from_io(path: &str, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            StorageError::ObjectNotFound(path.to_string())
        } else {
            StorageError::IoError(e.to_string())
        }
    }
}
