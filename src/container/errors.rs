//! # Container Errors

use thiserror::Error;

use crate::events::EventError;

/// Result type for container operations
pub type ContainerResult<T> = Result<T, ContainerError>;

/// Container errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// A required field or key name was missing
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The field is already registered
    #[error("Field '{0}' is already registered and can't be registered again")]
    DuplicateField(String),

    /// Get or set through a name that was never registered
    #[error("Field '{0}' is not registered")]
    UnknownField(String),

    /// The other side lacks the container capability
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Raised while dispatching a field event
    #[error(transparent)]
    Event(#[from] EventError),
}

impl ContainerError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ContainerError::InvalidArgument(_) => "DOCBIND_INVALID_ARGUMENT",
            ContainerError::DuplicateField(_) => "DOCBIND_DUPLICATE_FIELD",
            ContainerError::UnknownField(_) => "DOCBIND_UNKNOWN_FIELD",
            ContainerError::InvalidOperation(_) => "DOCBIND_INVALID_OPERATION",
            ContainerError::Event(e) => e.code(),
        }
    }
}
