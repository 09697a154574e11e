//! # Event Errors
//!
//! Usage errors raised while binding, unbinding or triggering events.

use thiserror::Error;

/// Result type for emitter operations
pub type EventResult<T> = Result<T, EventError>;

/// Emitter errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// A required argument (event name) was missing or unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not possible between these emitters
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl EventError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            EventError::InvalidArgument(_) => "DOCBIND_INVALID_ARGUMENT",
            EventError::InvalidOperation(_) => "DOCBIND_INVALID_OPERATION",
        }
    }

    pub(crate) fn event_required() -> Self {
        EventError::InvalidArgument("Event is required".into())
    }
}
