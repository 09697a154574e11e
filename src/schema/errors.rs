//! Schema error types
//!
//! Error codes:
//! - DOCBIND_SCHEMA_NOT_FOUND
//! - DOCBIND_SCHEMA_PARSE_ERROR
//! - DOCBIND_SCHEMA_MALFORMED_NODE
//! - DOCBIND_SCHEMA_AMBIGUOUS_NODE
//! - DOCBIND_SCHEMA_UNKNOWN_TYPE
//! - DOCBIND_INVALID_ARGUMENT
//!
//! A candidate that fails validation is not an error; it is reported by
//! the validator's boolean result and the `schema.invalid` event.

use thiserror::Error;

use crate::events::EventError;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The backing schema resource does not exist
    #[error("The schema {0} doesn't exist")]
    SchemaNotFound(String),

    /// The backing schema resource could not be read or decoded
    #[error("Can not load the schema file {location}: {reason}")]
    SchemaParseError { location: String, reason: String },

    /// A node is neither a descriptor object nor a nested schema
    #[error("Malformed schema node '{field}': {reason}")]
    MalformedNode { field: String, reason: String },

    /// A descriptor that also carries child keys
    #[error("Schema node '{0}' mixes descriptor keys with child fields")]
    AmbiguousNode(String),

    /// A descriptor names a type outside the supported set
    #[error("Schema node '{field}' has unknown type '{type_name}'")]
    UnknownType { field: String, type_name: String },

    /// A required argument was missing or unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Raised while emitting `schema.invalid`
    #[error(transparent)]
    Event(#[from] EventError),
}

impl SchemaError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::SchemaNotFound(_) => "DOCBIND_SCHEMA_NOT_FOUND",
            SchemaError::SchemaParseError { .. } => "DOCBIND_SCHEMA_PARSE_ERROR",
            SchemaError::MalformedNode { .. } => "DOCBIND_SCHEMA_MALFORMED_NODE",
            SchemaError::AmbiguousNode(_) => "DOCBIND_SCHEMA_AMBIGUOUS_NODE",
            SchemaError::UnknownType { .. } => "DOCBIND_SCHEMA_UNKNOWN_TYPE",
            SchemaError::InvalidArgument(_) => "DOCBIND_INVALID_ARGUMENT",
            SchemaError::Event(e) => e.code(),
        }
    }

    /// Errors in the schema definition itself, as opposed to usage errors
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            SchemaError::SchemaParseError { .. }
                | SchemaError::MalformedNode { .. }
                | SchemaError::AmbiguousNode(_)
                | SchemaError::UnknownType { .. }
        )
    }

    pub(crate) fn objects_only() -> Self {
        SchemaError::InvalidArgument("Schema can only validate Objects".into())
    }
}
