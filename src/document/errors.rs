//! Document error types
//!
//! Error codes:
//! - DOCBIND_NO_FILENAME
//! - DOCBIND_DOCUMENT_NOT_FOUND
//! - DOCBIND_DOCUMENT_PARSE_ERROR
//! - DOCBIND_NO_SCHEMA
//!
//! Container, schema, codec and storage errors pass through with their
//! own codes.

use thiserror::Error;

use crate::codec::CodecError;
use crate::container::ContainerError;
use crate::file_storage::StorageError;
use crate::schema::SchemaError;

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Document errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("No filename has been set")]
    NoFilename,

    #[error("The file {0} doesn't exist!")]
    DocumentNotFound(String),

    #[error("Can not read {0}, not valid JSON")]
    DocumentParseError(String),

    #[error("No validation schema has been defined")]
    NoSchema,

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DocumentError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DocumentError::NoFilename => "DOCBIND_NO_FILENAME",
            DocumentError::DocumentNotFound(_) => "DOCBIND_DOCUMENT_NOT_FOUND",
            DocumentError::DocumentParseError(_) => "DOCBIND_DOCUMENT_PARSE_ERROR",
            DocumentError::NoSchema => "DOCBIND_NO_SCHEMA",
            DocumentError::Container(e) => e.code(),
            DocumentError::Schema(e) => e.code(),
            DocumentError::Codec(e) => e.code(),
            DocumentError::Storage(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(DocumentError::NoFilename.to_string(), "No filename has been set");
        assert_eq!(
            DocumentError::DocumentNotFound("foobar.json".into()).to_string(),
            "The file foobar.json doesn't exist!"
        );
        assert_eq!(
            DocumentError::DocumentParseError("bad.json".into()).to_string(),
            "Can not read bad.json, not valid JSON"
        );
        assert_eq!(
            DocumentError::NoSchema.to_string(),
            "No validation schema has been defined"
        );
    }

    #[test]
    fn test_wrapped_codes_pass_through() {
        let err: DocumentError = CodecError::SerializationMisconfigured.into();
        assert_eq!(err.code(), "DOCBIND_SERIALIZATION_MISCONFIGURED");
        assert_eq!(
            err.to_string(),
            "Can not serialize data missing either serializer or deserializer"
        );

        let err: DocumentError = SchemaError::SchemaNotFound("s.json".into()).into();
        assert_eq!(err.code(), "DOCBIND_SCHEMA_NOT_FOUND");
    }
}
