//! Lifecycle events logged by documents and validators.
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Schema
    /// Schema definition read and decoded
    SchemaLoaded,
    /// Schema definition could not be read or decoded
    SchemaLoadFailed,
    /// Schema definition parsed into rules
    SchemaParsed,
    /// Candidate analysed, report ready
    SchemaValidateReport,
    /// Candidate failed validation
    SchemaInvalid,

    // Document
    /// Document load begins
    DocumentLoadBegin,
    /// Document decoded and absorbed
    DocumentLoaded,
    /// Document read or decode failed
    DocumentLoadFailed,
    /// Document save begins
    DocumentSaveBegin,
    /// Document written
    DocumentSaved,
    /// Document write failed
    DocumentSaveFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaLoadFailed => "SCHEMA_LOAD_FAILED",
            Event::SchemaParsed => "SCHEMA_PARSED",
            Event::SchemaValidateReport => "SCHEMA_VALIDATE_REPORT",
            Event::SchemaInvalid => "SCHEMA_INVALID",

            Event::DocumentLoadBegin => "DOCUMENT_LOAD_BEGIN",
            Event::DocumentLoaded => "DOCUMENT_LOADED",
            Event::DocumentLoadFailed => "DOCUMENT_LOAD_FAILED",
            Event::DocumentSaveBegin => "DOCUMENT_SAVE_BEGIN",
            Event::DocumentSaved => "DOCUMENT_SAVED",
            Event::DocumentSaveFailed => "DOCUMENT_SAVE_FAILED",
        }
    }

    /// Returns true if this event records a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::SchemaLoadFailed | Event::DocumentLoadFailed | Event::DocumentSaveFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
