//! Declarative schema validation for JSON objects
//!
//! A schema names each allowed field with a type and a required flag,
//! and may nest schemas under a field. Candidates are checked three ways:
//! unknown fields, missing required fields, and type mismatches.
//!
//! # Design Principles
//!
//! - Leaf descriptors and nested schemas are an explicit tagged union
//! - Ambiguous nodes are rejected when the schema is parsed
//! - Null values are never type checked
//! - Structural failures are reported, not raised

mod analysis;
mod errors;
mod loader;
mod types;
mod validator;

pub use analysis::{
    check_fields, check_required, check_types, AnalysisReport, CheckOutcome, ValidationReport,
};
pub use errors::{SchemaError, SchemaResult};
pub use loader::SchemaLoader;
pub use types::{FieldDescriptor, ParsedSchema, SchemaDefinition, SchemaNode, TypeTag};
pub use validator::{SchemaState, SchemaValidator, SCHEMA_INVALID};
