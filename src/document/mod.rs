//! # JSON Documents
//!
//! An observable container loaded from and saved to a JSON file, with
//! optional schema validation.

mod config;
mod errors;
mod json_document;

pub use config::DocumentConfig;
pub use errors::{DocumentError, DocumentResult};
pub use json_document::JsonDocument;
