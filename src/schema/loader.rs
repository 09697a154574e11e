//! Schema loader
//!
//! Reads a schema definition from a storage backend:
//! - The location must exist before any read is attempted
//! - The file must be JSON
//! - Missing and malformed files are reported as distinct errors

use std::sync::Arc;

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::types::SchemaDefinition;
use crate::file_storage::StorageBackend;

/// Reads schema files through a storage backend.
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    location: String,
    backend: Arc<dyn StorageBackend>,
}

impl SchemaLoader {
    /// Creates a loader for the schema at `location`.
    pub fn new(
        location: impl Into<String>,
        backend: Arc<dyn StorageBackend>,
    ) -> SchemaResult<Self> {
        let location = location.into();
        if location.is_empty() {
            return Err(SchemaError::InvalidArgument("A Json Schema is required".into()));
        }
        Ok(Self { location, backend })
    }

    /// Returns the schema location.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns true if the schema file exists.
    pub fn exists(&self) -> bool {
        self.backend.exists(&self.location)
    }

    /// Reads and decodes the raw schema JSON.
    pub fn load_raw(&self) -> SchemaResult<Value> {
        if !self.exists() {
            return Err(SchemaError::SchemaNotFound(self.location.clone()));
        }

        let content = self.backend.read_all(&self.location).map_err(|e| {
            SchemaError::SchemaParseError {
                location: self.location.clone(),
                reason: format!("Failed to read file: {}", e),
            }
        })?;

        serde_json::from_slice(&content).map_err(|e| SchemaError::SchemaParseError {
            location: self.location.clone(),
            reason: format!("Invalid JSON: {}", e),
        })
    }

    /// Reads, decodes and classifies the schema definition.
    pub fn load(&self) -> SchemaResult<SchemaDefinition> {
        SchemaDefinition::from_value(&self.load_raw()?)
    }
}
