//! Schema validator
//!
//! Lifecycle: unloaded → loaded → parsed.
//! - `load_schema` reads the definition once and caches it
//! - `parse_schema` flattens it into rules once
//! - `validate` drives both on demand, then checks a candidate
//!
//! Structural mismatches are not errors. They yield `false` and raise
//! `schema.invalid` carrying the full report.

use std::sync::Arc;

use serde_json::Value;

use super::analysis::{AnalysisReport, ValidationReport};
use super::errors::{SchemaError, SchemaResult};
use super::loader::SchemaLoader;
use super::types::{ParsedSchema, SchemaDefinition};
use crate::events::{EventEmitter, Eventful};
use crate::file_storage::StorageBackend;
use crate::observability::{log_event, null_logger, Event, Logger};

/// Event raised when a candidate fails validation
pub const SCHEMA_INVALID: &str = "schema.invalid";

/// Where a validator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Unloaded,
    Loaded,
    Parsed,
}

/// Validates JSON objects against a declarative schema.
pub struct SchemaValidator {
    emitter: EventEmitter,
    loader: Option<SchemaLoader>,
    definition: Option<SchemaDefinition>,
    rules: Option<ParsedSchema>,
    logger: Arc<dyn Logger>,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("location", &self.location())
            .field("state", &self.state())
            .finish()
    }
}

impl SchemaValidator {
    /// Validator for the schema stored at `location`.
    pub fn new(
        location: impl Into<String>,
        backend: Arc<dyn StorageBackend>,
    ) -> SchemaResult<Self> {
        Ok(Self {
            emitter: EventEmitter::new(),
            loader: Some(SchemaLoader::new(location, backend)?),
            definition: None,
            rules: None,
            logger: null_logger(),
        })
    }

    /// Validator over an in-memory definition; starts out loaded.
    pub fn from_definition(definition: SchemaDefinition) -> Self {
        Self {
            emitter: EventEmitter::new(),
            loader: None,
            definition: Some(definition),
            rules: None,
            logger: null_logger(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn location(&self) -> Option<&str> {
        self.loader.as_ref().map(SchemaLoader::location)
    }

    pub fn state(&self) -> SchemaState {
        match (&self.definition, &self.rules) {
            (_, Some(_)) => SchemaState::Parsed,
            (Some(_), None) => SchemaState::Loaded,
            (None, None) => SchemaState::Unloaded,
        }
    }

    /// Load the definition, or return the cached one.
    pub fn load_schema(&mut self) -> SchemaResult<&SchemaDefinition> {
        if self.definition.is_none() {
            let loader = self
                .loader
                .as_ref()
                .ok_or_else(|| SchemaError::InvalidArgument("A Json Schema is required".into()))?;

            match loader.load() {
                Ok(definition) => {
                    log_event(
                        self.logger.as_ref(),
                        Event::SchemaLoaded,
                        &[("location", loader.location())],
                    );
                    self.definition = Some(definition);
                }
                Err(e) => {
                    log_event(
                        self.logger.as_ref(),
                        Event::SchemaLoadFailed,
                        &[("location", loader.location()), ("error", e.code())],
                    );
                    return Err(e);
                }
            }
        }

        self.definition
            .as_ref()
            .ok_or_else(|| SchemaError::InvalidArgument("A Json Schema is required".into()))
    }

    /// Flatten the definition into rules. Runs once; later calls are no-ops.
    pub fn parse_schema(&mut self) -> SchemaResult<&ParsedSchema> {
        if self.rules.is_none() {
            let parsed = ParsedSchema::from_definition(self.load_schema()?);
            let required = parsed.required.len().to_string();
            let optional = parsed.optional.len().to_string();
            log_event(
                self.logger.as_ref(),
                Event::SchemaParsed,
                &[("required", &required), ("optional", &optional)],
            );
            self.rules = Some(parsed);
        }

        self.rules
            .as_ref()
            .ok_or_else(|| SchemaError::InvalidArgument("A Json Schema is required".into()))
    }

    /// Flattened field names and runtime types of `candidate`.
    pub fn analyse(&self, candidate: &Value) -> SchemaResult<AnalysisReport> {
        AnalysisReport::of(candidate)
    }

    /// Run every check and return the full report.
    ///
    /// The schema is loaded and parsed before the candidate is analysed.
    /// A failing report is also raised as `schema.invalid`.
    pub fn validate_report(&mut self, candidate: &Value) -> SchemaResult<ValidationReport> {
        let rules = self.parse_schema()?;
        let analysis = AnalysisReport::of(candidate)?;
        let report = ValidationReport::check(rules, &analysis);

        let valid = report.valid.to_string();
        let errors = report.errors().count().to_string();
        log_event(
            self.logger.as_ref(),
            Event::SchemaValidateReport,
            &[("valid", &valid), ("errors", &errors)],
        );

        if !report.valid {
            log_event(self.logger.as_ref(), Event::SchemaInvalid, &[("errors", &errors)]);
            self.emitter.trigger(SCHEMA_INVALID, &[report.to_value()])?;
        }

        Ok(report)
    }

    pub fn validate(&mut self, candidate: &Value) -> SchemaResult<bool> {
        Ok(self.validate_report(candidate)?.valid)
    }

    pub fn invalid(&mut self, candidate: &Value) -> SchemaResult<bool> {
        Ok(!self.validate(candidate)?)
    }
}

impl Eventful for SchemaValidator {
    fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_storage::MemoryBackend;
    use crate::observability::MemoryLogger;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    const SCHEMA: &str = r#"{
        "name": {"type": "string", "required": true},
        "e": {"aa": {"type": "*"}}
    }"#;

    fn validator() -> SchemaValidator {
        let backend = Arc::new(MemoryBackend::new().with_file("schema.json", SCHEMA));
        SchemaValidator::new("schema.json", backend).unwrap()
    }

    #[test]
    fn test_state_machine() {
        let mut v = validator();
        assert_eq!(v.state(), SchemaState::Unloaded);

        v.load_schema().unwrap();
        assert_eq!(v.state(), SchemaState::Loaded);

        v.parse_schema().unwrap();
        assert_eq!(v.state(), SchemaState::Parsed);

        v.parse_schema().unwrap();
        assert_eq!(v.state(), SchemaState::Parsed);
    }

    #[test]
    fn test_load_is_cached() {
        let backend = Arc::new(MemoryBackend::new().with_file("schema.json", SCHEMA));
        let mut v = SchemaValidator::new("schema.json", backend.clone()).unwrap();
        let first = v.load_schema().unwrap().clone();

        backend.write_all("schema.json", b"{}").unwrap();
        assert_eq!(v.load_schema().unwrap(), &first);
    }

    #[test]
    fn test_missing_schema() {
        let backend = Arc::new(MemoryBackend::new());
        let mut v = SchemaValidator::new("foobar.json", backend).unwrap();
        let err = v.validate(&json!({})).unwrap_err();
        assert_eq!(err.to_string(), "The schema foobar.json doesn't exist");
        assert_eq!(v.state(), SchemaState::Unloaded);
    }

    #[test]
    fn test_validate_examples() {
        let mut v = validator();
        assert!(v.validate(&json!({"name": "x", "e": {"aa": 1}})).unwrap());

        let report = v.validate_report(&json!({"name": 1})).unwrap();
        assert!(!report.valid);
        assert!(report.types.iter().any(|m| m.contains("name")));

        let report = v.validate_report(&json!({})).unwrap();
        assert!(!report.valid);
        assert_eq!(report.required, vec!["REQUIRED field name is missing"]);
    }

    #[test]
    fn test_null_values_are_exempt() {
        let mut v = validator();
        assert!(v.validate(&json!({"name": null})).unwrap());
    }

    #[test]
    fn test_invalid_negates_validate() {
        let mut v = validator();
        for candidate in [json!({"name": "x"}), json!({"name": 2}), json!({"zz": 1}), json!({})] {
            let valid = v.validate(&candidate).unwrap();
            assert_eq!(v.invalid(&candidate).unwrap(), !valid);
        }
    }

    #[test]
    fn test_rejects_non_objects() {
        let mut v = validator();
        let err = v.validate(&json!("some string")).unwrap_err();
        assert!(err.to_string().contains("Schema can only validate Objects"));
        assert!(v.validate(&json!([1])).is_err());
        assert_eq!(v.state(), SchemaState::Parsed);
    }

    #[test]
    fn test_schema_errors_come_before_candidate_errors() {
        let mut v = SchemaValidator::new("missing.json", Arc::new(MemoryBackend::new())).unwrap();
        let err = v.validate(&json!("not an object")).unwrap_err();
        assert_eq!(err.code(), "DOCBIND_SCHEMA_NOT_FOUND");

        let backend = Arc::new(MemoryBackend::new().with_file("bad.json", "{ broken"));
        let mut v = SchemaValidator::new("bad.json", backend).unwrap();
        let err = v.validate(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, SchemaError::SchemaParseError { .. }));
    }

    #[test]
    fn test_invalid_event_carries_report() {
        let mut v = validator();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        v.on(SCHEMA_INVALID, move |args| sink.borrow_mut().push(args[0].clone()))
            .unwrap();

        v.validate(&json!({"name": "ok"})).unwrap();
        assert!(seen.borrow().is_empty());

        v.validate(&json!({"name": "ok", "extra": 1})).unwrap();
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["valid"], json!(false));
        assert_eq!(seen[0]["fields"], json!(["extra is not allowed"]));
        assert_eq!(seen[0]["required"], json!([]));
        assert_eq!(seen[0]["types"], json!([]));
    }

    #[test]
    fn test_from_definition_starts_loaded() {
        let def = SchemaDefinition::from_value(&json!({"a": {"type": "number"}})).unwrap();
        let mut v = SchemaValidator::from_definition(def);
        assert_eq!(v.state(), SchemaState::Loaded);
        assert_eq!(v.location(), None);
        assert!(v.validate(&json!({"a": 3})).unwrap());
        assert!(!v.validate(&json!({"a": "3"})).unwrap());
    }

    #[test]
    fn test_logs_lifecycle() {
        let logger = Arc::new(MemoryLogger::new());
        let mut v = validator().with_logger(logger.clone());
        v.validate(&json!({"name": 5})).unwrap();

        assert!(logger.contains_event("SCHEMA_LOADED"));
        assert!(logger.contains_event("SCHEMA_PARSED"));
        assert!(logger.contains_event("SCHEMA_INVALID"));
    }
}
