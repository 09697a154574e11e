//! JSON document
//!
//! A container backed by one JSON file, optionally checked against a
//! schema. The document's emitter is bonded to the schema's, so
//! `schema.invalid` can be observed on the document itself.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::config::DocumentConfig;
use super::errors::{DocumentError, DocumentResult};
use crate::codec::{CodecError, CodecResult, TextCodec};
use crate::container::{AsContainer, Container, ContainerError};
use crate::events::{EventEmitter, Eventful};
use crate::file_storage::StorageBackend;
use crate::observability::{log_event, Event, Logger};
use crate::schema::SchemaValidator;

/// Observable container persisted as a JSON file
pub struct JsonDocument {
    container: Container,
    filename: Option<String>,
    schema: Option<SchemaValidator>,
    codec: TextCodec,
    backend: Arc<dyn StorageBackend>,
    logger: Arc<dyn Logger>,
    loaded: bool,
}

impl fmt::Debug for JsonDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonDocument")
            .field("filename", &self.filename)
            .field("schema", &self.schema)
            .field("loaded", &self.loaded)
            .field("fields", &self.container.fields())
            .finish()
    }
}

impl JsonDocument {
    /// Create a document. A configured schema is bonded immediately but
    /// only read on first validation.
    pub fn new(
        config: DocumentConfig,
        backend: Arc<dyn StorageBackend>,
        logger: Arc<dyn Logger>,
    ) -> DocumentResult<Self> {
        let schema = match config.schema_location() {
            Some(location) => Some(
                SchemaValidator::new(location, backend.clone())?.with_logger(logger.clone()),
            ),
            None => None,
        };

        let document = Self {
            container: Container::new(),
            filename: config.filename.clone().filter(|f| !f.is_empty()),
            codec: config.codec(),
            schema,
            backend,
            logger,
            loaded: false,
        };

        if let Some(schema) = &document.schema {
            document.container.bond(schema).map_err(ContainerError::from)?;
        }

        Ok(document)
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Replace the filename. Empty names are ignored.
    pub fn set_filename(&mut self, filename: impl Into<String>) -> Option<&str> {
        let filename = filename.into();
        if !filename.is_empty() {
            self.filename = Some(filename);
        }
        self.filename()
    }

    pub fn exists(&self) -> bool {
        self.filename
            .as_deref()
            .map(|f| self.backend.exists(f))
            .unwrap_or(false)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Read the file and absorb its contents, blocking the caller.
    pub fn load_sync(&mut self) -> DocumentResult<&mut Self> {
        let filename = self.existing_filename()?;
        log_event(self.logger.as_ref(), Event::DocumentLoadBegin, &[("file", &filename)]);

        let result = self
            .backend
            .read_all(&filename)
            .map_err(DocumentError::from)
            .and_then(|bytes| self.absorb(&filename, &bytes));
        self.finish_load(&filename, result)?;
        Ok(self)
    }

    /// Read the file and absorb its contents without blocking.
    pub async fn load(&mut self) -> DocumentResult<&mut Self> {
        let filename = self.existing_filename()?;
        log_event(self.logger.as_ref(), Event::DocumentLoadBegin, &[("file", &filename)]);

        let result = match self.backend.read_all_async(&filename).await {
            Ok(bytes) => self.absorb(&filename, &bytes),
            Err(e) => Err(e.into()),
        };
        self.finish_load(&filename, result)?;
        Ok(self)
    }

    /// Serialize the data and write it to the file, blocking the caller.
    pub fn save_sync(&self) -> DocumentResult<()> {
        let filename = self.filename.clone().ok_or(DocumentError::NoFilename)?;
        log_event(self.logger.as_ref(), Event::DocumentSaveBegin, &[("file", &filename)]);

        let result = self
            .serialize()
            .and_then(|text| {
                self.backend
                    .write_all(&filename, text.as_bytes())
                    .map_err(DocumentError::from)
            });
        self.finish_save(&filename, result)
    }

    /// Serialize the data and write it to the file without blocking.
    pub async fn save(&self) -> DocumentResult<()> {
        let filename = self.filename.clone().ok_or(DocumentError::NoFilename)?;
        log_event(self.logger.as_ref(), Event::DocumentSaveBegin, &[("file", &filename)]);

        let result = match self.serialize() {
            Ok(text) => self
                .backend
                .write_all_async(&filename, text.into_bytes())
                .await
                .map_err(DocumentError::from),
            Err(e) => Err(e),
        };
        self.finish_save(&filename, result)
    }

    /// Container data rendered by the codec
    pub fn serialize(&self) -> DocumentResult<String> {
        Ok(self.codec.serialize(&self.container.to_value())?)
    }

    /// Decode `text` with the codec and absorb it into the container.
    pub fn deserialize(&mut self, text: &str) -> DocumentResult<&mut Self> {
        let value = self.codec.deserialize(text)?;
        self.container.load(&value)?;
        Ok(self)
    }

    pub fn can_serialize(&self) -> bool {
        self.codec.can_serialize()
    }

    pub fn register_serializer<F>(&mut self, serializer: F)
    where
        F: Fn(&Value) -> CodecResult<String> + 'static,
    {
        self.codec.register_serializer(serializer);
    }

    pub fn register_deserializer<F>(&mut self, deserializer: F)
    where
        F: Fn(&str) -> CodecResult<Value> + 'static,
    {
        self.codec.register_deserializer(deserializer);
    }

    /// Validate the data against the schema, loading the file first if
    /// it has not been loaded.
    pub fn valid(&mut self) -> DocumentResult<bool> {
        if self.schema.is_none() {
            return Err(DocumentError::NoSchema);
        }
        if !self.loaded {
            self.load_sync()?;
        }

        let data = self.container.to_value();
        let schema = self.schema.as_mut().ok_or(DocumentError::NoSchema)?;
        Ok(schema.validate(&data)?)
    }

    pub fn invalid(&mut self) -> DocumentResult<bool> {
        Ok(!self.valid()?)
    }

    fn existing_filename(&self) -> DocumentResult<String> {
        let filename = self.filename.clone().ok_or(DocumentError::NoFilename)?;
        if !self.backend.exists(&filename) {
            return Err(DocumentError::DocumentNotFound(filename));
        }
        Ok(filename)
    }

    fn absorb(&mut self, filename: &str, bytes: &[u8]) -> DocumentResult<()> {
        let parse_error = || DocumentError::DocumentParseError(filename.to_string());

        let text = std::str::from_utf8(bytes).map_err(|_| parse_error())?;
        let value = self.codec.deserialize(text).map_err(|e| match e {
            CodecError::Decode(_) => parse_error(),
            other => other.into(),
        })?;

        self.container.load(&value)?;
        self.loaded = true;
        Ok(())
    }

    fn finish_load(&self, filename: &str, result: DocumentResult<()>) -> DocumentResult<()> {
        match &result {
            Ok(()) => {
                let fields = self.container.size().to_string();
                log_event(
                    self.logger.as_ref(),
                    Event::DocumentLoaded,
                    &[("file", filename), ("fields", &fields)],
                );
            }
            Err(e) => log_event(
                self.logger.as_ref(),
                Event::DocumentLoadFailed,
                &[("file", filename), ("error", e.code())],
            ),
        }
        result
    }

    fn finish_save(&self, filename: &str, result: DocumentResult<()>) -> DocumentResult<()> {
        match &result {
            Ok(()) => log_event(self.logger.as_ref(), Event::DocumentSaved, &[("file", filename)]),
            Err(e) => log_event(
                self.logger.as_ref(),
                Event::DocumentSaveFailed,
                &[("file", filename), ("error", e.code())],
            ),
        }
        result
    }
}

impl Eventful for JsonDocument {
    fn emitter(&self) -> &EventEmitter {
        self.container.emitter()
    }
}

impl AsContainer for JsonDocument {
    fn as_container(&self) -> Option<&Container> {
        Some(&self.container)
    }
}

impl fmt::Display for JsonDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.serialize() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}", self.container),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_storage::{LocalBackend, MemoryBackend};
    use crate::observability::{null_logger, MemoryLogger};
    use crate::schema::SCHEMA_INVALID;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    const SCHEMA: &str = r#"{
        "name": {"type": "string", "required": true},
        "age": {"type": "number"}
    }"#;

    fn backend() -> Arc<MemoryBackend> {
        Arc::new(
            MemoryBackend::new()
                .with_file("valid.json", r#"{"name": "ninja", "age": 30}"#)
                .with_file("wrong.json", r#"{"name": 7, "belt": "black"}"#)
                .with_file("invalid.json", "{ this is not json")
                .with_file("schema.json", SCHEMA),
        )
    }

    fn document(config: DocumentConfig) -> JsonDocument {
        JsonDocument::new(config, backend(), null_logger()).unwrap()
    }

    #[test]
    fn test_filename() {
        let mut doc = document(DocumentConfig::default());
        assert_eq!(doc.filename(), None);
        assert_eq!(doc.set_filename("foobar.json"), Some("foobar.json"));
        assert_eq!(doc.set_filename(""), Some("foobar.json"));
    }

    #[test]
    fn test_exists() {
        assert!(document(DocumentConfig::new("valid.json")).exists());
        assert!(!document(DocumentConfig::new("foobar.json")).exists());
        assert!(!document(DocumentConfig::default()).exists());
    }

    #[test]
    fn test_load_sync() {
        let mut doc = document(DocumentConfig::new("valid.json"));
        doc.load_sync().unwrap();

        assert!(doc.is_loaded());
        assert_eq!(doc.container().size(), 2);
        assert_eq!(doc.container().to_value(), json!({"name": "ninja", "age": 30}));
        assert!(doc.as_container().is_some());
    }

    #[test]
    fn test_load_errors() {
        let err = document(DocumentConfig::default()).load_sync().unwrap_err();
        assert_eq!(err, DocumentError::NoFilename);

        let err = document(DocumentConfig::new("foobar.json")).load_sync().unwrap_err();
        assert_eq!(err.to_string(), "The file foobar.json doesn't exist!");

        let mut doc = document(DocumentConfig::new("invalid.json"));
        let err = doc.load_sync().unwrap_err();
        assert_eq!(err.to_string(), "Can not read invalid.json, not valid JSON");
        assert!(!doc.is_loaded());
    }

    #[tokio::test]
    async fn test_async_load() {
        let mut doc = document(DocumentConfig::new("valid.json"));
        doc.load().await.unwrap();
        assert_eq!(doc.container().lookup("name"), json!("ninja"));

        let mut bad = document(DocumentConfig::new("invalid.json"));
        let err = bad.load().await.unwrap_err();
        assert_eq!(err.code(), "DOCBIND_DOCUMENT_PARSE_ERROR");
    }

    #[test]
    fn test_valid_requires_schema() {
        let mut doc = document(DocumentConfig::new("valid.json"));
        assert_eq!(doc.valid().unwrap_err(), DocumentError::NoSchema);
    }

    #[test]
    fn test_valid_loads_lazily() {
        let mut doc = document(DocumentConfig::new("valid.json").with_schema("schema.json"));
        assert!(!doc.is_loaded());
        assert!(doc.valid().unwrap());
        assert!(doc.is_loaded());
        assert!(!doc.invalid().unwrap());
    }

    #[test]
    fn test_schema_invalid_reaches_document() {
        let mut doc = document(DocumentConfig::new("wrong.json").with_schema("schema.json"));
        let reports = Rc::new(RefCell::new(Vec::new()));
        let sink = reports.clone();
        doc.on(SCHEMA_INVALID, move |args| sink.borrow_mut().push(args.to_vec()))
            .unwrap();

        assert!(doc.invalid().unwrap());

        let reports = reports.borrow();
        assert_eq!(reports.len(), 1);
        let report = &reports[0][0];
        assert_eq!(report["fields"], json!(["belt is not allowed"]));
        assert_eq!(report["types"], json!(["name should have been string but was number"]));
    }

    #[test]
    fn test_missing_schema_file() {
        let mut doc = document(DocumentConfig::new("valid.json").with_schema("nope.json"));
        let err = doc.valid().unwrap_err();
        assert_eq!(err.code(), "DOCBIND_SCHEMA_NOT_FOUND");
    }

    #[test]
    fn test_serialize_and_display() {
        let mut doc = document(DocumentConfig::new("valid.json"));
        doc.load_sync().unwrap();
        assert_eq!(doc.serialize().unwrap(), r#"{"name":"ninja","age":30}"#);
        assert_eq!(doc.to_string(), r#"{"name":"ninja","age":30}"#);

        doc.deserialize(r#"{"belt": "black"}"#).unwrap();
        assert_eq!(doc.container().fields(), ["name", "age", "belt"]);
    }

    #[test]
    fn test_half_registered_codec() {
        let mut doc = document(DocumentConfig::new("valid.json"));
        doc.register_serializer(|v| Ok(v.to_string()));
        assert!(!doc.can_serialize());

        let err = doc.serialize().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Can not serialize data missing either serializer or deserializer"
        );
        assert!(doc.load_sync().is_err());

        doc.register_deserializer(|t| {
            serde_json::from_str(t).map_err(|e| CodecError::Decode(e.to_string()))
        });
        assert!(doc.can_serialize());
        assert!(doc.load_sync().is_ok());
    }

    #[test]
    fn test_save_sync() {
        let store = backend();
        let config = DocumentConfig::new("out.json");
        let mut doc = JsonDocument::new(config, store.clone(), null_logger()).unwrap();
        doc.container_mut().load(&json!({"a": [1, 2]})).unwrap();
        doc.save_sync().unwrap();

        assert_eq!(store.read_all("out.json").unwrap(), br#"{"a":[1,2]}"#.to_vec());
    }

    #[tokio::test]
    async fn test_save_and_reload_on_disk() {
        let temp = TempDir::new().unwrap();
        let disk: Arc<dyn StorageBackend> =
            Arc::new(LocalBackend::rooted(temp.path().to_path_buf()));
        let config = DocumentConfig::new("nested/doc.json").with_pretty(true);

        let mut doc = JsonDocument::new(config.clone(), disk.clone(), null_logger()).unwrap();
        doc.container_mut().load(&json!({"name": "ninja", "tags": ["a"]})).unwrap();
        doc.save().await.unwrap();

        let mut again = JsonDocument::new(config, disk, null_logger()).unwrap();
        again.load().await.unwrap();
        assert_eq!(again.container().to_value(), doc.container().to_value());
    }

    #[test]
    fn test_logs_load_lifecycle() {
        let logger = Arc::new(MemoryLogger::new());
        let config = DocumentConfig::new("valid.json");
        let mut doc = JsonDocument::new(config, backend(), logger.clone()).unwrap();
        doc.load_sync().unwrap();
        assert!(logger.contains_event("DOCUMENT_LOAD_BEGIN"));
        assert!(logger.contains_event("DOCUMENT_LOADED"));

        doc.set_filename("invalid.json");
        assert!(doc.load_sync().is_err());
        assert!(logger.contains_event("DOCUMENT_LOAD_FAILED"));
    }
}
