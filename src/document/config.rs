//! Document configuration

use crate::codec::TextCodec;
use crate::observability::{JsonLogger, Severity};

/// Settings for a [`JsonDocument`](super::JsonDocument).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentConfig {
    /// Path of the data file, relative to the backend root.
    pub filename: Option<String>,
    /// Path of the schema file. No schema means no validation.
    pub schema: Option<String>,
    /// Indent saved output. Compact by default.
    pub pretty: bool,
    /// Stamp log lines from [`DocumentConfig::json_logger`].
    pub timestamps: bool,
}

impl DocumentConfig {
    /// Config for the data file at `filename`.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Self::default()
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Schema location, if one was given and is not empty.
    pub fn schema_location(&self) -> Option<&str> {
        self.schema.as_deref().filter(|s| !s.is_empty())
    }

    /// Codec matching the output settings
    pub fn codec(&self) -> TextCodec {
        if self.pretty {
            TextCodec::pretty()
        } else {
            TextCodec::new()
        }
    }

    /// JSON line logger at info level, honouring `timestamps`.
    pub fn json_logger(&self) -> JsonLogger {
        JsonLogger::new(Severity::Info).with_timestamps(self.timestamps)
    }
}
