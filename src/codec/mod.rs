//! # Text Codec
//!
//! Converts document data to and from text. JSON by default; a custom
//! serializer/deserializer pair may replace it, but only as a pair.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Exactly one half of a custom pair is registered
    #[error("Can not serialize data missing either serializer or deserializer")]
    SerializationMisconfigured,

    /// Data could not be turned into text
    #[error("Encode failed: {0}")]
    Encode(String),

    /// Text could not be turned into data
    #[error("Decode failed: {0}")]
    Decode(String),
}

impl CodecError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CodecError::SerializationMisconfigured => "DOCBIND_SERIALIZATION_MISCONFIGURED",
            CodecError::Encode(_) => "DOCBIND_ENCODE_FAILED",
            CodecError::Decode(_) => "DOCBIND_DECODE_FAILED",
        }
    }
}

/// Custom serializer: data to text
pub type SerializeFn = Box<dyn Fn(&Value) -> CodecResult<String>>;

/// Custom deserializer: text to data
pub type DeserializeFn = Box<dyn Fn(&str) -> CodecResult<Value>>;

/// JSON codec with an optional custom replacement pair
#[derive(Default)]
pub struct TextCodec {
    pretty: bool,
    serializer: Option<SerializeFn>,
    deserializer: Option<DeserializeFn>,
}

impl fmt::Debug for TextCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextCodec")
            .field("pretty", &self.pretty)
            .field("custom_serializer", &self.serializer.is_some())
            .field("custom_deserializer", &self.deserializer.is_some())
            .finish()
    }
}

impl TextCodec {
    /// Compact JSON codec
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON codec that indents its output
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    pub fn register_serializer<F>(&mut self, serializer: F)
    where
        F: Fn(&Value) -> CodecResult<String> + 'static,
    {
        self.serializer = Some(Box::new(serializer));
    }

    pub fn register_deserializer<F>(&mut self, deserializer: F)
    where
        F: Fn(&str) -> CodecResult<Value> + 'static,
    {
        self.deserializer = Some(Box::new(deserializer));
    }

    /// True unless exactly one custom half is registered
    pub fn can_serialize(&self) -> bool {
        self.serializer.is_some() == self.deserializer.is_some()
    }

    /// Has a full custom pair replaced JSON?
    pub fn is_custom(&self) -> bool {
        self.serializer.is_some() && self.deserializer.is_some()
    }

    pub fn serialize(&self, data: &Value) -> CodecResult<String> {
        if !self.can_serialize() {
            return Err(CodecError::SerializationMisconfigured);
        }
        if let Some(serializer) = &self.serializer {
            return serializer(data);
        }

        let text = if self.pretty {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        };
        text.map_err(|e| CodecError::Encode(e.to_string()))
    }

    pub fn deserialize(&self, text: &str) -> CodecResult<Value> {
        if !self.can_serialize() {
            return Err(CodecError::SerializationMisconfigured);
        }
        if let Some(deserializer) = &self.deserializer {
            return deserializer(text);
        }

        serde_json::from_str(text).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({"name": "doc", "tags": ["a", "b"], "nested": {"n": 1.5, "ok": true}, "none": null})
    }

    #[test]
    fn test_default_round_trip() {
        let codec = TextCodec::new();
        let text = codec.serialize(&sample()).unwrap();
        assert_eq!(codec.deserialize(&text).unwrap(), sample());
    }

    #[test]
    fn test_default_is_compact() {
        let codec = TextCodec::new();
        assert_eq!(codec.serialize(&json!({"a": 1})).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_pretty_output() {
        let codec = TextCodec::pretty();
        let text = codec.serialize(&json!({"a": 1})).unwrap();
        assert!(text.contains('\n'));
    }

    #[test]
    fn test_can_serialize() {
        let mut codec = TextCodec::new();
        assert!(codec.can_serialize());

        codec.register_serializer(|v| Ok(v.to_string()));
        assert!(!codec.can_serialize());

        codec.register_deserializer(|t| Ok(Value::String(t.to_string())));
        assert!(codec.can_serialize());
        assert!(codec.is_custom());
    }

    #[test]
    fn test_half_pair_fails_both_ways() {
        let mut codec = TextCodec::new();
        codec.register_deserializer(|t| Ok(Value::String(t.to_string())));

        assert_eq!(
            codec.serialize(&json!({})).unwrap_err(),
            CodecError::SerializationMisconfigured
        );
        assert_eq!(
            codec.deserialize("").unwrap_err(),
            CodecError::SerializationMisconfigured
        );
    }

    #[test]
    fn test_custom_pair_is_used() {
        let mut codec = TextCodec::new();
        codec.register_serializer(|v| Ok(format!("custom:{}", v)));
        codec.register_deserializer(|t| {
            let body = t
                .strip_prefix("custom:")
                .ok_or_else(|| CodecError::Decode("missing prefix".into()))?;
            serde_json::from_str(body).map_err(|e| CodecError::Decode(e.to_string()))
        });

        let text = codec.serialize(&json!({"a": 1})).unwrap();
        assert_eq!(text, r#"custom:{"a":1}"#);
        assert_eq!(codec.deserialize(&text).unwrap(), json!({"a": 1}));
        assert!(codec.deserialize("{}").is_err());
    }

    #[test]
    fn test_decode_error() {
        let codec = TextCodec::new();
        let err = codec.deserialize("{not json").unwrap_err();
        assert_eq!(err.code(), "DOCBIND_DECODE_FAILED");
    }
}
