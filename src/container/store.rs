//! # Observable Container
//!
//! A mapping of named fields. Every key that lands in the data is
//! registered as a field; reads and writes through a field raise events.
//!
//! Events raised:
//! - `register` `[name]` and `register.<name>` `[]` on registration
//! - `get` `[name]` and `get.<name>` `[]` before a read
//! - `set` `[name, new, previous]` and `set.<name>` `[new, previous]` before a write

use std::fmt;

use serde_json::{Map, Value};

use super::errors::{ContainerError, ContainerResult};
use super::field::FieldHandle;
use crate::events::{EventEmitter, Eventful};

const PATH_SEPARATOR: char = '.';

/// Observable key/value container
#[derive(Debug, Default)]
pub struct Container {
    emitter: EventEmitter,
    data: Map<String, Value>,
    /// Registered field names in registration order
    fields: Vec<String>,
}

impl Container {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a container preloaded with `data`.
    pub fn with_data(data: &Value) -> ContainerResult<Self> {
        let mut container = Self::new();
        container.load(data)?;
        Ok(container)
    }

    /// Shallow-merge `bulk` into the data and register any new keys.
    ///
    /// Anything other than a JSON object is ignored. Existing keys are
    /// overwritten without raising `set`.
    pub fn load(&mut self, bulk: &Value) -> ContainerResult<&Map<String, Value>> {
        if let Value::Object(incoming) = bulk {
            for (key, value) in incoming {
                self.data.insert(key.clone(), value.clone());
            }
            self.scan()?;
        }
        Ok(&self.data)
    }

    /// Current data
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Current data as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(self.data.clone())
    }

    /// Is `name` a registered field?
    pub fn has(&self, name: &str) -> ContainerResult<bool> {
        if name.is_empty() {
            return Err(ContainerError::InvalidArgument("Key is required".into()));
        }
        Ok(self.fields.iter().any(|f| f == name))
    }

    /// Register `name` as a field with no value.
    pub fn declare_field(&mut self, name: &str) -> ContainerResult<FieldHandle> {
        if name.is_empty() {
            return Err(ContainerError::InvalidArgument("Fieldname is required".into()));
        }
        self.register(name)?;
        Ok(FieldHandle::new(name))
    }

    /// Registered field names in registration order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of registered fields
    pub fn size(&self) -> usize {
        self.fields.len()
    }

    /// Walk a dot-separated path through the data.
    ///
    /// An empty path yields `null`. A missing segment yields `false`.
    /// Numeric segments index into arrays.
    pub fn lookup(&self, path: &str) -> Value {
        if path.is_empty() {
            return Value::Null;
        }

        let mut segments = path.split(PATH_SEPARATOR);
        let first = segments.next().unwrap_or_default();
        let Some(mut current) = self.data.get(first) else {
            return Value::Bool(false);
        };

        for segment in segments {
            let next = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Value::Bool(false),
            }
        }

        current.clone()
    }

    /// Merge another container's data into this one.
    pub fn merge_from(&mut self, other: &dyn AsContainer) -> ContainerResult<&mut Self> {
        let Some(other) = other.as_container() else {
            return Err(ContainerError::InvalidOperation(
                "Collections can only be extended with other collections".into(),
            ));
        };
        let incoming = other.to_value();
        self.load(&incoming)?;
        Ok(self)
    }

    /// Read a field, raising `get` and `get.<name>`.
    ///
    /// A registered field with no value reads as `null`.
    pub fn get(&self, name: &str) -> ContainerResult<Value> {
        self.require_field(name)?;

        self.emitter.trigger("get", &[Value::from(name)])?;
        self.emitter.trigger(&format!("get.{}", name), &[])?;

        Ok(self.data.get(name).cloned().unwrap_or(Value::Null))
    }

    /// Write a field, raising `set` and `set.<name>` before storing.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> ContainerResult<()> {
        self.require_field(name)?;

        let value = value.into();
        let previous = self.data.get(name).cloned().unwrap_or(Value::Null);

        self.emitter.trigger(
            "set",
            &[Value::from(name), value.clone(), previous.clone()],
        )?;
        self.emitter
            .trigger(&format!("set.{}", name), &[value.clone(), previous])?;

        self.data.insert(name.to_string(), value);
        Ok(())
    }

    fn require_field(&self, name: &str) -> ContainerResult<()> {
        if !self.has(name)? {
            return Err(ContainerError::UnknownField(name.to_string()));
        }
        Ok(())
    }

    /// Register every data key that is not yet a field.
    fn scan(&mut self) -> ContainerResult<()> {
        let new_keys: Vec<String> = self
            .data
            .keys()
            .filter(|k| !self.fields.contains(*k))
            .cloned()
            .collect();

        for key in new_keys {
            self.register(&key)?;
        }
        Ok(())
    }

    fn register(&mut self, name: &str) -> ContainerResult<()> {
        if self.has(name)? {
            return Err(ContainerError::DuplicateField(name.to_string()));
        }

        self.fields.push(name.to_string());

        self.emitter.trigger("register", &[Value::from(name)])?;
        self.emitter.trigger(&format!("register.{}", name), &[])?;
        Ok(())
    }
}

impl Eventful for Container {
    fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.data).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Capability probe for "is a container".
pub trait AsContainer {
    fn as_container(&self) -> Option<&Container>;
}

impl AsContainer for Container {
    fn as_container(&self) -> Option<&Container> {
        Some(self)
    }
}

impl AsContainer for EventEmitter {
    fn as_container(&self) -> Option<&Container> {
        None
    }
}
