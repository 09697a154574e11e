//! Handles to registered fields.

use serde_json::Value;

use super::errors::ContainerResult;
use super::store::Container;

/// Accessor for one registered field of a [`Container`].
///
/// Reads and writes go through the container so the `get`/`set` events
/// fire exactly as they do for [`Container::get`] and [`Container::set`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldHandle {
    name: String,
}

impl FieldHandle {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, container: &Container) -> ContainerResult<Value> {
        container.get(&self.name)
    }

    pub fn set(&self, container: &mut Container, value: impl Into<Value>) -> ContainerResult<()> {
        container.set(&self.name, value)
    }
}
