//! Observable key/value container
//!
//! Fields are registered explicitly with [`Container::declare_field`] or
//! implicitly when [`Container::load`] brings in new keys. Field access
//! goes through [`Container::get`] / [`Container::set`] (or a
//! [`FieldHandle`]) and raises events on the container's emitter.

mod errors;
mod field;
mod store;

pub use errors::{ContainerError, ContainerResult};
pub use field::FieldHandle;
pub use store::{AsContainer, Container};
