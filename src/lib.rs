//! docbind - observable containers and JSON documents with schema validation
//!
//! Components:
//! - `events`: synchronous event emitter with meta events and bonding
//! - `container`: observable key/value container with registered fields
//! - `schema`: declarative schema loading, parsing and validation
//! - `document`: JSON-file-backed container validated against a schema
//!
//! Supporting services:
//! - `codec`: JSON text codec with a replaceable custom pair
//! - `file_storage`: existence probes and whole-file reads and writes
//! - `observability`: injected structured JSON logging

pub mod codec;
pub mod container;
pub mod document;
pub mod events;
pub mod file_storage;
pub mod observability;
pub mod schema;
