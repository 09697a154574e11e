//! # File Storage
//!
//! Existence probes and whole-file reads/writes used by schema and
//! document loading, behind a swappable backend.

pub mod backend;
pub mod errors;
pub mod local;
pub mod memory;

pub use backend::StorageBackend;
pub use errors::{StorageError, StorageResult};
pub use local::LocalBackend;
pub use memory::MemoryBackend;
