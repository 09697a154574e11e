//! # Storage Backend Trait

use futures_util::future::BoxFuture;

use super::errors::StorageResult;

/// Backend trait for document and schema files
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Check if path exists
    fn exists(&self, path: &str) -> bool;

    /// Read the whole file at path
    fn read_all(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Read the whole file at path without blocking the caller
    fn read_all_async(&self, path: &str) -> BoxFuture<'static, StorageResult<Vec<u8>>>;

    /// Replace the file at path with data
    fn write_all(&self, path: &str, data: &[u8]) -> StorageResult<()>;

    /// Replace the file at path with data without blocking the caller
    fn write_all_async(&self, path: &str, data: Vec<u8>) -> BoxFuture<'static, StorageResult<()>>;
}
