//! # In-Memory Backend

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use futures_util::future::{self, BoxFuture, FutureExt};

use super::backend::StorageBackend;
use super::errors::{StorageError, StorageResult};

/// Storage backend holding files in memory.
///
/// Clones share the same files.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seed of one file
    pub fn with_file(self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        if let Ok(mut files) = self.files.write() {
            files.insert(path.to_string(), data.into());
        }
        self
    }

    /// Number of stored files
    pub fn len(&self) -> usize {
        self.files.read().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryBackend {
    fn exists(&self, path: &str) -> bool {
        self.files
            .read()
            .map(|f| f.contains_key(path))
            .unwrap_or(false)
    }

    fn read_all(&self, path: &str) -> StorageResult<Vec<u8>> {
        if path.is_empty() {
            return Err(StorageError::InvalidPath("path is empty".into()));
        }
        let files = self
            .files
            .read()
            .map_err(|_| StorageError::IoError("memory backend poisoned".into()))?;
        files
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::ObjectNotFound(path.to_string()))
    }

    fn read_all_async(&self, path: &str) -> BoxFuture<'static, StorageResult<Vec<u8>>> {
        future::ready(self.read_all(path)).boxed()
    }

    fn write_all(&self, path: &str, data: &[u8]) -> StorageResult<()> {
        if path.is_empty() {
            return Err(StorageError::InvalidPath("path is empty".into()));
        }
        let mut files = self
            .files
            .write()
            .map_err(|_| StorageError::IoError("memory backend poisoned".into()))?;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn write_all_async(&self, path: &str, data: Vec<u8>) -> BoxFuture<'static, StorageResult<()>> {
        future::ready(self.write_all(path, &data)).boxed()
    }
}
