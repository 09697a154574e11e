//! # Local Filesystem Backend

use std::fs;
use std::path::PathBuf;

use futures_util::future::{BoxFuture, FutureExt};

use super::backend::StorageBackend;
use super::errors::{StorageError, StorageResult};

/// Local filesystem storage backend
///
/// Paths are used as given, or joined onto `root` when one is set.
#[derive(Debug, Default, Clone)]
pub struct LocalBackend {
    root: Option<PathBuf>,
}

impl LocalBackend {
    /// Backend resolving paths against the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend resolving paths against `root`
    pub fn rooted(root: PathBuf) -> Self {
        Self { root: Some(root) }
    }

    fn full_path(&self, path: &str) -> StorageResult<PathBuf> {
        if path.is_empty() {
            return Err(StorageError::InvalidPath("path is empty".into()));
        }
        Ok(match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        })
    }
}

impl StorageBackend for LocalBackend {
    fn exists(&self, path: &str) -> bool {
        self.full_path(path)
            .map(|p| p.is_file() || p.is_dir())
            .unwrap_or(false)
    }

    fn read_all(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(path)?;
        fs::read(&full_path).map_err(|e| StorageError::from_io(path, e))
    }

    fn read_all_async(&self, path: &str) -> BoxFuture<'static, StorageResult<Vec<u8>>> {
        let name = path.to_string();
        let full_path = self.full_path(path);
        async move {
            let full_path = full_path?;
            tokio::fs::read(&full_path)
                .await
                .map_err(|e| StorageError::from_io(&name, e))
        }
        .boxed()
    }

    fn write_all(&self, path: &str, data: &[u8]) -> StorageResult<()> {
        let full_path = self.full_path(path)?;

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::IoError(e.to_string()))?;
        }

        fs::write(&full_path, data).map_err(|e| StorageError::from_io(path, e))
    }

    fn write_all_async(&self, path: &str, data: Vec<u8>) -> BoxFuture<'static, StorageResult<()>> {
        let name = path.to_string();
        let full_path = self.full_path(path);
        async move {
            let full_path = full_path?;
            if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::IoError(e.to_string()))?;
            }
            tokio::fs::write(&full_path, data)
                .await
                .map_err(|e| StorageError::from_io(&name, e))
        }
        .boxed()
    }
}
