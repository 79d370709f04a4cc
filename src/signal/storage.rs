use super::SignalStore;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::warn;

/// Errors writing to a [`SignalStore`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Process-local storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_items<R>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> R) -> R {
        let mut items = self
            .items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut items)
    }
}

impl SignalStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.with_items(|items| items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.with_items(|items| items.insert(key.to_string(), value.to_string()));
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.with_items(|items| items.remove(key));
        Ok(())
    }
}

/// Storage persisted across process runs: one file per key inside `dir`.
///
/// Lets the demo binary carry a deferred route from one run to the next. Access is
/// blocking `std::fs`, like the browser's synchronous storage it stands in for; it is
/// touched once at bootstrap for a single small file. Page resources go through
/// [`FsFetcher`](crate::fetch::FsFetcher), which uses `tokio::fs`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl SignalStore for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let path = match self.path(key) {
            Ok(path) => path,
            Err(e) => {
                warn!(key, error = %e, "Failed to read storage item");
                return None;
            }
        };
        match std::fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key, path = %path.display(), error = %e, "Failed to read storage item");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        std::fs::create_dir_all(self.dir()).map_err(|e| StorageError::Io(e.to_string()))?;
        std::fs::write(path, value).map_err(|e| StorageError::Io(e.to_string()))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}
