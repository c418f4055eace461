//! Key/value persistence backends.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Minimal string key/value store.
///
/// Values are opaque strings; callers own the encoding.
pub trait KeyValueStore: Send + Sync {
    /// Returns `Ok(None)` when the key has never been written or was removed.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key under a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;
        fs::write(self.path_for(key), value).map_err(write_err)?;

        tracing::debug!("Stored {} in {:?}", key, self.dir);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {
                tracing::debug!("Removed {} from {:?}", key, self.dir);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Write {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// In-memory backend for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().remove(key);
        Ok(())
    }
}
