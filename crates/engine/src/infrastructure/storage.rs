//! Key-value storage adapters.
//!
//! `FileStorage` keeps every key in one JSON object on disk, mirroring the
//! browser's localStorage. `MemoryStorage` holds everything in memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::ports::{StorageError, StorageProvider};

/// In-memory storage; clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    cache: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageProvider for MemoryStorage {
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.cache.write().map_err(|_| StorageError::Lock)?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.cache.read() {
            Ok(guard) => guard.get(key).cloned(),
            Err(e) => {
                tracing::error!("Failed to acquire read lock for storage: {}", e);
                None
            }
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self.cache.write().map_err(|_| StorageError::Lock)?;
        guard.remove(key);
        Ok(())
    }
}

/// File-backed storage
///
/// Stores key-value pairs as a JSON object in a single file. The whole file
/// is rewritten on every change.
#[derive(Clone)]
pub struct FileStorage {
    /// Path to the storage file
    storage_path: PathBuf,
    /// In-memory cache of stored values
    cache: Arc<RwLock<BTreeMap<String, String>>>,
}

impl FileStorage {
    /// Open the store at `path`, loading existing data if the file exists.
    ///
    /// An unreadable or malformed file is logged and treated as empty; it is
    /// only overwritten on the next save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let storage_path = path.into();

        let cache = if storage_path.exists() {
            match fs::read_to_string(&storage_path) {
                Ok(data) => match serde_json::from_str::<BTreeMap<String, String>>(&data) {
                    Ok(map) => map,
                    Err(e) => {
                        tracing::warn!(path = %storage_path.display(), "Failed to parse storage file: {}", e);
                        BTreeMap::new()
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %storage_path.display(), "Failed to read storage file: {}", e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!("File storage initialized at: {:?}", storage_path);

        Self {
            storage_path,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Persist the cache to disk
    fn persist(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| StorageError::io(parent.display(), e))?;
            }
        }

        let data = {
            let cache = self.cache.read().map_err(|_| StorageError::Lock)?;
            serde_json::to_string_pretty(&*cache).map_err(StorageError::serialization)?
        };

        fs::write(&self.storage_path, data)
            .map_err(|e| StorageError::io(self.storage_path.display(), e))
    }
}

impl StorageProvider for FileStorage {
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        {
            let mut guard = self.cache.write().map_err(|_| StorageError::Lock)?;
            guard.insert(key.to_string(), value.to_string());
        }
        self.persist().inspect_err(|e| {
            tracing::error!(key, "Failed to write storage file: {}", e);
        })
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.cache.read() {
            Ok(guard) => guard.get(key).cloned(),
            Err(e) => {
                tracing::error!("Failed to acquire read lock for storage: {}", e);
                None
            }
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        {
            let mut guard = self.cache.write().map_err(|_| StorageError::Lock)?;
            guard.remove(key);
        }
        self.persist().inspect_err(|e| {
            tracing::error!(key, "Failed to write storage file: {}", e);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load("k"), None);
        storage.save("k", "v").expect("save");
        assert_eq!(storage.load("k").as_deref(), Some("v"));

        let shared = storage.clone();
        shared.remove("k").expect("remove");
        assert_eq!(storage.load("k"), None);
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::open(&path);
        storage.save("dnd5eSettings_v1", r#"{"allowClassOverride":true}"#).expect("save");
        assert!(path.exists());

        let reopened = FileStorage::open(&path);
        assert_eq!(
            reopened.load("dnd5eSettings_v1").as_deref(),
            Some(r#"{"allowClassOverride":true}"#)
        );

        reopened.remove("dnd5eSettings_v1").expect("remove");
        assert_eq!(FileStorage::open(&path).load("dnd5eSettings_v1"), None);
    }

    #[test]
    fn malformed_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").expect("write");

        let storage = FileStorage::open(&path);
        assert_eq!(storage.load("anything"), None);
        storage.save("a", "b").expect("save over malformed file");
        assert_eq!(FileStorage::open(&path).load("a").as_deref(), Some("b"));
    }

    #[test]
    fn unwritable_path_reports_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A directory where the file should be makes the write fail.
        let path = dir.path().join("storage.json");
        fs::create_dir_all(&path).expect("mkdir");

        let storage = FileStorage::open(&path);
        assert!(matches!(storage.save("a", "b"), Err(StorageError::Io { .. })));
        // The cache still holds the value.
        assert_eq!(storage.load("a").as_deref(), Some("b"));
    }
}
