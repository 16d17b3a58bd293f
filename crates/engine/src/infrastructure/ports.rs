//! Port traits for infrastructure boundaries.
//!
//! Storage is the only abstraction in the engine. Everything else is a
//! concrete type.

/// Storage operation errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Writing the backing file failed.
    #[error("Storage write failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The store could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The in-memory cache lock was poisoned.
    #[error("Storage lock poisoned")]
    Lock,
}

impl StorageError {
    pub fn io(path: impl ToString, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}

/// Byte-oriented key-value store (browser localStorage or a file).
#[cfg_attr(test, mockall::automock)]
pub trait StorageProvider {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage key constants
///
/// The keys match those the browser sheet has always written, so a store
/// exported from it can be dropped in unchanged.
pub mod storage_keys {
    pub const CHARACTERS: &str = "dnd5eCharacters_v1";
    pub const SETTINGS: &str = "dnd5eSettings_v1";
}
