//! Infrastructure implementations.
//!
//! Contains the storage port and its adapters.

pub mod ports;
pub mod storage;

pub use ports::{storage_keys, StorageError, StorageProvider};
pub use storage::{FileStorage, MemoryStorage};
