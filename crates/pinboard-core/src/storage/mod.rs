//! Durable key-value backends.
//!
//! Values are opaque strings (the persistence adapter stores JSON). Every
//! operation reports failure through [`StorageError`]; deciding how to
//! degrade is the caller's job.

mod file;
mod memory;

pub use file::{FileStore, default_storage_dir};
pub use memory::MemoryStore;

use crate::error::StorageError;

/// A string-keyed, string-valued durable store.
///
/// Implementations use interior mutability so one handle can be shared
/// (`Arc<dyn KeyValueStore>`) between the layout engine and widget code.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// All keys currently present.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}
