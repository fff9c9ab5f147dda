use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::KeyValueStore;
use crate::error::StorageError;

#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<String, String>,
    /// Upper bound on the summed byte length of keys and values.
    quota: Option<usize>,
    disabled: bool,
}

/// In-process store. Clones share the same underlying map, which makes it
/// usable as a stand-in for a browser-style storage area across "sessions".
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once the total stored bytes would
    /// exceed `quota`.
    pub fn with_quota(quota: usize) -> Self {
        let store = Self::default();
        store.inner.lock().quota = Some(quota);
        store
    }

    /// A store whose every operation fails, as when storage is turned off.
    pub fn disabled() -> Self {
        let store = Self::default();
        store.inner.lock().disabled = true;
        store
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_enabled(inner: &MemoryInner) -> Result<(), StorageError> {
    if inner.disabled {
        return Err(StorageError::Unavailable("memory store is disabled".into()));
    }
    Ok(())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.inner.lock();
        check_enabled(&inner)?;
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        check_enabled(&inner)?;

        if let Some(quota) = inner.quota {
            let others: usize = inner
                .entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        check_enabled(&inner)?;
        inner.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let inner = self.inner.lock();
        check_enabled(&inner)?;
        Ok(inner.entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
        b.remove("k").unwrap();
        assert!(a.is_empty());
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let store = MemoryStore::with_quota(8);
        store.set("ab", "cd").unwrap();
        let err = store.set("key", "too long").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { quota: 8, .. }));
        // Replacing an existing key only counts the new value.
        store.set("ab", "cdef").unwrap();
        assert_eq!(store.get("ab").unwrap().as_deref(), Some("cdef"));
    }

    #[test]
    fn test_disabled_store_fails_everything() {
        let store = MemoryStore::disabled();
        assert!(matches!(store.get("k"), Err(StorageError::Unavailable(_))));
        assert!(store.set("k", "v").is_err());
        assert!(store.remove("k").is_err());
        assert!(store.keys().is_err());
    }
}
