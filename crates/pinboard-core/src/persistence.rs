//! JSON persistence adapter over a [`KeyValueStore`].
//!
//! Neither reads nor writes ever fail to the caller. Any storage error or
//! malformed JSON is logged and degrades: reads return the caller's
//! fallback, writes become no-ops. Losing persistence must never break the
//! session.
//!
//! Keys are namespaced:
//! ```text
//! <prefix>horizontal-header-widget-positions
//! <prefix>horizontal-header-widget-data-<widgetId>-<dataType>
//! ```

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::{KeyValueStore, MemoryStore};

const POSITIONS_KEY: &str = "horizontal-header-widget-positions";
const WIDGET_DATA_KEY: &str = "horizontal-header-widget-data-";

/// Builds namespaced storage keys from a fixed application prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key holding the full `{id → position}` map.
    pub fn positions(&self) -> String {
        format!("{}{POSITIONS_KEY}", self.prefix)
    }

    /// Key prefix shared by every data entry of one widget.
    pub fn widget_namespace(&self, widget_id: &str) -> String {
        format!("{}{WIDGET_DATA_KEY}{widget_id}-", self.prefix)
    }

    /// Key for one kind of data owned by one widget.
    pub fn widget_data(&self, widget_id: &str, data_type: &str) -> String {
        format!("{}{data_type}", self.widget_namespace(widget_id))
    }
}

/// Never-failing JSON reads and writes against a shared store.
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            keys: StorageKeys::new(prefix),
        }
    }

    /// Session-only persistence backed by a fresh [`MemoryStore`].
    pub fn in_memory(prefix: impl Into<String>) -> Self {
        Self::new(Arc::new(MemoryStore::new()), prefix)
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Read and decode `key`, or return `fallback` if it is absent,
    /// unreadable, or not valid JSON for `T`.
    pub fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(e) => {
                tracing::warn!("storage read failed for '{key}': {e}");
                return fallback;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("ignoring malformed value under '{key}': {e}");
                fallback
            }
        }
    }

    /// Encode and store `value` under `key`. Failures are logged and dropped.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("could not encode value for '{key}': {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(key, &json) {
            tracing::warn!("storage write failed for '{key}': {e}");
        }
    }

    /// Delete `key`. Failures are logged and dropped.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!("storage remove failed for '{key}': {e}");
        }
    }

    pub fn read_widget_data<T: DeserializeOwned>(
        &self,
        widget_id: &str,
        data_type: &str,
        fallback: T,
    ) -> T {
        self.read(&self.keys.widget_data(widget_id, data_type), fallback)
    }

    pub fn write_widget_data<T: Serialize + ?Sized>(
        &self,
        widget_id: &str,
        data_type: &str,
        value: &T,
    ) {
        self.write(&self.keys.widget_data(widget_id, data_type), value);
    }

    /// Delete every data entry belonging to `widget_id` and nothing else.
    ///
    /// Returns the number of keys removed.
    pub fn clear_widget_data(&self, widget_id: &str) -> usize {
        let namespace = self.keys.widget_namespace(widget_id);
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("could not list storage keys to clear '{widget_id}': {e}");
                return 0;
            }
        };

        let mut removed = 0;
        for key in keys.iter().filter(|k| k.starts_with(&namespace)) {
            match self.store.remove(key) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("storage remove failed for '{key}': {e}"),
            }
        }
        tracing::debug!("cleared {removed} data entries for widget '{widget_id}'");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> (MemoryStore, Persistence) {
        let store = MemoryStore::new();
        let persistence = Persistence::new(Arc::new(store.clone()), "pb-");
        (store, persistence)
    }

    #[test]
    fn test_key_layout() {
        let keys = StorageKeys::new("pb-");
        assert_eq!(keys.positions(), "pb-horizontal-header-widget-positions");
        assert_eq!(
            keys.widget_data("sketchpad", "paths"),
            "pb-horizontal-header-widget-data-sketchpad-paths"
        );
    }

    #[test]
    fn test_read_missing_returns_fallback() {
        let (_, p) = memory();
        assert_eq!(p.read("absent", 7u32), 7);
    }

    #[test]
    fn test_read_malformed_returns_fallback() {
        let (store, p) = memory();
        store.set("k", "{not json").unwrap();
        assert_eq!(p.read("k", vec![1u8]), vec![1u8]);
    }

    #[test]
    fn test_write_then_read() {
        let (store, p) = memory();
        p.write("k", &[1.5f32, 2.5]);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[1.5,2.5]"));
        assert_eq!(p.read::<Vec<f32>>("k", vec![]), vec![1.5, 2.5]);
    }

    #[test]
    fn test_disabled_storage_degrades_silently() {
        let p = Persistence::new(Arc::new(MemoryStore::disabled()), "pb-");
        p.write("k", "value");
        p.remove("k");
        assert_eq!(p.read("k", String::from("fallback")), "fallback");
        assert_eq!(p.clear_widget_data("any"), 0);
    }

    #[test]
    fn test_quota_exceeded_write_is_noop() {
        let p = Persistence::new(Arc::new(MemoryStore::with_quota(16)), "pb-");
        p.write("k", &"x".repeat(64));
        assert_eq!(p.read("k", String::new()), "");
    }

    #[test]
    fn test_clear_widget_data_only_touches_that_widget() {
        let (store, p) = memory();
        p.write_widget_data("sketch", "paths", &vec![[0.0f32, 1.0]]);
        p.write_widget_data("sketch", "color", "red");
        p.write_widget_data("sketchpad", "paths", &Vec::<[f32; 2]>::new());
        p.write(&p.keys().positions(), &serde_json::json!({}));

        assert_eq!(p.clear_widget_data("sketch"), 2);
        assert_eq!(store.len(), 2);
        assert!(store
            .get(&p.keys().widget_data("sketchpad", "paths"))
            .unwrap()
            .is_some());
        assert_eq!(
            p.read_widget_data("sketch", "color", String::from("none")),
            "none"
        );
    }
}
