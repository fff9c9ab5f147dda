//! Authoritative widget positions with write-through persistence.
//!
//! The store is an explicit object owned by the layout rather than ambient
//! state, so two layouts (or two tests) never observe each other. It is
//! mutated only through [`PositionStore::update_position`] (live, in-memory)
//! and [`PositionStore::save_position`] (clamped commit, persisted), plus
//! [`PositionStore::reset`].

use std::collections::BTreeMap;

use crate::descriptor::WidgetDescriptor;
use crate::geometry::{Position, Size, compute_bounds};
use crate::persistence::Persistence;

/// Widget id → position. Ordered so the persisted JSON is stable.
pub type PositionMap = BTreeMap<String, Position>;

type Listener = Box<dyn Fn(&PositionMap) + Send + Sync>;

/// Handle returned by [`PositionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct PositionStore {
    defaults: PositionMap,
    positions: PositionMap,
    persistence: Persistence,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for PositionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionStore")
            .field("positions", &self.positions)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

fn defaults_from(descriptors: &[WidgetDescriptor]) -> PositionMap {
    descriptors
        .iter()
        .map(|d| (d.id.clone(), d.default_position))
        .collect()
}

impl PositionStore {
    /// Build defaults from `descriptors` and merge persisted positions over
    /// them.
    ///
    /// The merge is per id: persisted entries for unknown ids are ignored,
    /// as are individual entries that do not decode as a position. A
    /// document that is not a JSON object counts as "nothing persisted".
    pub fn load(descriptors: &[WidgetDescriptor], persistence: Persistence) -> Self {
        let defaults = defaults_from(descriptors);
        let mut positions = defaults.clone();

        let key = persistence.keys().positions();
        let persisted: BTreeMap<String, serde_json::Value> = persistence.read(&key, BTreeMap::new());

        let mut restored = 0;
        for (id, value) in persisted {
            let Some(slot) = positions.get_mut(&id) else {
                tracing::debug!("ignoring persisted position for unknown widget '{id}'");
                continue;
            };
            match serde_json::from_value::<Position>(value) {
                Ok(p) => {
                    *slot = p;
                    restored += 1;
                }
                Err(e) => tracing::warn!("ignoring malformed persisted position for '{id}': {e}"),
            }
        }
        if restored > 0 {
            tracing::info!("restored {restored} persisted widget positions");
        }

        Self {
            defaults,
            positions,
            persistence,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn position(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }

    pub fn default_position(&self, id: &str) -> Option<Position> {
        self.defaults.get(id).copied()
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Current positions of every widget.
    pub fn snapshot(&self) -> &PositionMap {
        &self.positions
    }

    /// In-memory update for live feedback. Nothing is persisted.
    pub fn update_position(&mut self, id: &str, position: Position) -> bool {
        let Some(slot) = self.positions.get_mut(id) else {
            tracing::debug!("update_position: unknown widget '{id}'");
            return false;
        };
        if *slot == position {
            return true;
        }
        *slot = position;
        self.emit();
        true
    }

    /// Clamp `(x, y)` to the widget's bounds inside `container`, store it,
    /// and persist the whole map. This is the only path that persists.
    ///
    /// Returns the committed position, or `None` for an unknown id.
    pub fn save_position(
        &mut self,
        id: &str,
        x: f32,
        y: f32,
        widget: Size,
        container: Size,
    ) -> Option<Position> {
        let Some(slot) = self.positions.get_mut(id) else {
            tracing::warn!("save_position: unknown widget '{id}'");
            return None;
        };

        let bounds = compute_bounds(widget.width, widget.height, container.width, container.height);
        let committed = bounds.clamp(Position::new(x, y));
        *slot = committed;

        self.persistence
            .write(&self.persistence.keys().positions(), &self.positions);
        tracing::debug!(
            "committed '{id}' at ({:.0}, {:.0})",
            committed.x,
            committed.y
        );
        self.emit();
        Some(committed)
    }

    /// Restore every default and delete the persisted entry outright.
    pub fn reset(&mut self) {
        self.positions = self.defaults.clone();
        self.persistence.remove(&self.persistence.keys().positions());
        tracing::info!("widget positions reset to defaults");
        self.emit();
    }

    /// Whether any widget sits away from its default position.
    pub fn has_changes(&self) -> bool {
        self.positions
            .iter()
            .any(|(id, p)| self.defaults.get(id) != Some(p))
    }

    /// Register `listener` to run after every mutation.
    pub fn subscribe(&mut self, listener: impl Fn(&PositionMap) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.positions);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    const CONTAINER: Size = Size::new(1000.0, 400.0);
    const WIDGET: Size = Size::new(200.0, 100.0);

    fn descriptors() -> Vec<WidgetDescriptor> {
        vec![
            WidgetDescriptor::new("bio", 40.0, 40.0, 200.0),
            WidgetDescriptor::new("game", 600.0, 120.0, 200.0),
        ]
    }

    fn persistence(store: &MemoryStore) -> Persistence {
        Persistence::new(Arc::new(store.clone()), "pb-")
    }

    #[test]
    fn test_load_without_persisted_data_uses_defaults() {
        let store = MemoryStore::new();
        let positions = PositionStore::load(&descriptors(), persistence(&store));
        assert_eq!(positions.position("bio"), Some(Position::new(40.0, 40.0)));
        assert!(!positions.has_changes());
    }

    #[test]
    fn test_load_merges_per_id() {
        let store = MemoryStore::new();
        store
            .set(
                "pb-horizontal-header-widget-positions",
                r#"{"bio":{"x":5,"y":6},"retired":{"x":1,"y":1},"game":"oops"}"#,
            )
            .unwrap();

        let positions = PositionStore::load(&descriptors(), persistence(&store));
        assert_eq!(positions.position("bio"), Some(Position::new(5.0, 6.0)));
        assert_eq!(positions.position("game"), Some(Position::new(600.0, 120.0)));
        assert_eq!(positions.position("retired"), None);
        assert!(positions.has_changes());
    }

    #[test]
    fn test_update_position_does_not_persist() {
        let store = MemoryStore::new();
        let mut positions = PositionStore::load(&descriptors(), persistence(&store));
        assert!(positions.update_position("bio", Position::new(99.0, 99.0)));
        assert!(store.is_empty());
        assert!(!positions.update_position("nope", Position::ORIGIN));
    }

    #[test]
    fn test_save_position_clamps_and_persists() {
        let store = MemoryStore::new();
        let mut positions = PositionStore::load(&descriptors(), persistence(&store));

        let committed = positions.save_position("bio", 950.0, -20.0, WIDGET, CONTAINER);
        assert_eq!(committed, Some(Position::new(800.0, 0.0)));

        let reloaded = PositionStore::load(&descriptors(), persistence(&store));
        assert_eq!(reloaded.position("bio"), Some(Position::new(800.0, 0.0)));
        assert_eq!(reloaded.position("game"), Some(Position::new(600.0, 120.0)));
    }

    #[test]
    fn test_save_unknown_widget_is_ignored() {
        let store = MemoryStore::new();
        let mut positions = PositionStore::load(&descriptors(), persistence(&store));
        assert_eq!(positions.save_position("ghost", 1.0, 1.0, WIDGET, CONTAINER), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_reset_removes_persisted_key() {
        let store = MemoryStore::new();
        let mut positions = PositionStore::load(&descriptors(), persistence(&store));
        positions.save_position("game", 10.0, 10.0, WIDGET, CONTAINER);
        assert!(positions.has_changes());

        positions.reset();
        assert!(!positions.has_changes());
        assert!(store.get("pb-horizontal-header-widget-positions").unwrap().is_none());
    }

    #[test]
    fn test_subscribers_see_mutations_until_unsubscribed() {
        let store = MemoryStore::new();
        let mut positions = PositionStore::load(&descriptors(), persistence(&store));
        let seen = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&seen);
        let sub = positions.subscribe(move |map| {
            assert!(map.contains_key("bio"));
            counter.fetch_add(1, Ordering::SeqCst);
        });

        positions.update_position("bio", Position::new(1.0, 2.0));
        positions.save_position("bio", 3.0, 4.0, WIDGET, CONTAINER);
        positions.reset();
        assert_eq!(seen.load(Ordering::SeqCst), 3);

        assert!(positions.unsubscribe(sub));
        assert!(!positions.unsubscribe(sub));
        positions.update_position("bio", Position::new(7.0, 7.0));
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }
}
