//! Debounced widget height tracking.
//!
//! Size-change notifications only arm a trailing deadline. Once the deadline
//! passes, the next [`DimensionObserver::poll`] re-measures every observed
//! widget in a single batch and replaces the whole height map, so a burst
//! of resize events costs one layout pass instead of one per event.
//!
//! Time is passed in explicitly (`now: Instant`) so the host decides where
//! the clock comes from and tests stay deterministic.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::descriptor::WidgetDescriptor;

#[derive(Debug)]
pub struct DimensionObserver {
    heights: HashMap<String, f32>,
    /// Observed widget ids, in observation order.
    observed: Vec<String>,
    debounce: Duration,
    deadline: Option<Instant>,
    default_min_height: f32,
    connected: bool,
}

impl DimensionObserver {
    pub fn new(debounce: Duration, default_min_height: f32) -> Self {
        Self {
            heights: HashMap::new(),
            observed: Vec::new(),
            debounce,
            deadline: None,
            default_min_height,
            connected: true,
        }
    }

    /// Start tracking `id`. Observing twice is a no-op.
    pub fn observe(&mut self, id: &str) {
        if !self.connected {
            return;
        }
        if !self.observed.iter().any(|o| o == id) {
            self.observed.push(id.to_string());
        }
    }

    /// Stop tracking `id` and forget its measurement.
    pub fn unobserve(&mut self, id: &str) {
        self.observed.retain(|o| o != id);
        self.heights.remove(id);
    }

    pub fn is_observing(&self, id: &str) -> bool {
        self.observed.iter().any(|o| o == id)
    }

    /// Record that some observed element changed size at `now`.
    ///
    /// Each call pushes the deadline out to `now + debounce`.
    pub fn notify_resize(&mut self, now: Instant) {
        if !self.connected {
            return;
        }
        self.deadline = Some(now + self.debounce);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Run the debounced batch if its deadline has passed.
    ///
    /// `measure` returns the current rendered height of a widget, or `None`
    /// if it has not been laid out yet. Unmeasurable and non-positive
    /// heights are left out of the new map so the fallback chain applies.
    /// Returns `true` when a batch ran.
    pub fn poll(&mut self, now: Instant, mut measure: impl FnMut(&str) -> Option<f32>) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {}
            _ => return false,
        }
        self.deadline = None;

        let heights: HashMap<String, f32> = self
            .observed
            .iter()
            .filter_map(|id| {
                measure(id)
                    .filter(|h| h.is_finite() && *h > 0.0)
                    .map(|h| (id.clone(), h))
            })
            .collect();

        tracing::trace!("re-measured {} of {} widgets", heights.len(), self.observed.len());
        self.heights = heights;
        true
    }

    pub fn measured(&self, id: &str) -> Option<f32> {
        self.heights.get(id).copied()
    }

    /// Height to use for layout math: measured, then fixed, then minimum,
    /// then the global default.
    pub fn height_of(&self, widget: &WidgetDescriptor) -> f32 {
        self.measured(&widget.id)
            .or(widget.height)
            .or(widget.min_height)
            .unwrap_or(self.default_min_height)
    }

    /// Tear down: drop pending work and measurements, and ignore further
    /// notifications. A new mount gets a new observer.
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.deadline = None;
        self.observed.clear();
        self.heights.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(150);

    fn observer() -> DimensionObserver {
        let mut obs = DimensionObserver::new(DEBOUNCE, 200.0);
        obs.observe("bio");
        obs.observe("game");
        obs
    }

    #[test]
    fn test_poll_waits_for_debounce() {
        let mut obs = observer();
        let t0 = Instant::now();
        obs.notify_resize(t0);

        assert!(!obs.poll(t0 + Duration::from_millis(100), |_| Some(50.0)));
        assert_eq!(obs.measured("bio"), None);

        assert!(obs.poll(t0 + DEBOUNCE, |_| Some(50.0)));
        assert_eq!(obs.measured("bio"), Some(50.0));
        assert!(!obs.is_pending());
    }

    #[test]
    fn test_repeated_notifications_extend_deadline() {
        let mut obs = observer();
        let t0 = Instant::now();
        obs.notify_resize(t0);
        obs.notify_resize(t0 + Duration::from_millis(100));

        assert!(!obs.poll(t0 + DEBOUNCE, |_| Some(1.0)));
        assert!(obs.poll(t0 + Duration::from_millis(250), |_| Some(1.0)));
    }

    #[test]
    fn test_batch_measures_all_and_replaces_map() {
        let mut obs = observer();
        let t0 = Instant::now();

        obs.notify_resize(t0);
        let mut calls = Vec::new();
        obs.poll(t0 + DEBOUNCE, |id| {
            calls.push(id.to_string());
            Some(if id == "bio" { 180.0 } else { 90.0 })
        });
        assert_eq!(calls, vec!["bio", "game"]);

        // Second batch: "game" is not laid out any more, its stale height goes.
        obs.notify_resize(t0 + DEBOUNCE);
        obs.poll(t0 + DEBOUNCE * 2, |id| (id == "bio").then_some(175.0));
        assert_eq!(obs.measured("bio"), Some(175.0));
        assert_eq!(obs.measured("game"), None);
    }

    #[test]
    fn test_height_fallback_chain() {
        let mut obs = observer();
        let fixed = WidgetDescriptor::new("game", 0.0, 0.0, 100.0)
            .with_height(240.0)
            .with_min_height(120.0);
        let min_only = WidgetDescriptor::new("bio", 0.0, 0.0, 100.0).with_min_height(120.0);
        let bare = WidgetDescriptor::new("other", 0.0, 0.0, 100.0);

        assert_eq!(obs.height_of(&fixed), 240.0);
        assert_eq!(obs.height_of(&min_only), 120.0);
        assert_eq!(obs.height_of(&bare), 200.0);

        let t0 = Instant::now();
        obs.notify_resize(t0);
        obs.poll(t0 + DEBOUNCE, |_| Some(333.0));
        assert_eq!(obs.height_of(&fixed), 333.0);
    }

    #[test]
    fn test_non_positive_measurements_ignored() {
        let mut obs = observer();
        let t0 = Instant::now();
        obs.notify_resize(t0);
        obs.poll(t0 + DEBOUNCE, |_| Some(0.0));
        assert_eq!(obs.measured("bio"), None);
    }

    #[test]
    fn test_disconnect_cancels_pending_batch() {
        let mut obs = observer();
        let t0 = Instant::now();
        obs.notify_resize(t0);
        obs.disconnect();

        assert!(!obs.poll(t0 + DEBOUNCE, |_| Some(10.0)));
        obs.notify_resize(t0 + DEBOUNCE);
        assert!(!obs.is_pending());
        obs.observe("late");
        assert!(!obs.is_observing("late"));
    }

    #[test]
    fn test_disconnect_forgets_measurements() {
        let mut obs = observer();
        let t0 = Instant::now();
        obs.notify_resize(t0);
        obs.poll(t0 + DEBOUNCE, |_| Some(80.0));
        assert_eq!(obs.measured("bio"), Some(80.0));

        obs.disconnect();
        assert_eq!(obs.measured("bio"), None);
    }
}
