//! Widget layout orchestrator.
//!
//! Composes the position store, stack order, auto-scroll, and dimension
//! observer behind the drag lifecycle:
//!
//! | Event | Effect |
//! |-------|--------|
//! | drag start | mark dragging, bring to front |
//! | drag move | auto-scroll re-evaluated, optional live position |
//! | drag end | auto-scroll stops, [`WidgetLayout::commit_move`], dragging cleared |
//! | keyboard grab / nudge / release | live moves, release commits via [`WidgetLayout::commit_move`] |
//!
//! Pointer and keyboard input share the one commit path, so no input
//! modality can persist an out-of-bounds position.

use std::time::Instant;

use crate::auto_scroll::{AutoScroll, AutoScrollState, Viewport};
use crate::config::LayoutConfig;
use crate::descriptor::{WidgetDescriptor, validate_descriptors};
use crate::dimensions::DimensionObserver;
use crate::error::LayoutError;
use crate::geometry::{Bounds, PointerInput, Position, Size, compute_bounds, extract_pointer_x};
use crate::keyboard::{KeyboardGrab, Nudge};
use crate::persistence::Persistence;
use crate::positions::{PositionMap, PositionStore, SubscriptionId};
use crate::stack::StackOrder;

/// A pointer drag in progress.
#[derive(Debug, Clone, PartialEq)]
struct ActiveDrag {
    widget_id: String,
    /// Committed position when the gesture began; restored if abandoned.
    origin: Position,
}

#[derive(Debug)]
pub struct WidgetLayout {
    config: LayoutConfig,
    descriptors: Vec<WidgetDescriptor>,
    positions: PositionStore,
    stack: StackOrder,
    auto_scroll: AutoScroll,
    dimensions: DimensionObserver,
    /// Scrollable content width by header height.
    container: Size,
    drag: Option<ActiveDrag>,
    grab: Option<KeyboardGrab>,
}

impl WidgetLayout {
    /// Validate `descriptors`, load persisted positions, and build the layout.
    pub fn new(
        config: LayoutConfig,
        descriptors: Vec<WidgetDescriptor>,
        persistence: Persistence,
    ) -> Result<Self, LayoutError> {
        validate_descriptors(&descriptors)?;

        let positions = PositionStore::load(&descriptors, persistence);
        let stack = StackOrder::new(
            descriptors.iter().map(|d| d.id.clone()),
            config.base_z_index,
            config.active_z_index,
        );
        let auto_scroll = AutoScroll::new(config.edge_threshold, config.scroll_speed);
        let dimensions = new_observer(&config);

        tracing::info!("widget layout ready with {} widgets", descriptors.len());
        Ok(Self {
            config,
            descriptors,
            positions,
            stack,
            auto_scroll,
            dimensions,
            container: Size::default(),
            drag: None,
            grab: None,
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn descriptors(&self) -> &[WidgetDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, id: &str) -> Option<&WidgetDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    /// Storage handle for widget-owned data (`read_widget_data` and friends).
    pub fn persistence(&self) -> &Persistence {
        self.positions.persistence()
    }

    // ── Geometry ────────────────────────────────────────────────────────

    /// Set the scrollable content width and header height that bounds are
    /// computed against.
    pub fn set_container_size(&mut self, container: Size) {
        self.container = container;
    }

    pub fn container_size(&self) -> Size {
        self.container
    }

    /// Height used for `id` in layout math (see [`DimensionObserver::height_of`]).
    pub fn widget_height(&self, id: &str) -> Option<f32> {
        self.descriptor(id).map(|d| self.dimensions.height_of(d))
    }

    pub fn widget_size(&self, id: &str) -> Option<Size> {
        self.descriptor(id)
            .map(|d| Size::new(d.width, self.dimensions.height_of(d)))
    }

    /// Current drag bounds for `id`.
    pub fn bounds_for(&self, id: &str) -> Option<Bounds> {
        let size = self.widget_size(id)?;
        Some(compute_bounds(
            size.width,
            size.height,
            self.container.width,
            self.container.height,
        ))
    }

    // ── Positions ───────────────────────────────────────────────────────

    pub fn position(&self, id: &str) -> Option<Position> {
        self.positions.position(id)
    }

    pub fn positions(&self) -> &PositionMap {
        self.positions.snapshot()
    }

    pub fn has_changes(&self) -> bool {
        self.positions.has_changes()
    }

    /// Live, unpersisted position update (drag feedback, scroll follow).
    pub fn update_position(&mut self, id: &str, position: Position) -> bool {
        self.positions.update_position(id, position)
    }

    pub fn subscribe(
        &mut self,
        listener: impl Fn(&PositionMap) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.positions.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.positions.unsubscribe(id)
    }

    /// Clamp and persist a final position for `id`. Both the pointer and
    /// keyboard paths end here.
    pub fn commit_move(&mut self, id: &str, x: f32, y: f32) -> Option<Position> {
        let widget = self.widget_size(id)?;
        self.positions.save_position(id, x, y, widget, self.container)
    }

    /// Restore all defaults and drop the persisted positions. Any gesture in
    /// flight is abandoned first so it cannot commit stale coordinates.
    pub fn reset(&mut self) {
        self.drag = None;
        self.grab = None;
        self.auto_scroll.stop();
        self.stack.set_dragging(None);
        self.positions.reset();
    }

    // ── Stacking ────────────────────────────────────────────────────────

    pub fn z_index(&self, id: &str) -> i32 {
        self.stack.z_index(id)
    }

    pub fn stack_order(&self) -> &[String] {
        self.stack.order()
    }

    pub fn dragging(&self) -> Option<&str> {
        self.stack.dragging()
    }

    // ── Pointer drag ────────────────────────────────────────────────────

    /// Begin dragging `id`. A drag still marked active is abandoned first.
    pub fn drag_start(&mut self, id: &str) -> bool {
        if self.descriptor(id).is_none() {
            tracing::debug!("drag_start: unknown widget '{id}'");
            return false;
        }
        if let Some(previous) = &self.drag {
            tracing::warn!(
                "drag_start('{id}') while '{}' is still dragging; abandoning it",
                previous.widget_id
            );
            self.abandon_drag();
        }
        let Some(origin) = self.positions.position(id) else {
            return false;
        };

        self.stack.set_dragging(Some(id));
        self.stack.bring_to_front(id);
        self.drag = Some(ActiveDrag {
            widget_id: id.to_string(),
            origin,
        });
        true
    }

    /// Feed a pointer move. Re-evaluates auto-scroll and, when `live` is
    /// given, shows it immediately without persisting.
    pub fn drag_move(
        &mut self,
        pointer: &PointerInput,
        viewport: Viewport,
        live: Option<Position>,
    ) -> AutoScrollState {
        let Some(drag) = &self.drag else {
            return self.auto_scroll.state();
        };
        if let Some(position) = live {
            let id = drag.widget_id.clone();
            self.positions.update_position(&id, position);
        }
        self.auto_scroll.start(extract_pointer_x(pointer), viewport)
    }

    /// Finish dragging `id` at `(x, y)`. Returns the committed (clamped)
    /// position.
    pub fn drag_end(&mut self, id: &str, x: f32, y: f32) -> Option<Position> {
        self.auto_scroll.stop();
        match self.drag.take() {
            Some(drag) if drag.widget_id == id => {}
            Some(drag) => {
                tracing::warn!(
                    "drag_end('{id}') does not match active drag '{}'",
                    drag.widget_id
                );
                self.drag = Some(drag);
                return None;
            }
            None => {
                tracing::debug!("drag_end('{id}') without drag_start");
            }
        }

        let committed = self.commit_move(id, x, y);
        self.stack.set_dragging(None);
        committed
    }

    /// Drop the gesture in flight without committing anything.
    pub fn abandon_drag(&mut self) {
        self.auto_scroll.stop();
        self.stack.set_dragging(None);
        if let Some(drag) = self.drag.take() {
            self.positions.update_position(&drag.widget_id, drag.origin);
            tracing::debug!("abandoned drag of '{}'", drag.widget_id);
        }
    }

    pub fn auto_scroll_state(&self) -> AutoScrollState {
        self.auto_scroll.state()
    }

    /// One auto-scroll animation frame. Returns the new scroll offset.
    pub fn auto_scroll_tick(&self, offset: f32, max_offset: f32) -> f32 {
        self.auto_scroll.tick(offset, max_offset)
    }

    // ── Keyboard ────────────────────────────────────────────────────────

    pub fn grabbed(&self) -> Option<&str> {
        self.grab.as_ref().map(|g| g.widget_id.as_str())
    }

    /// Toggle the keyboard grab on `id`: grabbing picks it up (and brings it
    /// to the front), toggling again releases and commits.
    ///
    /// Returns the committed position on release.
    pub fn toggle_grab(&mut self, id: &str) -> Option<Position> {
        if self.grabbed() == Some(id) {
            return self.release_grab();
        }
        if self.grab.is_some() {
            self.release_grab();
        }
        let origin = self.positions.position(id)?;
        self.stack.bring_to_front(id);
        self.grab = Some(KeyboardGrab {
            widget_id: id.to_string(),
            origin,
        });
        None
    }

    /// Move the grabbed widget one step, clamped to its bounds. Live only.
    pub fn nudge(&mut self, direction: Nudge) -> Option<Position> {
        let id = self.grab.as_ref()?.widget_id.clone();
        let current = self.positions.position(&id)?;
        let bounds = self.bounds_for(&id)?;
        let (dx, dy) = direction.delta(self.config.keyboard_step);
        let next = bounds.clamp(current.offset(dx, dy));
        self.positions.update_position(&id, next);
        Some(next)
    }

    /// Release the keyboard grab, committing the current position.
    pub fn release_grab(&mut self) -> Option<Position> {
        let grab = self.grab.take()?;
        let current = self.positions.position(&grab.widget_id)?;
        self.commit_move(&grab.widget_id, current.x, current.y)
    }

    /// Drop the keyboard grab and put the widget back where it was picked up.
    pub fn cancel_grab(&mut self) {
        if let Some(grab) = self.grab.take() {
            self.positions.update_position(&grab.widget_id, grab.origin);
        }
    }

    // ── Measurement ─────────────────────────────────────────────────────

    pub fn observe_widget(&mut self, id: &str) {
        self.dimensions.observe(id);
    }

    pub fn unobserve_widget(&mut self, id: &str) {
        self.dimensions.unobserve(id);
        if self.drag.as_ref().is_some_and(|d| d.widget_id == id) {
            self.abandon_drag();
        }
        if self.grabbed() == Some(id) {
            self.cancel_grab();
        }
    }

    pub fn resize_pending(&self) -> bool {
        self.dimensions.is_pending()
    }

    pub fn notify_resize(&mut self, now: Instant) {
        self.dimensions.notify_resize(now);
    }

    /// Run the debounced re-measure batch if it is due.
    pub fn poll_dimensions(
        &mut self,
        now: Instant,
        measure: impl FnMut(&str) -> Option<f32>,
    ) -> bool {
        self.dimensions.poll(now, measure)
    }

    /// Unmount: stop auto-scroll, cancel pending measurement, and abandon
    /// any gesture in flight. The next mount starts with a fresh observer.
    pub fn teardown(&mut self) {
        self.abandon_drag();
        self.cancel_grab();
        self.dimensions.disconnect();
        self.dimensions = new_observer(&self.config);
        tracing::debug!("widget layout torn down");
    }
}

fn new_observer(config: &LayoutConfig) -> DimensionObserver {
    DimensionObserver::new(config.resize_debounce(), config.default_min_height)
}
