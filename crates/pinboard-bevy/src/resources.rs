//! Bevy resources for the draggable header.

use std::collections::HashMap;

use bevy::prelude::*;
use pinboard_core::{Position, Viewport, WidgetLayout};

/// The layout engine. Single source of truth for positions and stacking
/// within the ECS; systems watch it via `Res<HeaderLayout>` change detection.
#[derive(Resource, Deref, DerefMut)]
pub struct HeaderLayout(pub WidgetLayout);

/// Measured geometry of the header viewport, in UI pixels.
#[derive(Resource, Debug, Default)]
pub struct HeaderGeometry {
    /// Left edge and width of the scroll viewport.
    pub viewport: Viewport,
    /// Current horizontal scroll offset.
    pub scroll_offset: f32,
    /// Largest valid scroll offset (content width minus viewport width).
    pub max_scroll: f32,
}

/// A pointer drag being tracked against the scroll offset.
#[derive(Debug, Clone)]
pub struct PointerDrag {
    pub widget_id: String,
    /// Widget position when the drag began.
    pub origin: Position,
    pub pointer_start: Vec2,
    /// Latest pointer position.
    pub pointer: Vec2,
    pub scroll_start: f32,
}

impl PointerDrag {
    /// Where the widget should sit for the current pointer and `scroll` offset.
    ///
    /// Scrolling the content under a stationary pointer moves the widget
    /// with it, so edge auto-scroll carries the dragged widget along.
    pub fn live_position(&self, scroll: f32) -> Position {
        let delta = self.pointer - self.pointer_start;
        self.origin
            .offset(delta.x + (scroll - self.scroll_start), delta.y)
    }
}

/// At most one active pointer drag.
#[derive(Resource, Debug, Default)]
pub struct DragSession {
    pub active: Option<PointerDrag>,
}

/// Widget that receives keyboard moves (set by clicking a widget).
#[derive(Resource, Debug, Default)]
pub struct FocusedWidget(pub Option<String>);

/// Entity → widget id, so despawned widgets can be unobserved.
#[derive(Resource, Debug, Default)]
pub struct WidgetEntities(pub HashMap<Entity, String>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_position_tracks_pointer_and_scroll() {
        let drag = PointerDrag {
            widget_id: "bio".into(),
            origin: Position::new(100.0, 50.0),
            pointer_start: Vec2::new(400.0, 120.0),
            pointer: Vec2::new(430.0, 100.0),
            scroll_start: 200.0,
        };
        assert_eq!(drag.live_position(200.0), Position::new(130.0, 30.0));
        assert_eq!(drag.live_position(260.0), Position::new(190.0, 30.0));
    }
}
