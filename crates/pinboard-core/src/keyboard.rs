//! Keyboard move state: grab a widget, nudge it with arrows, release to commit.

use crate::geometry::Position;

/// One arrow-key step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Left,
    Right,
    Up,
    Down,
}

impl Nudge {
    /// Offset for one press of `step` pixels.
    pub fn delta(self, step: f32) -> (f32, f32) {
        match self {
            Self::Left => (-step, 0.0),
            Self::Right => (step, 0.0),
            Self::Up => (0.0, -step),
            Self::Down => (0.0, step),
        }
    }
}

/// The widget currently held by the keyboard and where it was picked up.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardGrab {
    pub widget_id: String,
    pub origin: Position,
}
