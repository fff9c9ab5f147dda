//! Pure geometry helpers: positions, bounds, and pointer coordinates.
//!
//! Everything here is total. Out-of-range input is clamped, never rejected,
//! so callers can feed raw pointer math straight in.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fallback height (px) for a widget that has not been measured and
/// declares neither a fixed nor a minimum height.
pub const DEFAULT_MIN_HEIGHT: f32 = 200.0;

/// Top-left corner of a widget, in pixels relative to the scrollable
/// content origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Position> for Vec2 {
    fn from(p: Position) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Rectangle within which a widget's top-left corner may legally sit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Whether `p` already lies inside the bounds (inclusive).
    pub fn contains(&self, p: Position) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }

    pub fn clamp(&self, p: Position) -> Position {
        clamp_position(p.x, p.y, self)
    }
}

/// Clamp `(x, y)` into `bounds`.
///
/// Computed as `max(min, min(v, max))` per axis, so degenerate bounds
/// (`max < min`) resolve to the minimum edge.
pub fn clamp_position(x: f32, y: f32, bounds: &Bounds) -> Position {
    Position {
        x: bounds.min_x.max(x.min(bounds.max_x)),
        y: bounds.min_y.max(y.min(bounds.max_y)),
    }
}

/// Drag bounds for a widget of the given size inside a container.
///
/// The maxima never go negative: a widget larger than its container can
/// only sit at the origin on that axis.
pub fn compute_bounds(
    widget_width: f32,
    widget_height: f32,
    container_width: f32,
    container_height: f32,
) -> Bounds {
    Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: (container_width - widget_width).max(0.0),
        max_y: (container_height - widget_height).max(0.0),
    }
}

/// One contact point of a touch gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub client_x: f32,
    pub client_y: f32,
}

/// Pointer input as delivered by the windowing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Mouse { client_x: f32, client_y: f32 },
    Touch { touches: Vec<TouchPoint> },
    /// Input with no usable coordinates (synthetic or pen-less events).
    Unknown,
}

/// Horizontal client coordinate of a pointer event.
///
/// Mouse events report their own X; touch events report the first touch
/// point. Anything else yields `0.0`.
pub fn extract_pointer_x(input: &PointerInput) -> f32 {
    match input {
        PointerInput::Mouse { client_x, .. } => *client_x,
        PointerInput::Touch { touches } => touches.first().map_or(0.0, |t| t.client_x),
        PointerInput::Unknown => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(max_x: f32, max_y: f32) -> Bounds {
        Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x,
            max_y,
        }
    }

    #[test]
    fn test_clamp_inside_is_identity() {
        let p = clamp_position(12.0, 40.0, &bounds(100.0, 100.0));
        assert_eq!(p, Position::new(12.0, 40.0));
    }

    #[test]
    fn test_clamp_pulls_each_axis_independently() {
        let b = bounds(500.0, 220.0);
        assert_eq!(clamp_position(-30.0, 300.0, &b), Position::new(0.0, 220.0));
        assert_eq!(clamp_position(650.0, -1.0, &b), Position::new(500.0, 0.0));
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let b = bounds(320.0, 80.0);
        for (x, y) in [(-50.0, 10.0), (1000.0, 1000.0), (160.0, 40.0), (0.0, -0.5)] {
            let once = clamp_position(x, y, &b);
            let twice = clamp_position(once.x, once.y, &b);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_compute_bounds_subtracts_widget_size() {
        let b = compute_bounds(300.0, 200.0, 2400.0, 420.0);
        assert_eq!(b, bounds(2100.0, 220.0));
    }

    #[test]
    fn test_compute_bounds_oversized_widget_collapses_to_origin() {
        let b = compute_bounds(900.0, 600.0, 800.0, 400.0);
        assert_eq!(b.max_x, 0.0);
        assert_eq!(b.max_y, 0.0);
        assert_eq!(b.clamp(Position::new(40.0, 40.0)), Position::ORIGIN);
    }

    #[test]
    fn test_bounds_contains_edges() {
        let b = bounds(10.0, 10.0);
        assert!(b.contains(Position::new(0.0, 10.0)));
        assert!(!b.contains(Position::new(10.5, 0.0)));
    }

    #[test]
    fn test_extract_pointer_x_variants() {
        let mouse = PointerInput::Mouse {
            client_x: 42.0,
            client_y: 7.0,
        };
        assert_eq!(extract_pointer_x(&mouse), 42.0);

        let touch = PointerInput::Touch {
            touches: vec![
                TouchPoint {
                    client_x: 18.0,
                    client_y: 0.0,
                },
                TouchPoint {
                    client_x: 99.0,
                    client_y: 0.0,
                },
            ],
        };
        assert_eq!(extract_pointer_x(&touch), 18.0);

        let empty_touch = PointerInput::Touch { touches: vec![] };
        assert_eq!(extract_pointer_x(&empty_touch), 0.0);
        assert_eq!(extract_pointer_x(&PointerInput::Unknown), 0.0);
    }

    #[test]
    fn test_position_vec2_conversion() {
        let v: Vec2 = Position::new(3.0, 4.0).into();
        assert_eq!(v, Vec2::new(3.0, 4.0));
        assert_eq!(Position::from(v).offset(1.0, -1.0), Position::new(4.0, 3.0));
    }
}
