//! Edge-triggered auto-scroll while dragging.
//!
//! ```text
//!            start(x near left)              start(x near right)
//!   ┌──────────────────┐   ◀──── ┌──────┐ ────▶   ┌───────────────────┐
//!   │ Scrolling(Left)  │         │ Idle │         │ Scrolling(Right)  │
//!   └──────────────────┘ ──────▶ └──────┘ ◀────── └───────────────────┘
//!          stop() / start(x away from edges)
//! ```
//!
//! Every `start` call cancels the previous loop before deciding, so a
//! direction change or leaving the edge resolves on the very next frame.

/// Horizontal rectangle of the scroll container, in the same coordinate
/// space as the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub left: f32,
    pub width: f32,
}

impl Viewport {
    pub const fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoScrollState {
    #[default]
    Idle,
    Scrolling(ScrollDirection),
}

#[derive(Debug, Clone)]
pub struct AutoScroll {
    state: AutoScrollState,
    threshold: f32,
    speed: f32,
}

impl AutoScroll {
    pub fn new(threshold: f32, speed: f32) -> Self {
        Self {
            state: AutoScrollState::Idle,
            threshold,
            speed,
        }
    }

    pub fn state(&self) -> AutoScrollState {
        self.state
    }

    pub fn is_scrolling(&self) -> bool {
        self.state != AutoScrollState::Idle
    }

    /// Re-evaluate edge proximity for a new pointer position.
    pub fn start(&mut self, pointer_x: f32, viewport: Viewport) -> AutoScrollState {
        self.stop();

        let from_left = pointer_x - viewport.left;
        let from_right = viewport.left + viewport.width - pointer_x;
        self.state = if from_left < self.threshold {
            AutoScrollState::Scrolling(ScrollDirection::Left)
        } else if from_right < self.threshold {
            AutoScrollState::Scrolling(ScrollDirection::Right)
        } else {
            AutoScrollState::Idle
        };
        self.state
    }

    pub fn stop(&mut self) {
        self.state = AutoScrollState::Idle;
    }

    /// Advance one animation frame: returns the new scroll offset, clamped
    /// to `[0, max_offset]`.
    pub fn tick(&self, offset: f32, max_offset: f32) -> f32 {
        let max_offset = max_offset.max(0.0);
        let next = match self.state {
            AutoScrollState::Idle => return offset,
            AutoScrollState::Scrolling(ScrollDirection::Left) => offset - self.speed,
            AutoScrollState::Scrolling(ScrollDirection::Right) => offset + self.speed,
        };
        next.clamp(0.0, max_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> AutoScroll {
        AutoScroll::new(50.0, 5.0)
    }

    #[test]
    fn test_left_edge_scrolls_left() {
        let mut ctl = controller();
        let vp = Viewport::new(100.0, 800.0);
        assert_eq!(
            ctl.start(110.0, vp),
            AutoScrollState::Scrolling(ScrollDirection::Left)
        );
    }

    #[test]
    fn test_right_edge_scrolls_right() {
        let mut ctl = controller();
        let vp = Viewport::new(0.0, 800.0);
        assert_eq!(
            ctl.start(780.0, vp),
            AutoScrollState::Scrolling(ScrollDirection::Right)
        );
    }

    #[test]
    fn test_middle_is_idle_and_cancels_previous() {
        let mut ctl = controller();
        let vp = Viewport::new(0.0, 800.0);
        ctl.start(5.0, vp);
        assert!(ctl.is_scrolling());
        assert_eq!(ctl.start(400.0, vp), AutoScrollState::Idle);
        assert!(!ctl.is_scrolling());
    }

    #[test]
    fn test_tick_moves_by_speed_and_clamps() {
        let mut ctl = controller();
        let vp = Viewport::new(0.0, 800.0);

        assert_eq!(ctl.tick(40.0, 1600.0), 40.0);

        ctl.start(790.0, vp);
        assert_eq!(ctl.tick(40.0, 1600.0), 45.0);
        assert_eq!(ctl.tick(1598.0, 1600.0), 1600.0);

        ctl.start(1.0, vp);
        assert_eq!(ctl.tick(40.0, 1600.0), 35.0);
        assert_eq!(ctl.tick(2.0, 1600.0), 0.0);
    }

    #[test]
    fn test_stop_returns_to_idle() {
        let mut ctl = controller();
        ctl.start(0.0, Viewport::new(0.0, 800.0));
        ctl.stop();
        assert_eq!(ctl.state(), AutoScrollState::Idle);
    }
}
