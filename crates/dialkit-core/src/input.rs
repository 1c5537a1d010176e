//! Pointer and keyboard events delivered to controls.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Finer motion per pixel.
    pub fn precise(&self) -> bool {
        self.ctrl
    }

    /// Coarser motion per pixel. Ignored when precise is also held.
    pub fn coarse(&self) -> bool {
        self.shift && !self.ctrl
    }
}

/// Pointer event in widget-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    /// Positive `delta.y` scrolls up (away from the user).
    Scroll {
        position: Point,
        delta: Vec2,
    },
    DoubleClick {
        position: Point,
        button: MouseButton,
    },
    /// Pointer left the widget.
    Leave,
}

impl PointerEvent {
    pub fn position(&self) -> Option<Point> {
        match *self {
            Self::Down { position, .. }
            | Self::Up { position, .. }
            | Self::Move { position }
            | Self::Scroll { position, .. }
            | Self::DoubleClick { position, .. } => Some(position),
            Self::Leave => None,
        }
    }
}

/// Keys the controls react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Ctrl,
    Shift,
    Tab,
    Escape,
    Enter,
    Char(char),
}

/// Keyboard event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

/// Double-click detection constants.
pub const DOUBLE_CLICK_TIME_MS: u64 = 500;
pub const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Turns a stream of presses into presses and double-clicks for hosts that only
/// report raw button events.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last: Option<(Instant, Point, MouseButton)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a press at `now`. A second press of the same button close in time
    /// and space becomes a [`PointerEvent::DoubleClick`].
    pub fn press(&mut self, position: Point, button: MouseButton, now: Instant) -> PointerEvent {
        if let Some((time, last_pos, last_button)) = self.last {
            let elapsed = now.saturating_duration_since(time);
            if last_button == button
                && elapsed < Duration::from_millis(DOUBLE_CLICK_TIME_MS)
                && last_pos.distance(position) < DOUBLE_CLICK_DISTANCE
            {
                // A third click starts a new sequence.
                self.last = None;
                return PointerEvent::DoubleClick { position, button };
            }
        }
        self.last = Some((now, position, button));
        PointerEvent::Down { position, button }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_roles() {
        assert!(Modifiers::CTRL.precise());
        assert!(!Modifiers::CTRL.coarse());
        assert!(Modifiers::SHIFT.coarse());
        let both = Modifiers {
            shift: true,
            ctrl: true,
            ..Default::default()
        };
        assert!(both.precise());
        assert!(!both.coarse());
        assert!(!Modifiers::NONE.precise());
    }

    #[test]
    fn test_event_position() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(PointerEvent::Move { position: p }.position(), Some(p));
        assert_eq!(PointerEvent::Leave.position(), None);
    }

    #[test]
    fn test_double_click_detection() {
        let mut clicks = ClickTracker::new();
        let pos = Point::new(100.0, 100.0);
        let t0 = Instant::now();

        let first = clicks.press(pos, MouseButton::Left, t0);
        assert!(matches!(first, PointerEvent::Down { .. }));

        let second = clicks.press(pos, MouseButton::Left, t0 + Duration::from_millis(120));
        assert!(matches!(second, PointerEvent::DoubleClick { .. }));

        // Third press starts over.
        let third = clicks.press(pos, MouseButton::Left, t0 + Duration::from_millis(200));
        assert!(matches!(third, PointerEvent::Down { .. }));
    }

    #[test]
    fn test_double_click_too_far() {
        let mut clicks = ClickTracker::new();
        let t0 = Instant::now();
        clicks.press(Point::new(100.0, 100.0), MouseButton::Left, t0);
        let second = clicks.press(
            Point::new(200.0, 200.0),
            MouseButton::Left,
            t0 + Duration::from_millis(50),
        );
        assert!(matches!(second, PointerEvent::Down { .. }));
    }

    #[test]
    fn test_double_click_too_slow() {
        let mut clicks = ClickTracker::new();
        let pos = Point::new(10.0, 10.0);
        let t0 = Instant::now();
        clicks.press(pos, MouseButton::Left, t0);
        let second = clicks.press(pos, MouseButton::Left, t0 + Duration::from_millis(900));
        assert!(matches!(second, PointerEvent::Down { .. }));
    }

    #[test]
    fn test_double_click_needs_same_button() {
        let mut clicks = ClickTracker::new();
        let pos = Point::new(10.0, 10.0);
        let t0 = Instant::now();
        clicks.press(pos, MouseButton::Left, t0);
        let second = clicks.press(pos, MouseButton::Right, t0 + Duration::from_millis(50));
        assert!(matches!(second, PointerEvent::Down { button: MouseButton::Right, .. }));
    }
}
