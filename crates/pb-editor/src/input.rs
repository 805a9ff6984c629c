//! Pointer input normalised across mouse and touch.
//!
//! Coordinates are page pixels. Touch events are reduced to their first
//! touch point before they get here.

use pb_core::Point;

/// Where a pointer-down came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse { button: i16 },
    Touch,
}

impl PointerSource {
    /// Only the primary mouse button or a touch may start a drag.
    pub fn is_primary(self) -> bool {
        match self {
            PointerSource::Mouse { button } => button == 0,
            PointerSource::Touch => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64, source: PointerSource },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
}

impl InputEvent {
    pub fn position(&self) -> Point {
        match *self {
            InputEvent::PointerDown { x, y, .. }
            | InputEvent::PointerMove { x, y }
            | InputEvent::PointerUp { x, y } => Point::new(x, y),
        }
    }

    pub fn mouse_down(x: f64, y: f64) -> Self {
        InputEvent::PointerDown {
            x,
            y,
            source: PointerSource::Mouse { button: 0 },
        }
    }

    pub fn touch_start(x: f64, y: f64) -> Self {
        InputEvent::PointerDown {
            x,
            y,
            source: PointerSource::Touch,
        }
    }
}
