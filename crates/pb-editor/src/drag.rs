//! Pointer-drag state machine.
//!
//! `Idle → Armed → Dragging → Idle`. The controller never touches an
//! element itself: it turns input into [`DragEvent`]s that the owner applies
//! (switch to pixel placement, move, commit on stop), the same way a tool
//! turns input into mutations.

use crate::input::InputEvent;
use pb_core::{Point, Rect, Vec2};
use smallvec::{SmallVec, smallvec};

/// Pixels the pointer must travel on either axis before a press becomes
/// a drag.
pub const DRAG_THRESHOLD: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragOptions {
    /// Clamp movement to the container box.
    pub contained: bool,
    /// Body cursor while the pointer is held.
    pub cursor: &'static str,
}

impl DragOptions {
    /// Hotspots and guideline handles: clamped to the image.
    pub const CONTAINED: DragOptions = DragOptions {
        contained: true,
        cursor: "move",
    };

    /// Floating dialogs: free movement over the viewport.
    pub const FREE: DragOptions = DragOptions {
        contained: false,
        cursor: "move",
    };
}

/// Live boxes of the dragged element and its container, in the same
/// coordinate space as the pointer. Re-measured for every event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFrame {
    pub element: Rect,
    pub container: Option<Rect>,
}

impl DragFrame {
    pub fn new(element: Rect, container: Option<Rect>) -> Self {
        Self { element, container }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// Threshold crossed. The element switches to pixel placement with its
    /// top-left at `origin` (container-relative when contained).
    Started { origin: Point },
    /// New top-left pixel position, already clamped.
    Moved { position: Point },
    /// Pointer released. `moved` is true only if `Started` was emitted.
    Stopped { moved: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum DragState {
    #[default]
    Idle,
    Armed {
        start: Point,
    },
    Dragging {
        start: Point,
        origin: Point,
    },
}

/// One controller per draggable element.
#[derive(Debug, Clone)]
pub struct DragController {
    options: DragOptions,
    state: DragState,
}

impl DragController {
    pub fn new(options: DragOptions) -> Self {
        Self {
            options,
            state: DragState::Idle,
        }
    }

    pub fn options(&self) -> DragOptions {
        self.options
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Cursor to show on the page while the pointer is held.
    pub fn cursor(&self) -> Option<&'static str> {
        (!self.is_idle()).then(|| self.options().cursor)
    }

    /// Abandon any gesture without emitting events.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    pub fn handle(&mut self, event: &InputEvent, frame: &DragFrame) -> SmallVec<[DragEvent; 2]> {
        match (*event, self.state) {
            (InputEvent::PointerDown { source, .. }, DragState::Idle | DragState::Armed { .. }) => {
                if source.is_primary() {
                    self.state = DragState::Armed {
                        start: event.position(),
                    };
                }
                SmallVec::new()
            }
            (InputEvent::PointerDown { .. }, DragState::Dragging { .. }) => SmallVec::new(),

            (InputEvent::PointerMove { .. }, DragState::Armed { start }) => {
                let delta = event.position() - start;
                if delta.x.abs() < DRAG_THRESHOLD && delta.y.abs() < DRAG_THRESHOLD {
                    return SmallVec::new();
                }
                let origin = match frame.container {
                    Some(container) if self.options().contained => {
                        Point::new(frame.element.x0 - container.x0, frame.element.y0 - container.y0)
                    }
                    _ => frame.element.origin(),
                };
                self.state = DragState::Dragging { start, origin };
                log::debug!("drag started at {origin:?}");
                let position = self.place(origin, delta, frame);
                smallvec![DragEvent::Started { origin }, DragEvent::Moved { position }]
            }
            (InputEvent::PointerMove { .. }, DragState::Dragging { start, origin }) => {
                let position = self.place(origin, event.position() - start, frame);
                smallvec![DragEvent::Moved { position }]
            }
            (InputEvent::PointerMove { .. }, DragState::Idle) => SmallVec::new(),

            (InputEvent::PointerUp { .. }, DragState::Armed { .. }) => {
                self.state = DragState::Idle;
                smallvec![DragEvent::Stopped { moved: false }]
            }
            (InputEvent::PointerUp { .. }, DragState::Dragging { .. }) => {
                self.state = DragState::Idle;
                log::debug!("drag stopped");
                smallvec![DragEvent::Stopped { moved: true }]
            }
            (InputEvent::PointerUp { .. }, DragState::Idle) => SmallVec::new(),
        }
    }

    fn place(&self, origin: Point, delta: Vec2, frame: &DragFrame) -> Point {
        let mut next = origin + delta;
        if let (true, Some(container)) = (self.options().contained, frame.container) {
            let max_x = container.width() - frame.element.width();
            let max_y = container.height() - frame.element.height();
            next.x = next.x.min(max_x).max(0.0);
            next.y = next.y.min(max_y).max(0.0);
        }
        next
    }
}

/// Swallows the click that terminates a drag.
///
/// Armed when a drag stops, cleared on the next event-loop tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickGuard {
    armed: bool,
}

impl ClickGuard {
    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn tick(&mut self) {
        self.armed = false;
    }

    pub fn is_suppressed(&self) -> bool {
        self.armed
    }
}
