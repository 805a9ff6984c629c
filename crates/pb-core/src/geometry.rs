//! Percentage ↔ pixel conversion against the responsive container.
//!
//! The container box is re-measured whenever the page layout changes
//! (resize, image decode, admin bar toggle). Nothing here caches pixels
//! across those events: callers hold a [`Container`] for at most one frame.

use crate::model::PercentPoint;
use kurbo::{Point, Rect, Size};

/// Pixel size of the element hotspots are positioned against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Container {
    pub width: f64,
    pub height: f64,
}

impl Container {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True until layout has settled and the box has a real size.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The container box in its own coordinate space.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size())
    }

    /// Container-relative pixels → percentages, rounded to one decimal.
    ///
    /// A zero-sized container yields `(0, 0)`.
    pub fn to_percent(&self, px: Point) -> PercentPoint {
        if self.is_empty() {
            return PercentPoint::default();
        }
        PercentPoint::rounded(px.x / self.width * 100.0, px.y / self.height * 100.0)
    }

    /// Percentages → container-relative pixels.
    pub fn to_pixels(&self, pct: PercentPoint) -> Point {
        if self.is_empty() {
            return Point::ORIGIN;
        }
        Point::new(pct.x / 100.0 * self.width, pct.y / 100.0 * self.height)
    }
}

/// How an element is currently positioned inside the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Centred on a percentage coordinate (`translate(-50%, -50%)`).
    Anchored(PercentPoint),
    /// Top-left corner pinned at a container-relative pixel offset, as
    /// used while the element is being dragged.
    Pixel(Point),
}

impl Placement {
    /// The element's box for a given rendered size.
    pub fn element_box(&self, container: &Container, size: Size) -> Rect {
        match self {
            Placement::Anchored(pct) => Rect::from_center_size(container.to_pixels(*pct), size),
            Placement::Pixel(origin) => Rect::from_origin_size(*origin, size),
        }
    }

    /// Container-relative centre of the element's rendered box.
    pub fn center(&self, container: &Container, size: Size) -> Point {
        self.element_box(container, size).center()
    }
}

/// Centre of a hotspot's rendered box, relative to the container.
///
/// Takes the element's size into account, so it stays correct while the
/// element is pixel-positioned by its top-left corner during a drag.
pub fn hotspot_center_pixel(container: &Container, placement: &Placement, size: Size) -> Point {
    placement.center(container, size)
}

/// Centre of `element` relative to `container`, both in the same
/// (page or client) coordinate space.
pub fn relative_center(element: Rect, container: Rect) -> Point {
    let center = element.center();
    Point::new(center.x - container.x0, center.y - container.y0)
}
