//! Hover/focus tooltips.
//!
//! Desktop viewports share one floating tooltip that follows the pointer.
//! Narrow viewports show each hotspot's own inline tooltip, flipped and
//! nudged so it stays inside the image.

use pb_core::{PartIndex, Point, Rect, Size};

/// Vertical distance between the pointer and the floating tooltip.
pub const CURSOR_OFFSET_Y: f64 = 20.0;
/// Space between a hotspot and its inline tooltip.
pub const TOOLTIP_GAP: f64 = 10.0;
/// Minimum distance kept between an inline tooltip and the image edge.
pub const EDGE_MARGIN: f64 = 8.0;
/// Second line of the floating tooltip.
pub const CURSOR_TOOLTIP_CTA: &str = "Click here to learn more";

/// Top-left of the floating tooltip, centred under the pointer.
pub fn cursor_tooltip_origin(pointer: Point, width: f64) -> Point {
    Point::new(pointer.x - width / 2.0, pointer.y + CURSOR_OFFSET_Y)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlinePlacement {
    pub below: bool,
    /// Horizontal shift applied to keep the tooltip inside the image.
    pub nudge: f64,
}

impl InlinePlacement {
    /// Shift for the arrow so it keeps pointing at the hotspot.
    pub fn arrow_offset(&self) -> f64 {
        if self.nudge == 0.0 { 0.0 } else { -self.nudge }
    }

    /// CSS transform relative to the hotspot's horizontal centre.
    pub fn transform(&self) -> String {
        let x = if self.nudge == 0.0 {
            "-50%".to_string()
        } else {
            format!("calc(-50% + {}px)", self.nudge)
        };
        if self.below {
            format!("translate({x}, 0) translateY({TOOLTIP_GAP}px)")
        } else {
            format!("translate({x}, -100%) translateY(-{TOOLTIP_GAP}px)")
        }
    }
}

/// Place an inline tooltip of size `tip` next to `anchor`, inside `bounds`.
///
/// Above by default; below if above would clip the top edge. Then nudged
/// horizontally by the overflow plus [`EDGE_MARGIN`].
pub fn place_inline(anchor: Rect, tip: Size, bounds: Rect) -> InlinePlacement {
    let cx = anchor.center().x;
    let above = Rect::new(
        cx - tip.width / 2.0,
        anchor.y0 - TOOLTIP_GAP - tip.height,
        cx + tip.width / 2.0,
        anchor.y0 - TOOLTIP_GAP,
    );
    let below = above.y0 < bounds.y0;
    let tip_rect = if below {
        Rect::new(
            above.x0,
            anchor.y1 + TOOLTIP_GAP,
            above.x1,
            anchor.y1 + TOOLTIP_GAP + tip.height,
        )
    } else {
        above
    };

    let nudge = if tip_rect.x0 < bounds.x0 {
        bounds.x0 - tip_rect.x0 + EDGE_MARGIN
    } else if tip_rect.x1 > bounds.x1 {
        bounds.x1 - tip_rect.x1 - EDGE_MARGIN
    } else {
        0.0
    };
    InlinePlacement { below, nudge }
}

/// What tooltip, if any, is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum TooltipView {
    Hidden,
    Cursor {
        index: PartIndex,
        title: String,
        origin: Point,
    },
    Inline {
        index: PartIndex,
        placement: InlinePlacement,
    },
}

#[derive(Debug, Clone)]
pub struct TooltipController {
    view: TooltipView,
}

impl Default for TooltipController {
    fn default() -> Self {
        Self::new()
    }
}

impl TooltipController {
    pub fn new() -> Self {
        Self {
            view: TooltipView::Hidden,
        }
    }

    pub fn view(&self) -> &TooltipView {
        &self.view
    }

    pub fn show_cursor(&mut self, index: PartIndex, title: &str, pointer: Point, width: f64) {
        self.view = TooltipView::Cursor {
            index,
            title: title.to_string(),
            origin: cursor_tooltip_origin(pointer, width),
        };
    }

    pub fn show_inline(&mut self, index: PartIndex, anchor: Rect, tip: Size, bounds: Rect) {
        self.view = TooltipView::Inline {
            index,
            placement: place_inline(anchor, tip, bounds),
        };
    }

    /// Follow the pointer. Only the floating tooltip moves.
    pub fn follow(&mut self, pointer: Point, width: f64) {
        if let TooltipView::Cursor { origin, .. } = &mut self.view {
            *origin = cursor_tooltip_origin(pointer, width);
        }
    }

    pub fn hide(&mut self) {
        self.view = TooltipView::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 400.0, 300.0);

    fn hotspot_at(x: f64, y: f64) -> Rect {
        Rect::from_center_size(Point::new(x, y), Size::new(20.0, 20.0))
    }

    #[test]
    fn cursor_tooltip_centres_below_pointer() {
        let origin = cursor_tooltip_origin(Point::new(300.0, 100.0), 160.0);
        assert_eq!(origin, Point::new(220.0, 120.0));
    }

    #[test]
    fn fits_above_without_nudge() {
        let p = place_inline(hotspot_at(200.0, 150.0), Size::new(100.0, 40.0), BOUNDS);
        assert_eq!(p, InlinePlacement { below: false, nudge: 0.0 });
        assert_eq!(p.transform(), "translate(-50%, -100%) translateY(-10px)");
        assert_eq!(p.arrow_offset(), 0.0);
    }

    #[test]
    fn flips_below_near_top_edge() {
        let p = place_inline(hotspot_at(200.0, 30.0), Size::new(100.0, 40.0), BOUNDS);
        assert!(p.below);
        assert_eq!(p.transform(), "translate(-50%, 0) translateY(10px)");
    }

    #[test]
    fn nudges_right_at_left_edge() {
        // tip spans -30..70, so it moves right by 30 + 8
        let p = place_inline(hotspot_at(20.0, 150.0), Size::new(100.0, 40.0), BOUNDS);
        assert_eq!(p.nudge, 38.0);
        assert_eq!(p.arrow_offset(), -38.0);
        assert_eq!(p.transform(), "translate(calc(-50% + 38px), -100%) translateY(-10px)");
    }

    #[test]
    fn nudges_left_at_right_edge() {
        let p = place_inline(hotspot_at(380.0, 30.0), Size::new(100.0, 40.0), BOUNDS);
        assert!(p.below);
        assert_eq!(p.nudge, -38.0);
        assert_eq!(p.arrow_offset(), 38.0);
    }

    #[test]
    fn controller_follows_only_cursor_view() {
        let idx = PartIndex::FIRST;
        let mut tips = TooltipController::new();
        tips.follow(Point::new(1.0, 1.0), 10.0);
        assert_eq!(tips.view(), &TooltipView::Hidden);

        tips.show_cursor(idx, "Motor", Point::new(50.0, 50.0), 40.0);
        tips.follow(Point::new(60.0, 70.0), 40.0);
        assert_eq!(
            tips.view(),
            &TooltipView::Cursor {
                index: idx,
                title: "Motor".into(),
                origin: Point::new(40.0, 90.0),
            }
        );
        tips.hide();
        assert_eq!(tips.view(), &TooltipView::Hidden);
    }
}
