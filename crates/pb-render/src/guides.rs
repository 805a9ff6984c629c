//! Guideline connectors → 2D line drawing.
//!
//! Every redraw is a full repaint: sync the surface to the container box,
//! clear it, then stroke one segment per hotspot that has a guideline.
//! The line count is small, so there is no incremental diffing.

use pb_core::{Container, Guidelines, Line, PartIndex, Point};
use smallvec::SmallVec;

/// Fixed stroke style for connector lines.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    pub shadow_color: &'static str,
    pub shadow_blur: f64,
    pub shadow_offset: (f64, f64),
}

impl LineStyle {
    pub const WIDTH: f64 = 4.0;
    pub const SHADOW_COLOR: &'static str = "rgba(0, 0, 0, 0.25)";
    pub const SHADOW_BLUR: f64 = 3.0;

    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            width: Self::WIDTH,
            shadow_color: Self::SHADOW_COLOR,
            shadow_blur: Self::SHADOW_BLUR,
            shadow_offset: (1.0, 1.0),
        }
    }
}

/// A drawing target sized in whole device pixels.
///
/// Implemented over a `<canvas>` 2D context in the browser and by recording
/// stubs in tests.
pub trait LineSurface {
    /// Current backing size in pixels.
    fn size(&self) -> (u32, u32);
    fn set_size(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    /// Stroke all segments with one style. Shadow state must not leak to
    /// later draws.
    fn stroke_lines(&mut self, lines: &[Line], style: &LineStyle);
}

/// Segments for a batch redraw. Eight covers a typical page without
/// spilling to the heap.
pub type Segments = SmallVec<[Line; 8]>;

/// Draws connectors with a fixed style.
#[derive(Debug, Clone)]
pub struct GuidelineRenderer {
    style: LineStyle,
}

impl GuidelineRenderer {
    pub fn new(style: LineStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &LineStyle {
        &self.style
    }

    /// Full repaint. The surface is resized before anything is drawn.
    pub fn redraw(&self, surface: &mut dyn LineSurface, container: &Container, lines: &[Line]) {
        let target = (
            container.width.max(0.0).round() as u32,
            container.height.max(0.0).round() as u32,
        );
        if surface.size() != target {
            log::debug!("guide canvas resized to {}x{}", target.0, target.1);
            surface.set_size(target.0, target.1);
        }
        surface.clear();
        if container.is_empty() || lines.is_empty() {
            return;
        }
        surface.stroke_lines(lines, &self.style);
    }
}

/// One segment per guideline, from the hotspot's current centre to the
/// guideline end. `center_of` returns `None` for hotspots that are not on
/// screen, which are skipped.
pub fn static_segments<F>(container: &Container, guidelines: &Guidelines, mut center_of: F) -> Segments
where
    F: FnMut(PartIndex) -> Option<Point>,
{
    guidelines
        .iter()
        .filter_map(|(index, end)| {
            let center = center_of(index)?;
            Some(Line::new(center, container.to_pixels(end)))
        })
        .collect()
}

/// The partially drawn line of the entrance reveal: from the fixed start
/// towards the live centre, `t` of the way there.
pub fn reveal_segments<I>(tracks: I, t: f64) -> Segments
where
    I: IntoIterator<Item = (Point, Point)>,
{
    let t = t.clamp(0.0, 1.0);
    tracks
        .into_iter()
        .map(|(start, live_center)| Line::new(start, start.lerp(live_center, t)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_core::PercentPoint;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        size: (u32, u32),
        ops: Vec<String>,
        strokes: Vec<Line>,
    }

    impl LineSurface for Recorder {
        fn size(&self) -> (u32, u32) {
            self.size
        }
        fn set_size(&mut self, width: u32, height: u32) {
            self.size = (width, height);
            self.ops.push(format!("size {width}x{height}"));
        }
        fn clear(&mut self) {
            self.ops.push("clear".into());
            self.strokes.clear();
        }
        fn stroke_lines(&mut self, lines: &[Line], style: &LineStyle) {
            self.ops.push(format!("stroke {} {}", lines.len(), style.color));
            self.strokes.extend_from_slice(lines);
        }
    }

    fn idx(n: u32) -> PartIndex {
        PartIndex::new(n).unwrap()
    }

    #[test]
    fn redraw_syncs_size_before_drawing() {
        let renderer = GuidelineRenderer::new(LineStyle::with_color("#a92f2e"));
        let mut surface = Recorder::default();
        let line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        renderer.redraw(&mut surface, &Container::new(800.0, 600.0), &[line]);
        assert_eq!(surface.ops, vec!["size 800x600", "clear", "stroke 1 #a92f2e"]);

        surface.ops.clear();
        renderer.redraw(&mut surface, &Container::new(800.0, 600.0), &[line]);
        assert_eq!(surface.ops, vec!["clear", "stroke 1 #a92f2e"]);
    }

    #[test]
    fn redraw_is_idempotent() {
        let renderer = GuidelineRenderer::new(LineStyle::with_color("#000"));
        let mut surface = Recorder::default();
        let lines = [Line::new(Point::new(1.0, 2.0), Point::new(3.0, 4.0))];
        let container = Container::new(100.0, 100.0);
        renderer.redraw(&mut surface, &container, &lines);
        renderer.redraw(&mut surface, &container, &lines);
        assert_eq!(surface.strokes, lines.to_vec());
    }

    #[test]
    fn empty_container_only_clears() {
        let renderer = GuidelineRenderer::new(LineStyle::with_color("#000"));
        let mut surface = Recorder::default();
        surface.size = (5, 5);
        let line = Line::new(Point::ORIGIN, Point::new(1.0, 1.0));
        renderer.redraw(&mut surface, &Container::default(), &[line]);
        assert_eq!(surface.ops, vec!["size 0x0", "clear"]);
    }

    #[test]
    fn static_segments_skip_missing_centers() {
        let container = Container::new(200.0, 100.0);
        let mut lines = Guidelines::new();
        lines.set(idx(1), PercentPoint::new(50.0, 50.0));
        lines.set(idx(2), PercentPoint::new(0.0, 0.0));
        let segments = static_segments(&container, &lines, |i| {
            (i == idx(1)).then_some(Point::new(20.0, 30.0))
        });
        assert_eq!(
            segments.to_vec(),
            vec![Line::new(Point::new(20.0, 30.0), Point::new(100.0, 50.0))]
        );
    }

    #[test]
    fn reveal_interpolates_toward_live_center() {
        let start = Point::new(0.0, 0.0);
        let center = Point::new(100.0, 40.0);
        let half = reveal_segments([(start, center)], 0.5);
        assert_eq!(half[0], Line::new(start, Point::new(50.0, 20.0)));
        let over = reveal_segments([(start, center)], 1.5);
        assert_eq!(over[0].p1, center);
        let zero = reveal_segments([(start, center)], 0.0);
        assert_eq!(zero[0].p1, start);
        let under = reveal_segments([(start, center)], -0.25);
        assert_eq!(under[0].p1, start);
    }

    #[test]
    fn default_style_matches_connector_look() {
        let style = LineStyle::with_color("#0073aa");
        assert_eq!(style.width, 4.0);
        assert_eq!(style.shadow_blur, 3.0);
        assert_eq!(style.shadow_offset, (1.0, 1.0));
        assert_eq!(style.shadow_color, "rgba(0, 0, 0, 0.25)");
    }
}
