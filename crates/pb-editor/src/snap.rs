//! Guideline endpoint snapping.
//!
//! Two stages, in order: snap onto another guideline's endpoint within
//! [`SNAP_RADIUS`]; failing that, lock the axis with the smaller offset from
//! the owning hotspot's centre so the connector is straight.

use pb_core::{Container, Guidelines, PartIndex, PercentPoint, Point};

/// Pixel distance under which an endpoint snaps onto another endpoint.
pub const SNAP_RADIUS: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    /// Landed exactly on another hotspot's guideline end.
    Endpoint(PartIndex),
    /// x locked to the hotspot centre.
    Vertical,
    /// y locked to the hotspot centre.
    Horizontal,
    /// Owner centre unknown; the proposed point is used as is.
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOutcome {
    pub pixel: Point,
    pub percent: PercentPoint,
    pub kind: SnapKind,
}

/// Closest other endpoint strictly inside the snap radius.
pub fn snap_to_endpoints(
    owner: PartIndex,
    proposed: Point,
    guidelines: &Guidelines,
    container: &Container,
) -> Option<(PartIndex, Point)> {
    let mut best: Option<(PartIndex, Point)> = None;
    let mut best_dist = SNAP_RADIUS;
    for (index, end) in guidelines.iter() {
        if index == owner {
            continue;
        }
        let other = container.to_pixels(end);
        let dist = proposed.distance(other);
        if dist < best_dist {
            best_dist = dist;
            best = Some((index, other));
        }
    }
    best
}

/// Lock whichever axis is closer to `center`.
pub fn snap_to_axis(proposed: Point, center: Point) -> (Point, SnapKind) {
    let dx = (proposed.x - center.x).abs();
    let dy = (proposed.y - center.y).abs();
    if dx < dy {
        (Point::new(center.x, proposed.y), SnapKind::Vertical)
    } else {
        (Point::new(proposed.x, center.y), SnapKind::Horizontal)
    }
}

/// Resolve a dragged handle centre to the guideline end to store.
///
/// The axis fallback applies whenever the endpoint stage leaves the point
/// unchanged, including an endpoint sitting exactly under the pointer.
pub fn resolve(
    owner: PartIndex,
    proposed: Point,
    owner_center: Option<Point>,
    guidelines: &Guidelines,
    container: &Container,
) -> SnapOutcome {
    let endpoint = snap_to_endpoints(owner, proposed, guidelines, container)
        .filter(|(_, snapped)| *snapped != proposed);
    let (pixel, kind) = match (endpoint, owner_center) {
        (Some((index, snapped)), _) => (snapped, SnapKind::Endpoint(index)),
        (None, Some(center)) => snap_to_axis(proposed, center),
        (None, None) => (proposed, SnapKind::Free),
    };
    let percent = container.to_percent(pixel);
    log::debug!("guideline {owner} snapped {kind:?} to {percent}");
    SnapOutcome {
        pixel,
        percent,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONTAINER: Container = Container::new(1000.0, 500.0);

    fn idx(n: u32) -> PartIndex {
        PartIndex::new(n).unwrap()
    }

    fn lines() -> Guidelines {
        let mut g = Guidelines::new();
        // (200, 100) px
        g.set(idx(1), PercentPoint::new(20.0, 20.0));
        // (600, 250) px
        g.set(idx(2), PercentPoint::new(60.0, 50.0));
        g
    }

    #[test]
    fn nearby_endpoint_wins_exactly() {
        let proposed = Point::new(606.0, 258.0);
        let out = resolve(idx(1), proposed, Some(Point::ORIGIN), &lines(), &CONTAINER);
        assert_eq!(out.kind, SnapKind::Endpoint(idx(2)));
        assert_eq!(out.pixel, Point::new(600.0, 250.0));
        assert_eq!(out.percent, PercentPoint::new(60.0, 50.0));
    }

    #[test]
    fn own_endpoint_is_ignored() {
        let proposed = Point::new(205.0, 100.0);
        assert_eq!(snap_to_endpoints(idx(1), proposed, &lines(), &CONTAINER), None);
    }

    #[test]
    fn radius_is_exclusive() {
        let proposed = Point::new(625.0, 250.0);
        assert_eq!(snap_to_endpoints(idx(1), proposed, &lines(), &CONTAINER), None);
        let proposed = Point::new(624.9, 250.0);
        assert!(snap_to_endpoints(idx(1), proposed, &lines(), &CONTAINER).is_some());
    }

    #[test]
    fn closest_endpoint_wins() {
        let mut g = lines();
        g.set(idx(3), PercentPoint::new(61.0, 50.0));
        let found = snap_to_endpoints(idx(1), Point::new(609.0, 250.0), &g, &CONTAINER);
        assert_eq!(found, Some((idx(3), Point::new(610.0, 250.0))));
    }

    #[test]
    fn far_endpoint_falls_back_to_horizontal_line() {
        // 40px from the other endpoint, closer to the centre row than column.
        let center = Point::new(300.0, 240.0);
        let proposed = Point::new(640.0, 250.0);
        let out = resolve(idx(1), proposed, Some(center), &lines(), &CONTAINER);
        assert_eq!(out.kind, SnapKind::Horizontal);
        assert_eq!(out.pixel.y, center.y);
        assert_eq!(out.pixel.x, proposed.x);
        assert_eq!(out.percent, PercentPoint::new(64.0, 48.0));
    }

    #[test]
    fn far_endpoint_falls_back_to_vertical_line() {
        let center = Point::new(400.0, 100.0);
        let proposed = Point::new(410.0, 400.0);
        let out = resolve(idx(1), proposed, Some(center), &lines(), &CONTAINER);
        assert_eq!(out.kind, SnapKind::Vertical);
        assert_eq!(out.pixel, Point::new(400.0, 400.0));
    }

    #[test]
    fn equal_offsets_lock_y() {
        let (p, kind) = snap_to_axis(Point::new(10.0, 10.0), Point::ORIGIN);
        assert_eq!(kind, SnapKind::Horizontal);
        assert_eq!(p, Point::new(10.0, 0.0));
    }

    #[test]
    fn endpoint_under_pointer_still_axis_snaps() {
        let center = Point::new(600.0, 0.0);
        let out = resolve(idx(1), Point::new(600.0, 250.0), Some(center), &lines(), &CONTAINER);
        assert_eq!(out.kind, SnapKind::Vertical);
    }

    #[test]
    fn missing_owner_center_keeps_point() {
        let out = resolve(idx(9), Point::new(10.0, 10.0), None, &Guidelines::new(), &CONTAINER);
        assert_eq!(out.kind, SnapKind::Free);
        assert_eq!(out.percent, PercentPoint::new(1.0, 2.0));
    }
}
