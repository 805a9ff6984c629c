//! Integration tests: initial page data → hotspot model (pb-core).

use pb_core::data::FALLBACK_POSITION;
use pb_core::{Container, Guidelines, InitialData, PartIndex, PercentPoint, Placement, Point, Size};
use pretty_assertions::assert_eq;

fn load() -> pb_core::HotspotSet {
    let _ = env_logger::builder().is_test(true).try_init();
    let input = include_str!("fixtures/page_data.json");
    InitialData::from_json(input).unwrap().into_hotspots()
}

fn idx(n: u32) -> PartIndex {
    PartIndex::new(n).unwrap()
}

#[test]
fn records_are_ordered_by_index() {
    let set = load();
    let titles: Vec<&str> = set.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["Drive Motor", "Tank", "Hydraulic Cylinder"]);
}

#[test]
fn unparseable_style_is_centred() {
    let set = load();
    assert_eq!(set.get(idx(2)).unwrap().position, FALLBACK_POSITION);
}

#[test]
fn guidelines_follow_records() {
    let set = load();
    let lines = Guidelines::from_hotspots(&set);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines.get(idx(3)), Some(PercentPoint::new(90.0, 18.0)));
    let cylinder = set.get(idx(3)).unwrap();
    assert_eq!(cylinder.image.as_ref().map(|i| i.id), Some(41));
}

#[test]
fn saved_positions_land_on_the_container() {
    let set = load();
    let container = Container::new(1000.0, 500.0);
    let motor = set.get(idx(1)).unwrap();
    let placement = Placement::Anchored(motor.position);
    let center = placement.center(&container, Size::new(24.0, 24.0));
    assert!((center - Point::new(123.0, 320.0)).hypot() < 1e-9);
    assert_eq!(container.to_percent(center), motor.position);
}
