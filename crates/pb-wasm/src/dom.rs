//! Reading the server-rendered page and writing view state back to it.

use gloo::utils::{document, window};
use pb_core::style::parse_optional_coord;
use pb_core::{HotspotRecord, HotspotSet, ImageRef, Point, Rect, Size};
use pb_editor::roles::{Found, RoleLookup};
use pb_editor::session::PlacementCss;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlImageElement};

pub const WRAPPER: &str = ".parts-breakout-wrapper";
pub const HOTSPOT: &str = ".part-hotspot";
pub const DROPDOWN_ID: &str = "parts-breakout-dropdown";

pub fn create(tag: &str, class: &str) -> Result<HtmlElement, String> {
    document()
        .create_element(tag)
        .map_err(|e| format!("DOM error: create <{tag}>: {e:?}"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| format!("DOM error: <{tag}> is not an HTML element"))
        .map(|el| {
            el.set_class_name(class);
            el
        })
}

pub fn query(root: &Element, selector: &str) -> Option<HtmlElement> {
    root.query_selector(selector).ok().flatten()?.dyn_into().ok()
}

pub fn query_all(root: &Element, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i)?.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        log::debug!("style {property} rejected: {e:?}");
    }
}

pub fn clear_style(el: &HtmlElement, property: &str) {
    if let Err(e) = el.style().remove_property(property) {
        log::debug!("style {property} not removed: {e:?}");
    }
}

pub fn show(el: &HtmlElement, visible: bool) {
    set_style(el, "display", if visible { "block" } else { "none" });
}

pub fn set_attr(el: &Element, name: &str, value: &str) {
    if let Err(e) = el.set_attribute(name, value) {
        log::warn!("attribute {name} rejected: {e:?}");
    }
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    if let Err(e) = el.class_list().toggle_with_force(class, on) {
        log::warn!("class {class} not toggled: {e:?}");
    }
}

pub fn apply_placement(el: &HtmlElement, css: &PlacementCss) {
    set_style(el, "left", &css.left);
    set_style(el, "top", &css.top);
    set_style(el, "transform", css.transform);
}

/// Viewport-relative box.
pub fn client_rect(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.right(), r.bottom())
}

pub fn scroll_offset() -> (f64, f64) {
    (
        window().scroll_x().unwrap_or(0.0),
        window().scroll_y().unwrap_or(0.0),
    )
}

/// Document-relative box.
pub fn page_rect(el: &Element) -> Rect {
    let (sx, sy) = scroll_offset();
    client_rect(el) + pb_core::Vec2::new(sx, sy)
}

pub fn offset_size(el: &HtmlElement) -> Size {
    Size::new(el.offset_width() as f64, el.offset_height() as f64)
}

pub fn viewport_width() -> f64 {
    window()
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

/// Centre of `el` relative to the top-left of `container`.
pub fn center_within(el: &Element, container: &Element) -> Point {
    pb_core::relative_center(client_rect(el), client_rect(container))
}

// ─── Hotspot scraping ────────────────────────────────────────────────────

fn text_of(root: &Element, selector: &str) -> String {
    query(root, selector)
        .and_then(|el| el.text_content())
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Tooltip body without its title.
fn content_of(root: &Element) -> String {
    let Some(inner) = query(root, ".part-tooltip-inner") else {
        return String::new();
    };
    let Ok(clone) = inner.clone_node_with_deep(true) else {
        return String::new();
    };
    let Ok(clone) = clone.dyn_into::<Element>() else {
        return String::new();
    };
    if let Some(title) = query(&clone, ".part-tooltip-title") {
        title.remove();
    }
    clone.inner_html()
}

fn image_of(root: &Element) -> Option<ImageRef> {
    let img: HtmlImageElement = root.query_selector(".part-hotspot-image").ok()??.dyn_into().ok()?;
    let url = img.src();
    (!url.is_empty()).then_some(ImageRef { id: 0, url })
}

pub fn read_record(el: &HtmlElement) -> HotspotRecord {
    HotspotRecord {
        index: el
            .get_attribute("data-index")
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0),
        left: None,
        top: None,
        style: el.get_attribute("style"),
        line_x: parse_optional_coord(el.get_attribute("data-line-x").as_deref()),
        line_y: parse_optional_coord(el.get_attribute("data-line-y").as_deref()),
        title: text_of(el, ".part-tooltip-title"),
        content: content_of(el),
        image: image_of(el),
    }
}

/// Hotspots of `wrapper` in index order, each paired with its element.
/// Elements without a usable index are left alone.
pub fn read_hotspots(wrapper: &Element) -> (HotspotSet, Vec<HtmlElement>) {
    let mut parts: Vec<_> = query_all(wrapper, HOTSPOT)
        .into_iter()
        .filter_map(|el| match read_record(&el).to_hotspot() {
            Ok(h) => Some((h, el)),
            Err(e) => {
                log::warn!("skipping hotspot element: {e}");
                None
            }
        })
        .collect();
    parts.sort_by_key(|(h, _)| h.index);
    let (hotspots, elements): (Vec<_>, Vec<_>) = parts.into_iter().unzip();
    (HotspotSet::from_parts(hotspots), elements)
}

// ─── Role lookup ─────────────────────────────────────────────────────────

/// Answers role queries for one event target.
pub struct ElementLookup<'a>(pub &'a Element);

impl ElementLookup<'_> {
    fn found(el: Element) -> Found {
        Found {
            data_index: el.get_attribute("data-index"),
        }
    }
}

impl RoleLookup for ElementLookup<'_> {
    fn closest(&self, selector: &str) -> Option<Found> {
        self.0.closest(selector).ok().flatten().map(Self::found)
    }

    fn is(&self, selector: &str) -> Option<Found> {
        self.0
            .matches(selector)
            .unwrap_or(false)
            .then(|| Self::found(self.0.clone()))
    }
}
