//! Integration tests: whole-session flows (pb-editor).
//!
//! Drives a `BreakoutSession` the way the page host does and checks the
//! visible state and the requests that reach the backing store.

use pb_core::{
    BreakoutConfig, Container, Hotspot, HotspotSet, InitialData, Line, PartIndex, PercentPoint,
    Placement, Point, Size,
};
use pb_editor::persist::{Completion, NewPart, PartUpdate};
use pb_editor::session::{ClickContext, ClickResponse, Collaborators, Status};
use pb_editor::store::StoredPart;
use pb_editor::{
    BreakoutSession, ContentEditor, Hit, ImagePicker, InputEvent, MemoryStore, PageHost,
    PersistenceApi, PositionUpdate, Role,
};
use pb_render::{LineStyle, LineSurface};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

const FIXTURE: &str = include_str!("fixtures/viewer_page.json");
const CONTAINER: Container = Container::new(800.0, 600.0);

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn idx(n: u32) -> PartIndex {
    PartIndex::new(n).unwrap()
}

// ─── Recording collaborators ────────────────────────────────────────────

#[derive(Default)]
struct PageLog {
    alerts: RefCell<Vec<String>>,
    reloads: RefCell<u32>,
    confirm: bool,
}

struct Host(Rc<PageLog>);

impl PageHost for Host {
    fn alert(&self, message: &str) {
        self.0.alerts.borrow_mut().push(message.to_string());
    }
    fn confirm(&self, _message: &str) -> bool {
        self.0.confirm
    }
    fn reload(&self) {
        *self.0.reloads.borrow_mut() += 1;
    }
    fn navigate(&self, _url: &str) {}
}

struct Editor(String);

impl ContentEditor for Editor {
    fn init(&mut self, _id: &str, html: &str) {
        self.0 = html.to_string();
    }
    fn content(&self) -> String {
        self.0.clone()
    }
    fn set_content(&mut self, html: &str) {
        self.0 = html.to_string();
    }
    fn dispose(&mut self) {
        self.0.clear();
    }
}

struct NoPicker;

impl ImagePicker for NoPicker {
    fn open(&mut self, _title: &str) {}
}

#[derive(Clone, Default)]
struct Canvas(Rc<RefCell<Vec<Line>>>);

impl LineSurface for Canvas {
    fn size(&self) -> (u32, u32) {
        (800, 600)
    }
    fn set_size(&mut self, _w: u32, _h: u32) {}
    fn clear(&mut self) {
        self.0.borrow_mut().clear();
    }
    fn stroke_lines(&mut self, lines: &[Line], _style: &LineStyle) {
        self.0.borrow_mut().extend_from_slice(lines);
    }
}

/// Swallows every request; for viewer pages that never persist.
struct Offline;

impl PersistenceApi for Offline {
    fn update_position(&self, _update: PositionUpdate) {}
    fn create_part(&self, _part: NewPart, _done: Completion) {}
    fn update_part(&self, _update: PartUpdate, _done: Completion) {}
}

struct Page {
    session: BreakoutSession,
    log: Rc<PageLog>,
    canvas: Canvas,
}

fn mount(config: BreakoutConfig, hotspots: HotspotSet, persistence: Rc<dyn PersistenceApi>) -> Page {
    init_logger();
    let log = Rc::new(PageLog {
        confirm: true,
        ..PageLog::default()
    });
    let canvas = Canvas::default();
    let count = hotspots.len() as u32;
    let mut session = BreakoutSession::new(
        config,
        hotspots,
        Collaborators {
            persistence,
            host: Rc::new(Host(log.clone())),
            editor: Box::new(Editor(String::new())),
            picker: Box::new(NoPicker),
            surface: Box::new(canvas.clone()),
        },
    );
    for n in 1..=count {
        session.set_element_size(idx(n), Size::new(20.0, 20.0));
        session.set_handle_size(idx(n), Size::new(12.0, 12.0));
    }
    session.resize(CONTAINER, Point::ORIGIN);
    Page { session, log, canvas }
}

fn desktop() -> ClickContext {
    ClickContext {
        viewport_width: 1280.0,
        dialog_title: None,
    }
}

fn on(role: Role, n: u32) -> Option<Hit> {
    Some(Hit {
        role,
        index: PartIndex::new(n),
    })
}

fn editor_store() -> Rc<RefCell<MemoryStore>> {
    let part = |title: &str, left: f64, top: f64, line: Option<(f64, f64)>| StoredPart {
        image_id: 0,
        title: title.into(),
        content: format!("<p>{title}</p>"),
        left,
        top,
        line_x: line.map(|l| l.0),
        line_y: line.map(|l| l.1),
    };
    Rc::new(RefCell::new(MemoryStore::new().with_post(
        7,
        vec![
            part("Motor", 10.0, 10.0, Some((10.0, 50.0))),
            part("Pump", 50.0, 50.0, Some((90.0, 50.0))),
            part("Valve", 80.0, 20.0, Some((80.0, 90.0))),
        ],
    )))
}

fn editor_page(store: &Rc<RefCell<MemoryStore>>) -> Page {
    let config = BreakoutConfig {
        can_edit: true,
        post_id: 7,
        ..BreakoutConfig::default()
    };
    let hotspots = store.borrow().hotspots(7);
    mount(config, hotspots, Rc::new(store.clone()))
}

// ─── Viewer ─────────────────────────────────────────────────────────────

#[test]
fn viewer_opens_panel_and_escape_closes_it() {
    let value: serde_json::Value = serde_json::from_str(FIXTURE).unwrap();
    let config = BreakoutConfig::from_json(&value["config"].to_string()).unwrap();
    let hotspots = InitialData::from_json(FIXTURE).unwrap().into_hotspots();
    assert_eq!(hotspots.len(), 2);
    assert_eq!(
        hotspots.get(idx(2)).unwrap().guideline,
        Some(PercentPoint::new(30.0, 40.0))
    );

    let mut page = mount(config, hotspots, Rc::new(Offline));
    assert!(page.session.is_loading());

    let response = page.session.click(on(Role::Hotspot, 1), &desktop());
    assert_eq!(response, ClickResponse::Consumed);
    let panel = page.session.panel().content().unwrap();
    assert_eq!(panel.title, "Drive Motor");
    let html = panel.to_html();
    assert!(html.starts_with("<h2>Drive Motor</h2><p>Three-phase drive motor.</p>"));
    assert!(html.contains("REQUEST ESTIMATE"));
    assert!(!html.contains("Edit Part"));

    page.session.key_up("Escape");
    assert!(!page.session.panel().is_open());
}

#[test]
fn entrance_reveals_then_draws_connectors() {
    let hotspots = HotspotSet::from_parts(vec![
        Hotspot::new(idx(1), PercentPoint::new(25.0, 25.0)).with_guideline(PercentPoint::new(25.0, 75.0)),
        Hotspot::new(idx(1), PercentPoint::new(50.0, 50.0)),
        Hotspot::new(idx(1), PercentPoint::new(75.0, 25.0)).with_guideline(PercentPoint::new(75.0, 75.0)),
    ]);
    let mut page = mount(BreakoutConfig::default(), hotspots, Rc::new(Offline));
    assert!(page.session.begin_entrance());
    assert_eq!(page.session.status(), Status::Revealing);
    assert!(page.canvas.0.borrow().is_empty());

    let view = |page: &Page, n: u32| page.session.view(idx(n)).unwrap().clone();
    assert_eq!(view(&page, 1).placement, Placement::Anchored(PercentPoint::new(25.0, 75.0)));
    // No guideline: starts where it ends.
    assert_eq!(view(&page, 2).placement, Placement::Anchored(PercentPoint::new(50.0, 50.0)));
    assert_eq!(view(&page, 2).opacity, 0.0);

    let settled = |_: PartIndex| -> Option<Point> { None };
    assert!(page.session.entrance_frame(0.0, &settled));
    assert_eq!(view(&page, 1).opacity, 1.0);
    assert_eq!(view(&page, 1).placement, Placement::Anchored(PercentPoint::new(25.0, 25.0)));
    assert_eq!(view(&page, 2).opacity, 0.0);
    assert!(view(&page, 2).transition.is_some());

    page.session.entrance_frame(250.0, &settled);
    assert_eq!(view(&page, 3).opacity, 1.0);
    assert!(page.canvas.0.borrow().is_empty());

    // Draw starts 240 + 1100 ms in; half-way at +300 ms.
    page.session.entrance_frame(1640.0, &settled);
    assert_eq!(
        *page.canvas.0.borrow(),
        vec![
            Line::new(Point::new(200.0, 450.0), Point::new(200.0, 300.0)),
            Line::new(Point::new(600.0, 450.0), Point::new(600.0, 300.0)),
        ]
    );

    assert!(!page.session.entrance_frame(1940.0, &settled));
    assert_eq!(page.session.status(), Status::Ready);
    assert!(page.session.animations_ready());
    assert_eq!(
        *page.canvas.0.borrow(),
        vec![
            Line::new(Point::new(200.0, 150.0), Point::new(200.0, 450.0)),
            Line::new(Point::new(600.0, 150.0), Point::new(600.0, 450.0)),
        ]
    );
}

#[test]
fn empty_page_skips_entrance() {
    let mut page = mount(BreakoutConfig::default(), HotspotSet::new(), Rc::new(Offline));
    assert!(!page.session.begin_entrance());
    assert_eq!(page.session.status(), Status::Ready);
    assert!(page.session.animations_ready());
}

// ─── Editor ─────────────────────────────────────────────────────────────

#[test]
fn editor_drag_commits_exact_percentages() {
    let store = editor_store();
    let mut page = editor_page(&store);
    assert!(!page.session.begin_entrance());

    // Hotspot 1 centre is (80, 60); (60%, 25%) is (480, 150).
    page.session.pointer_down(on(Role::Hotspot, 1), InputEvent::mouse_down(80.0, 60.0));
    page.session.pointer_move(InputEvent::PointerMove { x: 280.0, y: 100.0 });
    page.session.pointer_move(InputEvent::PointerMove { x: 480.0, y: 150.0 });
    assert_eq!(page.session.indicator().unwrap().text, "X: 60%  Y: 25%");
    page.session.pointer_up(InputEvent::PointerUp { x: 480.0, y: 150.0 });

    let target = PercentPoint::new(60.0, 25.0);
    assert_eq!(
        page.session.view(idx(1)).unwrap().placement,
        Placement::Anchored(target)
    );
    let store = store.borrow();
    assert_eq!(store.history(), &[PositionUpdate::moved(7, idx(1), target)]);
    assert_eq!((store.parts(7)[0].left, store.parts(7)[0].top), (60.0, 25.0));
}

#[test]
fn handle_snaps_onto_nearby_endpoint() {
    let store = editor_store();
    let mut page = editor_page(&store);

    // Pump's end is (720, 300); drop Valve's end 10px away from it.
    page.session.pointer_down(
        on(Role::GuidelineHandle, 3),
        InputEvent::mouse_down(640.0, 540.0),
    );
    page.session.pointer_move(InputEvent::PointerMove { x: 730.0, y: 300.0 });
    page.session.pointer_up(InputEvent::PointerUp { x: 730.0, y: 300.0 });

    let end = PercentPoint::new(90.0, 50.0);
    assert_eq!(page.session.guidelines().get(idx(3)), Some(end));
    assert_eq!(store.borrow().parts(7)[2].line_x, Some(90.0));
    assert_eq!(store.borrow().parts(7)[2].line_y, Some(50.0));
}

#[test]
fn delete_middle_part_keeps_store_in_step() {
    let store = editor_store();
    let mut page = editor_page(&store);

    page.session.click(on(Role::RemoveButton, 2), &desktop());
    let titles: Vec<&str> = page.session.hotspots().iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["Motor", "Valve"]);
    assert_eq!(page.session.guidelines().len(), 2);
    assert_eq!(
        page.session.guidelines().get(idx(2)),
        Some(PercentPoint::new(80.0, 90.0))
    );
    assert!(!page.session.guidelines().contains(idx(3)));
    assert_eq!(page.canvas.0.borrow().len(), 2);

    // The part now at index 2 is the store's index 2 as well.
    page.session.pointer_down(on(Role::Hotspot, 2), InputEvent::mouse_down(640.0, 120.0));
    page.session.pointer_move(InputEvent::PointerMove { x: 640.0, y: 180.0 });
    page.session.pointer_up(InputEvent::PointerUp { x: 640.0, y: 180.0 });

    let store = store.borrow();
    let parts = store.parts(7);
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[1].title, "Valve");
    assert_eq!(parts[1].top, 30.0);
}

#[test]
fn add_part_saves_and_reloads() {
    let store = editor_store();
    let mut page = editor_page(&store);

    page.session.click(on(Role::AddPart, 0), &desktop());
    let ctx = ClickContext {
        dialog_title: Some("  Gearbox ".into()),
        ..desktop()
    };
    page.session.click(on(Role::DialogSave, 0), &ctx);

    assert_eq!(*page.log.reloads.borrow(), 1);
    let store = store.borrow();
    let added = store.parts(7).last().unwrap();
    assert_eq!(added.title, "Gearbox");
    assert_eq!((added.left, added.top), (10.0, 10.0));
    assert_eq!((added.line_x, added.line_y), (Some(50.0), Some(50.0)));
}

#[test]
fn failed_update_alerts_without_reload() {
    let store = editor_store();
    let mut page = editor_page(&store);
    // The store loses the part behind the page's back.
    store
        .borrow_mut()
        .apply_position(&PositionUpdate::delete(7, idx(3)))
        .unwrap();

    page.session.click(on(Role::Hotspot, 3), &desktop());
    page.session.click(on(Role::EditPart, 0), &desktop());
    page.session.save_dialog("Valve");

    assert_eq!(*page.log.reloads.borrow(), 0);
    assert_eq!(
        *page.log.alerts.borrow(),
        vec!["Sorry, the part could not be updated.".to_string()]
    );
}
