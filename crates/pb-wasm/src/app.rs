//! Page wiring.
//!
//! `PageApp` owns the session, the elements it renders into, and every
//! listener. One delegated listener per event type sits on the document;
//! each event is resolved to a role once and handed to the session, then
//! the session's view state is written back to the DOM.

use crate::canvas2d::CanvasSurface;
use crate::dom::{self, ElementLookup};
use crate::editors::{BrowserHost, MediaPicker, TinyMceEditor};
use crate::http::RestClient;
use gloo::events::{EventListener, EventListenerOptions};
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use gloo::utils::{body, document, window};
use js_sys::Reflect;
use pb_core::{BreakoutConfig, Container, ImageRef, PartIndex, Point, is_desktop_width};
use pb_editor::dialog::{DialogMode, PartDialog};
use pb_editor::session::{
    ClickContext, ClickResponse, Collaborators, Mode, Status, placement_css, toggle_accordion,
};
use pb_editor::tooltip::{CURSOR_TOOLTIP_CTA, TooltipView};
use pb_editor::{BreakoutSession, Hit, InputEvent, PointerSource, Role};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    HtmlSelectElement, KeyboardEvent, MouseEvent, ResizeObserver, TouchEvent,
};

const PAGE_DATA: &str = "partsBreakoutData";
const MAIN_IMAGE: &str = ".parts-breakout-main-image";
const SLIDEOUT_HTML: &str = r#"<div class="parts-slideout" role="dialog" aria-modal="true"><button type="button" class="parts-slideout-close" aria-label="Close">&times;</button><div class="parts-slideout-content"></div></div>"#;
const ADD_BUTTON_HTML: &str = r#"Add Part <span class="pb-plus-icon">+</span>"#;

fn js_err(e: JsValue) -> String {
    format!("DOM error: {e:?}")
}

/// The localized page object, or viewer defaults without one.
fn read_config() -> BreakoutConfig {
    let data = match Reflect::get(&window(), &JsValue::from_str(PAGE_DATA)) {
        Ok(v) if !v.is_undefined() && !v.is_null() => v,
        _ => {
            log::info!("no {PAGE_DATA} on the page; viewer defaults");
            return BreakoutConfig::default();
        }
    };
    let json = js_sys::JSON::stringify(&data)
        .map(String::from)
        .unwrap_or_default();
    BreakoutConfig::from_json(&json).unwrap_or_else(|e| {
        log::warn!("{e}");
        BreakoutConfig::default()
    })
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn index_of(el: &Element) -> Option<PartIndex> {
    el.get_attribute("data-index")?.trim().parse().ok().and_then(PartIndex::new)
}

/// Normalize a mouse or touch event. Coordinates are page-relative.
fn pointer_event(event: &Event) -> Option<InputEvent> {
    let kind = event.type_();
    let (x, y, source) = if let Some(m) = event.dyn_ref::<MouseEvent>() {
        (
            m.page_x() as f64,
            m.page_y() as f64,
            PointerSource::Mouse { button: m.button() },
        )
    } else {
        let t = event.dyn_ref::<TouchEvent>()?;
        let touch = t.touches().get(0).or_else(|| t.changed_touches().get(0))?;
        (touch.page_x() as f64, touch.page_y() as f64, PointerSource::Touch)
    };
    Some(match kind.as_str() {
        "mousedown" | "touchstart" => InputEvent::PointerDown { x, y, source },
        "mousemove" | "touchmove" => InputEvent::PointerMove { x, y },
        _ => InputEvent::PointerUp { x, y },
    })
}

struct DialogDom {
    editor_id: String,
    overlay: HtmlElement,
    form: HtmlElement,
}

impl DialogDom {
    fn build(dialog: &PartDialog) -> Result<Self, String> {
        let prefix = dialog.mode().prefix();
        let save = match dialog.mode() {
            DialogMode::Add => "Save",
            DialogMode::Edit(_) => "Update",
        };
        let overlay = dom::create("div", "parts-add-form-overlay open")?;
        overlay.set_inner_html(&format!(
            r#"<div class="parts-add-form" role="dialog" aria-modal="true"><button type="button" class="parts-add-close" aria-label="Close">&times;</button><h3>{heading}</h3><div class="{prefix}-image-field"><img src="" alt="Preview" class="{prefix}-image-preview" style="max-width:80px;max-height:80px;display:none;" /><button type="button" class="{prefix}-select-image">Select Image</button></div><label style="display:block;margin-top:12px;">Title<br/><input type="text" class="{prefix}-title" required style="width:100%;" /></label><label>Content<br/><textarea id="{id}" class="{prefix}-content" rows="4"></textarea></label><div class="parts-add-actions"><button type="button" class="{prefix}-cancel">Cancel</button><button type="button" class="{prefix}-save button-primary">{save}</button></div></div>"#,
            heading = dialog.mode().heading(),
            id = dialog.editor_id(),
        ));
        let form = dom::query(&overlay, ".parts-add-form")
            .ok_or_else(|| "DOM error: dialog form missing".to_string())?;
        if let Some(input) = dom::query(&overlay, &format!(".{prefix}-title"))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&dialog.initial_title);
        }
        body().append_child(&overlay).map_err(js_err)?;
        Ok(Self {
            editor_id: dialog.editor_id().to_string(),
            overlay,
            form,
        })
    }

    fn update(&self, dialog: &PartDialog) {
        let prefix = dialog.mode().prefix();
        if let Some(img) = dom::query(&self.overlay, &format!(".{prefix}-image-preview")) {
            match &dialog.preview_url {
                Some(url) => {
                    dom::set_attr(&img, "src", url);
                    dom::show(&img, true);
                }
                None => dom::show(&img, false),
            }
        }
        // Pinned in page space; the form itself is viewport-fixed.
        if let Some(at) = dialog.fixed_at() {
            let (sx, sy) = dom::scroll_offset();
            dom::set_style(&self.form, "position", "fixed");
            dom::set_style(&self.form, "left", &format!("{}px", at.x - sx));
            dom::set_style(&self.form, "top", &format!("{}px", at.y - sy));
        }
    }

    fn title_value(&self) -> Option<String> {
        let input = dom::query(&self.overlay, ".parts-add-title, .parts-edit-title")?;
        Some(input.dyn_into::<HtmlInputElement>().ok()?.value())
    }
}

pub struct PageApp {
    session: RefCell<BreakoutSession>,
    wrapper: HtmlElement,
    canvas: HtmlCanvasElement,
    spinner: RefCell<Option<HtmlElement>>,
    hotspots: RefCell<Vec<HtmlElement>>,
    /// Guideline handles by slot; parts without a guideline have none.
    handles: RefCell<Vec<Option<HtmlElement>>>,
    indicator: Option<HtmlElement>,
    cursor_tooltip: HtmlElement,
    inline_tooltip: RefCell<Option<HtmlElement>>,
    slideout: HtmlElement,
    dialog: RefCell<Option<DialogDom>>,
    listeners: RefCell<Vec<EventListener>>,
    frame: RefCell<Option<AnimationFrame>>,
    guard_tick: RefCell<Option<Timeout>>,
    observer: RefCell<Option<(ResizeObserver, Closure<dyn FnMut()>)>>,
}

/// Mount on the page's wrapper. `Ok(None)` when the page has none.
pub fn mount() -> Result<Option<Rc<PageApp>>, String> {
    let Some(wrapper) = document().query_selector(dom::WRAPPER).ok().flatten() else {
        return Ok(None);
    };
    let wrapper: HtmlElement = wrapper
        .dyn_into()
        .map_err(|_| "DOM error: wrapper is not an HTML element".to_string())?;
    let config = read_config();
    let editing = config.can_edit;
    let (hotspots, elements) = dom::read_hotspots(&wrapper);

    for el in &elements {
        dom::set_style(el, "--circle-color", &config.circle_color);
    }

    let spinner = if editing {
        None
    } else {
        let spinner = dom::create("div", "pb-loading-spinner")?;
        spinner.set_attribute("aria-hidden", "true").map_err(js_err)?;
        wrapper.append_child(&spinner).map_err(js_err)?;
        Some(spinner)
    };

    let canvas: HtmlCanvasElement = dom::create("canvas", "parts-guidelines-canvas")?
        .dyn_into()
        .map_err(|_| "DOM error: canvas element expected".to_string())?;
    canvas.set_attribute("aria-hidden", "true").map_err(js_err)?;
    wrapper.append_child(&canvas).map_err(js_err)?;
    let surface = CanvasSurface::new(canvas.clone())?;

    let cursor_tooltip = dom::create("div", "parts-hover-tooltip")?;
    cursor_tooltip.set_attribute("aria-hidden", "true").map_err(js_err)?;
    cursor_tooltip.set_inner_html(&format!(
        r#"<div class="parts-hover-tooltip-title"></div><div class="parts-hover-tooltip-cta">{CURSOR_TOOLTIP_CTA}</div>"#
    ));
    dom::show(&cursor_tooltip, false);
    body().append_child(&cursor_tooltip).map_err(js_err)?;

    let slideout = dom::create("div", "parts-slideout-overlay")?;
    slideout.set_attribute("aria-hidden", "true").map_err(js_err)?;
    slideout.set_inner_html(SLIDEOUT_HTML);
    body().append_child(&slideout).map_err(js_err)?;

    let mut handles = Vec::new();
    let mut indicator = None;
    if editing {
        dom::set_class(&wrapper, "parts-editing", true);
        let add = dom::create("button", "parts-add-part-btn button-primary")?;
        add.set_attribute("type", "button").map_err(js_err)?;
        add.set_attribute("aria-label", "Add new part").map_err(js_err)?;
        add.set_inner_html(ADD_BUTTON_HTML);
        wrapper.append_child(&add).map_err(js_err)?;

        for (el, hotspot) in elements.iter().zip(hotspots.iter()) {
            dom::set_class(el, "parts-draggable", true);
            let remove = dom::create("button", "parts-remove-btn")?;
            remove.set_attribute("type", "button").map_err(js_err)?;
            remove.set_attribute("aria-label", "Remove part").map_err(js_err)?;
            remove.set_inner_html("&times;");
            el.append_child(&remove).map_err(js_err)?;

            if hotspot.guideline.is_none() {
                handles.push(None);
                continue;
            }
            let handle = dom::create("div", "parts-line-handle")?;
            handle
                .set_attribute("data-index", &hotspot.index.to_string())
                .map_err(js_err)?;
            wrapper.append_child(&handle).map_err(js_err)?;
            handles.push(Some(handle));
        }

        let ind = dom::create("div", "parts-position-indicator")?;
        dom::show(&ind, false);
        wrapper.append_child(&ind).map_err(js_err)?;
        indicator = Some(ind);
    }

    let persistence = Rc::new(RestClient::from_config(&config));
    let app = Rc::new_cyclic(|weak: &Weak<PageApp>| {
        let picked = weak.clone();
        let on_pick: Rc<dyn Fn(ImageRef)> = Rc::new(move |image| {
            if let Some(app) = picked.upgrade() {
                app.image_picked(image);
            }
        });
        let collaborators = Collaborators {
            persistence,
            host: Rc::new(BrowserHost),
            editor: Box::new(TinyMceEditor::new()),
            picker: Box::new(MediaPicker::new(on_pick)),
            surface: Box::new(surface),
        };
        PageApp {
            session: RefCell::new(BreakoutSession::new(config, hotspots, collaborators)),
            wrapper,
            canvas,
            spinner: RefCell::new(spinner),
            hotspots: RefCell::new(elements),
            handles: RefCell::new(handles),
            indicator,
            cursor_tooltip,
            inline_tooltip: RefCell::new(None),
            slideout,
            dialog: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            frame: RefCell::new(None),
            guard_tick: RefCell::new(None),
            observer: RefCell::new(None),
        }
    });

    app.measure();
    app.sync_layout();
    app.listen();
    if document().ready_state() == "complete" {
        app.on_load();
    }
    Ok(Some(app))
}

impl PageApp {
    // ─── Measuring ───────────────────────────────────────────────────────

    fn measure(&self) {
        let container = Container::new(
            self.wrapper.client_width() as f64,
            self.wrapper.client_height() as f64,
        );
        let origin = dom::page_rect(&self.wrapper).origin();
        let mut session = self.session.borrow_mut();
        for (slot, el) in self.hotspots.borrow().iter().enumerate() {
            session.set_element_size(PartIndex::from_slot(slot), dom::offset_size(el));
        }
        for (slot, el) in self.handles.borrow().iter().enumerate() {
            let Some(el) = el else { continue };
            session.set_handle_size(PartIndex::from_slot(slot), dom::offset_size(el));
        }
        session.resize(container, origin);
    }

    fn measure_dialog(&self) {
        if let Some(d) = self.dialog.borrow().as_ref() {
            self.session.borrow_mut().set_dialog_box(dom::page_rect(&d.form));
        }
    }

    fn hit(&self, event: &Event) -> Option<Hit> {
        let target = event_element(event)?;
        self.session.borrow().roles().resolve(&ElementLookup(&target))
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    fn sync_layout(&self) {
        let session = self.session.borrow();
        dom::set_class(&self.wrapper, "pb-loading", session.is_loading());
        dom::set_class(&self.wrapper, "pb-animations-ready", session.animations_ready());
        if !session.is_loading() {
            if let Some(spinner) = self.spinner.borrow_mut().take() {
                spinner.remove();
            }
        }
        dom::show(&self.canvas, session.canvas_visible());

        let revealing = session.status() == Status::Revealing;
        let elements = self.hotspots.borrow();
        let handles = self.handles.borrow();
        for ((index, view), el) in session.views().zip(elements.iter()) {
            dom::apply_placement(el, &placement_css(&view.placement));
            if revealing || view.opacity < 1.0 {
                dom::set_style(el, "opacity", &view.opacity.to_string());
            } else {
                dom::clear_style(el, "opacity");
            }
            match view.transition {
                Some(t) => dom::set_style(el, "transition", t),
                None if revealing => dom::set_style(el, "transition", "none"),
                None => dom::clear_style(el, "transition"),
            }
            if let (Some(handle), Some(handle_el)) = (&view.handle, handles.get(index.slot()).and_then(Option::as_ref)) {
                dom::apply_placement(handle_el, &placement_css(&handle.placement));
            }
        }

        if let Some(ind) = &self.indicator {
            match session.indicator() {
                Some(pi) => {
                    ind.set_text_content(Some(pi.text.as_str()));
                    dom::set_style(ind, "left", &format!("{}px", pi.at.x));
                    dom::set_style(ind, "top", &format!("{}px", pi.at.y));
                    dom::show(ind, true);
                }
                None => dom::show(ind, false),
            }
        }

        match session.cursor() {
            Some(cursor) => dom::set_style(&body(), "cursor", cursor),
            None => dom::clear_style(&body(), "cursor"),
        }
        drop(session);
        self.sync_tooltip();
    }

    fn sync_tooltip(&self) {
        let session = self.session.borrow();
        let mut inline = self.inline_tooltip.borrow_mut();
        match session.tooltip().view() {
            TooltipView::Hidden => {
                dom::show(&self.cursor_tooltip, false);
                if let Some(tip) = inline.take() {
                    dom::show(&tip, false);
                }
            }
            TooltipView::Cursor { title, origin, .. } => {
                if let Some(t) = dom::query(&self.cursor_tooltip, ".parts-hover-tooltip-title") {
                    t.set_text_content(Some(title.as_str()));
                }
                dom::set_style(&self.cursor_tooltip, "left", &format!("{}px", origin.x));
                dom::set_style(&self.cursor_tooltip, "top", &format!("{}px", origin.y));
                dom::show(&self.cursor_tooltip, true);
            }
            TooltipView::Inline { index, placement } => {
                let tip = self
                    .hotspots
                    .borrow()
                    .get(index.slot())
                    .and_then(|el| dom::query(el, ".part-tooltip"));
                if let Some(tip) = tip {
                    dom::set_class(&tip, "below", placement.below);
                    dom::set_style(&tip, "transform", &placement.transform());
                    dom::set_style(&tip, "--arrow-offset", &format!("{}px", placement.arrow_offset()));
                    dom::show(&tip, true);
                    *inline = Some(tip);
                }
            }
        }
    }

    fn sync_overlays(&self) {
        self.sync_panel();
        self.sync_dialog();
    }

    fn sync_panel(&self) {
        let session = self.session.borrow();
        match session.panel().content() {
            Some(content) => {
                if let Some(body) = dom::query(&self.slideout, ".parts-slideout-content") {
                    body.set_inner_html(&content.to_html());
                }
                dom::set_class(&self.slideout, "open", true);
            }
            None => dom::set_class(&self.slideout, "open", false),
        }
    }

    fn sync_dialog(&self) {
        let session = self.session.borrow();
        let mut current = self.dialog.borrow_mut();
        match session.dialog() {
            None => {
                if let Some(old) = current.take() {
                    old.overlay.remove();
                }
            }
            Some(dialog) => {
                if current.as_ref().map(|d| d.editor_id.as_str()) != Some(dialog.editor_id()) {
                    if let Some(old) = current.take() {
                        old.overlay.remove();
                    }
                    match DialogDom::build(dialog) {
                        Ok(built) => *current = Some(built),
                        Err(e) => log::warn!("{e}"),
                    }
                }
                if let Some(d) = current.as_ref() {
                    d.update(dialog);
                }
            }
        }
    }

    /// Drop the elements of a deleted part and renumber the rest.
    fn drop_part_elements(&self, index: PartIndex) {
        let mut hotspots = self.hotspots.borrow_mut();
        if index.slot() < hotspots.len() {
            hotspots.remove(index.slot()).remove();
        }
        for (slot, el) in hotspots.iter().enumerate() {
            dom::set_attr(el, "data-index", &PartIndex::from_slot(slot).to_string());
        }
        let mut handles = self.handles.borrow_mut();
        if index.slot() < handles.len() {
            if let Some(el) = handles.remove(index.slot()) {
                el.remove();
            }
        }
        for (slot, el) in handles.iter().enumerate() {
            if let Some(el) = el {
                dom::set_attr(el, "data-index", &PartIndex::from_slot(slot).to_string());
            }
        }
    }

    // ─── Events ──────────────────────────────────────────────────────────

    fn on<F>(self: &Rc<Self>, target: &EventTarget, kind: &'static str, handler: F)
    where
        F: Fn(&Rc<PageApp>, &Event) + 'static,
    {
        let weak = Rc::downgrade(self);
        let listener = EventListener::new_with_options(
            target,
            kind,
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                if let Some(app) = weak.upgrade() {
                    handler(&app, event);
                }
            },
        );
        self.listeners.borrow_mut().push(listener);
    }

    fn listen(self: &Rc<Self>) {
        let doc: EventTarget = document().into();
        for kind in ["mousedown", "touchstart"] {
            self.on(&doc, kind, |app, e| app.on_pointer_down(e));
        }
        for kind in ["mousemove", "touchmove"] {
            self.on(&doc, kind, |app, e| app.on_pointer_move(e));
        }
        for kind in ["mouseup", "touchend"] {
            self.on(&doc, kind, |app, e| app.on_pointer_up(e));
        }
        self.on(&doc, "click", |app, e| app.on_click(e));
        self.on(&doc, "keyup", |app, e| app.on_key_up(e));
        for kind in ["mouseover", "focusin"] {
            self.on(&doc, kind, |app, e| app.on_hover_enter(e));
        }
        for kind in ["mouseout", "focusout"] {
            self.on(&doc, kind, |app, e| app.on_hover_leave(e));
        }
        if let Some(dropdown) = document().get_element_by_id(dom::DROPDOWN_ID) {
            self.on(&dropdown, "change", |app, e| {
                let url = e
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
                    .map(|s| s.value())
                    .unwrap_or_default();
                app.session.borrow().select_page(&url);
            });
        }

        let win: EventTarget = window().into();
        self.on(&win, "resize", |app, _| {
            app.measure();
            app.sync_layout();
        });
        self.on(&win, "load", |app, _| app.on_load());
        if let Some(img) = dom::query(&self.wrapper, MAIN_IMAGE) {
            self.on(&img, "load", |app, _| {
                app.measure();
                app.sync_layout();
            });
        }

        let weak = Rc::downgrade(self);
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Some(app) = weak.upgrade() {
                app.measure();
                app.sync_layout();
            }
        });
        match ResizeObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&self.wrapper);
                *self.observer.borrow_mut() = Some((observer, callback));
            }
            Err(e) => log::debug!("ResizeObserver unavailable: {e:?}"),
        }
    }

    fn on_pointer_down(&self, event: &Event) {
        let Some(input) = pointer_event(event) else {
            return;
        };
        let hit = self.hit(event);
        match hit {
            Some(Hit {
                role: Role::Dialog, ..
            }) => self.measure_dialog(),
            Some(_) => self.measure(),
            None => return,
        }
        self.session.borrow_mut().pointer_down(hit, input);
        if self.session.borrow().cursor().is_some() && event.type_() == "mousedown" {
            event.prevent_default();
        }
        self.sync_layout();
    }

    fn on_pointer_move(&self, event: &Event) {
        let Some(input) = pointer_event(event) else {
            return;
        };
        if let (Some(m), InputEvent::PointerMove { .. }) = (event.dyn_ref::<MouseEvent>(), input) {
            let over_hotspot = event_element(event)
                .and_then(|t| t.closest(dom::HOTSPOT).ok().flatten())
                .is_some();
            if over_hotspot && is_desktop_width(dom::viewport_width()) {
                let pointer = Point::new(m.client_x() as f64, m.client_y() as f64);
                let width = self.cursor_tooltip.offset_width() as f64;
                self.session.borrow_mut().hover_move(pointer, width);
                self.sync_tooltip();
            }
        }
        if self.session.borrow().cursor().is_none() {
            return;
        }
        if event.dyn_ref::<TouchEvent>().is_some() {
            event.prevent_default();
        }
        self.session.borrow_mut().pointer_move(input);
        self.sync_layout();
        if self.session.borrow().dialog().is_some() {
            self.sync_dialog();
        }
    }

    fn on_pointer_up(self: &Rc<Self>, event: &Event) {
        if self.session.borrow().cursor().is_none() {
            return;
        }
        let Some(input) = pointer_event(event) else {
            return;
        };
        self.session.borrow_mut().pointer_up(input);
        self.sync_layout();
        self.sync_overlays();
        let weak = Rc::downgrade(self);
        let tick = Timeout::new(0, move || {
            if let Some(app) = weak.upgrade() {
                app.session.borrow_mut().tick();
            }
        });
        *self.guard_tick.borrow_mut() = Some(tick);
    }

    fn on_click(&self, event: &Event) {
        let hit = self.hit(event);
        let ctx = ClickContext {
            viewport_width: dom::viewport_width(),
            dialog_title: self.dialog.borrow().as_ref().and_then(DialogDom::title_value),
        };
        let before = self.session.borrow().hotspots().len();
        let response = self.session.borrow_mut().click(hit, &ctx);
        match response {
            ClickResponse::PassThrough => return,
            ClickResponse::ToggleAccordion => {
                event.prevent_default();
                self.toggle_accordion(event);
                return;
            }
            ClickResponse::Consumed => event.prevent_default(),
        }
        if let Some(Hit {
            role: Role::RemoveButton,
            index: Some(index),
        }) = hit
        {
            event.stop_propagation();
            if self.session.borrow().hotspots().len() < before {
                self.drop_part_elements(index);
            }
        }
        self.sync_overlays();
        self.sync_layout();
    }

    fn toggle_accordion(&self, event: &Event) {
        let Some(toggle) = event_element(event)
            .and_then(|t| t.closest(".part-accordion-toggle").ok().flatten())
        else {
            return;
        };
        let expanded = toggle.get_attribute("aria-expanded").as_deref() == Some("true");
        let (next, hidden) = toggle_accordion(expanded);
        dom::set_attr(&toggle, "aria-expanded", &next.to_string());
        if let Some(content) = toggle
            .next_element_sibling()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            content.set_hidden(hidden);
        }
    }

    fn on_key_up(&self, event: &Event) {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
            return;
        };
        self.session.borrow_mut().key_up(&key);
        self.sync_overlays();
    }

    fn on_hover_enter(&self, event: &Event) {
        let Some(hotspot) = event_element(event).and_then(|t| t.closest(dom::HOTSPOT).ok().flatten())
        else {
            return;
        };
        let Some(index) = index_of(&hotspot) else {
            return;
        };
        if is_desktop_width(dom::viewport_width()) {
            let pointer = match event.dyn_ref::<MouseEvent>() {
                Some(m) => Point::new(m.client_x() as f64, m.client_y() as f64),
                None => dom::client_rect(&hotspot).center(),
            };
            let title = self
                .session
                .borrow()
                .hotspots()
                .get(index)
                .map(|h| h.title.clone())
                .unwrap_or_default();
            if let Some(t) = dom::query(&self.cursor_tooltip, ".parts-hover-tooltip-title") {
                t.set_text_content(Some(title.as_str()));
            }
            dom::show(&self.cursor_tooltip, true);
            let width = self.cursor_tooltip.offset_width() as f64;
            self.session.borrow_mut().hover_enter_desktop(index, pointer, width);
        } else {
            let Some(tip) = dom::query(&hotspot, ".part-tooltip") else {
                return;
            };
            dom::show(&tip, true);
            let size = dom::offset_size(&tip);
            self.session
                .borrow_mut()
                .hover_enter_inline(index, dom::page_rect(&hotspot), size);
        }
        self.sync_tooltip();
    }

    fn on_hover_leave(&self, event: &Event) {
        let over_hotspot = event_element(event)
            .and_then(|t| t.closest(dom::HOTSPOT).ok().flatten())
            .is_some();
        if over_hotspot {
            self.session.borrow_mut().hover_leave();
            self.sync_tooltip();
        }
    }

    fn image_picked(&self, image: ImageRef) {
        self.session.borrow_mut().image_selected(image);
        self.sync_overlays();
    }

    // ─── Entrance ────────────────────────────────────────────────────────

    fn on_load(self: &Rc<Self>) {
        self.measure();
        let animate = self.session.borrow_mut().begin_entrance();
        self.sync_layout();
        if animate {
            // Flush so the start state is what the transitions run from.
            let _ = self.wrapper.offset_width();
            self.schedule_frame();
        }
    }

    fn schedule_frame(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let frame = request_animation_frame(move |now| {
            if let Some(app) = weak.upgrade() {
                app.on_frame(now);
            }
        });
        *self.frame.borrow_mut() = Some(frame);
    }

    fn on_frame(self: &Rc<Self>, now: f64) {
        self.frame.borrow_mut().take();
        let more = {
            let elements = self.hotspots.borrow();
            let wrapper = &self.wrapper;
            let live = |index: PartIndex| {
                elements
                    .get(index.slot())
                    .map(|el| dom::center_within(el, wrapper))
            };
            self.session.borrow_mut().entrance_frame(now, &live)
        };
        self.sync_layout();
        if more {
            self.schedule_frame();
        }
    }

    pub fn mode(&self) -> Mode {
        self.session.borrow().mode()
    }

    /// Remove listeners, timers and the elements added outside the wrapper.
    pub fn teardown(&self) {
        self.listeners.borrow_mut().clear();
        self.frame.borrow_mut().take();
        self.guard_tick.borrow_mut().take();
        if let Some((observer, _callback)) = self.observer.borrow_mut().take() {
            observer.disconnect();
        }
        self.session.borrow_mut().close_dialog();
        if let Some(d) = self.dialog.borrow_mut().take() {
            d.overlay.remove();
        }
        self.cursor_tooltip.remove();
        self.slideout.remove();
        log::info!("parts breakout unmounted");
    }
}
