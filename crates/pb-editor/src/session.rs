//! The breakout session: one per wrapper element.
//!
//! Owns the hotspot set, the live guideline map, every element's view state
//! and the collaborators, and routes host events (pointer, click, hover,
//! keys, animation frames) to the component that handles them. The host
//! applies the resulting view state to the page after each call.
//!
//! Viewer sessions run the entrance once and then only show tooltips and
//! the side panel. Editor sessions skip the entrance and add dragging,
//! guideline handles, delete and the add/edit dialogs.

use crate::animation::{EntranceAnimator, EntranceStep, HOTSPOT_TRANSITION, plan_entrance};
use crate::capability::{ContentEditor, ImagePicker, PageHost};
use crate::dialog::{DialogRequest, PartDialog};
use crate::drag::{ClickGuard, DragController, DragEvent, DragFrame, DragOptions};
use crate::input::InputEvent;
use crate::panel::{PanelContent, SidePanel};
use crate::persist::{Mutation, PersistError, PersistenceApi, PositionUpdate, settle};
use crate::roles::{Hit, Role, RoleRegistry};
use crate::snap;
use crate::tooltip::TooltipController;
use pb_core::style::{css_percent, css_px};
use pb_core::{
    BreakoutConfig, Container, Guidelines, HotspotSet, ImageRef, PartIndex, PercentPoint, Placement,
    Point, Rect, Size, Vec2, is_desktop_width,
};
use pb_render::{GuidelineRenderer, LineStyle, LineSurface, reveal_segments, static_segments};
use std::rc::Rc;

/// Distance of the position indicator from the dragged hotspot's centre.
pub const INDICATOR_OFFSET: f64 = 14.0;
/// Prompt shown before a part is deleted.
pub const CONFIRM_DELETE: &str = "Are you sure you want to remove this part?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewer,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Viewer waiting for the page to finish loading. Spinner shown.
    Loading,
    /// Entrance running.
    Revealing,
    Ready,
}

/// Everything the session talks to outside itself.
pub struct Collaborators {
    pub persistence: Rc<dyn PersistenceApi>,
    pub host: Rc<dyn PageHost>,
    pub editor: Box<dyn ContentEditor>,
    pub picker: Box<dyn ImagePicker>,
    pub surface: Box<dyn LineSurface>,
}

/// Inline placement of an element as CSS values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementCss {
    pub left: String,
    pub top: String,
    pub transform: &'static str,
}

pub fn placement_css(placement: &Placement) -> PlacementCss {
    match placement {
        Placement::Anchored(p) => PlacementCss {
            left: css_percent(p.x),
            top: css_percent(p.y),
            transform: "translate(-50%, -50%)",
        },
        Placement::Pixel(o) => PlacementCss {
            left: css_px(o.x),
            top: css_px(o.y),
            transform: "none",
        },
    }
}

/// Draggable endpoint of a hotspot's guideline. Editor only, and only for
/// parts that have a guideline.
#[derive(Debug, Clone)]
pub struct HandleView {
    pub placement: Placement,
    pub size: Size,
    drag: DragController,
}

/// Render state of one hotspot element.
#[derive(Debug, Clone)]
pub struct HotspotView {
    pub placement: Placement,
    pub size: Size,
    pub opacity: f64,
    /// `None` disables transitions.
    pub transition: Option<&'static str>,
    pub handle: Option<HandleView>,
    drag: DragController,
}

impl HotspotView {
    fn box_in(&self, container: &Container) -> Rect {
        self.placement.element_box(container, self.size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionIndicator {
    pub text: String,
    /// Container-relative top-left.
    pub at: Point,
}

impl PositionIndicator {
    fn for_center(center: Point, pct: PercentPoint) -> Self {
        Self {
            text: format!("X: {}%  Y: {}%", pct.x, pct.y),
            at: center + Vec2::new(INDICATOR_OFFSET, INDICATOR_OFFSET),
        }
    }
}

/// What the host should do with the native click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickResponse {
    /// Not ours; let the browser act.
    PassThrough,
    /// Handled (or deliberately swallowed); prevent the default.
    Consumed,
    /// Flip the accordion the target belongs to.
    ToggleAccordion,
}

/// Page facts the host reads at click time.
#[derive(Debug, Clone, Default)]
pub struct ClickContext {
    pub viewport_width: f64,
    /// Current value of the open dialog's title field.
    pub dialog_title: Option<String>,
}

/// Next accordion state: `(aria_expanded, content_hidden)`.
pub fn toggle_accordion(expanded: bool) -> (bool, bool) {
    (!expanded, expanded)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragTarget {
    Hotspot(PartIndex),
    Handle(PartIndex),
    Dialog,
}

pub struct BreakoutSession {
    config: BreakoutConfig,
    mode: Mode,
    status: Status,
    animations_ready: bool,
    canvas_visible: bool,
    hotspots: HotspotSet,
    guidelines: Guidelines,
    container: Container,
    /// Page-space origin of the container box.
    origin: Point,
    views: Vec<HotspotView>,
    renderer: GuidelineRenderer,
    active: Option<DragTarget>,
    click_guard: ClickGuard,
    tooltip: TooltipController,
    panel: SidePanel,
    dialog: Option<PartDialog>,
    dialog_box: Rect,
    dialog_seq: u64,
    indicator: Option<PositionIndicator>,
    animator: Option<EntranceAnimator>,
    roles: RoleRegistry,
    persistence: Rc<dyn PersistenceApi>,
    host: Rc<dyn PageHost>,
    editor: Box<dyn ContentEditor>,
    picker: Box<dyn ImagePicker>,
    surface: Box<dyn LineSurface>,
}

impl BreakoutSession {
    pub fn new(config: BreakoutConfig, hotspots: HotspotSet, collaborators: Collaborators) -> Self {
        let mode = if config.can_edit { Mode::Editor } else { Mode::Viewer };
        let guidelines = Guidelines::from_hotspots(&hotspots);
        let views = hotspots
            .iter()
            .map(|h| HotspotView {
                placement: Placement::Anchored(h.position),
                size: Size::ZERO,
                opacity: 1.0,
                transition: None,
                handle: h.guideline.filter(|_| mode == Mode::Editor).map(|end| HandleView {
                    placement: Placement::Anchored(end),
                    size: Size::ZERO,
                    drag: DragController::new(DragOptions::CONTAINED),
                }),
                drag: DragController::new(DragOptions::CONTAINED),
            })
            .collect();
        log::info!(
            "breakout session for post {} with {} hotspots ({mode:?})",
            config.post_id,
            hotspots.len()
        );
        Self {
            renderer: GuidelineRenderer::new(LineStyle::with_color(config.line_color.clone())),
            status: if mode == Mode::Editor { Status::Ready } else { Status::Loading },
            animations_ready: mode == Mode::Editor,
            canvas_visible: mode == Mode::Editor,
            config,
            mode,
            hotspots,
            guidelines,
            container: Container::default(),
            origin: Point::ORIGIN,
            views,
            active: None,
            click_guard: ClickGuard::default(),
            tooltip: TooltipController::new(),
            panel: SidePanel::default(),
            dialog: None,
            dialog_box: Rect::ZERO,
            dialog_seq: 0,
            indicator: None,
            animator: None,
            roles: RoleRegistry::standard(),
            persistence: collaborators.persistence,
            host: collaborators.host,
            editor: collaborators.editor,
            picker: collaborators.picker,
            surface: collaborators.surface,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &BreakoutConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn animations_ready(&self) -> bool {
        self.animations_ready
    }

    pub fn canvas_visible(&self) -> bool {
        self.canvas_visible
    }

    pub fn hotspots(&self) -> &HotspotSet {
        &self.hotspots
    }

    pub fn guidelines(&self) -> &Guidelines {
        &self.guidelines
    }

    pub fn container(&self) -> Container {
        self.container
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn view(&self, index: PartIndex) -> Option<&HotspotView> {
        self.views.get(index.slot())
    }

    pub fn views(&self) -> impl Iterator<Item = (PartIndex, &HotspotView)> {
        self.views.iter().enumerate().map(|(slot, v)| (PartIndex::from_slot(slot), v))
    }

    pub fn tooltip(&self) -> &TooltipController {
        &self.tooltip
    }

    pub fn panel(&self) -> &SidePanel {
        &self.panel
    }

    pub fn dialog(&self) -> Option<&PartDialog> {
        self.dialog.as_ref()
    }

    pub fn indicator(&self) -> Option<&PositionIndicator> {
        self.indicator.as_ref()
    }

    /// Cursor for the page body while a pointer is held on a draggable.
    pub fn cursor(&self) -> Option<&'static str> {
        match self.active? {
            DragTarget::Hotspot(i) => self.view(i)?.drag.cursor(),
            DragTarget::Handle(i) => self.view(i)?.handle.as_ref()?.drag.cursor(),
            DragTarget::Dialog => self.dialog.as_ref()?.drag.cursor(),
        }
    }

    // ─── Layout ──────────────────────────────────────────────────────────

    /// Container box changed (resize, image decode, layout shift). Safe to
    /// call repeatedly.
    pub fn resize(&mut self, container: Container, origin: Point) {
        self.container = container;
        self.origin = origin;
        self.redraw();
    }

    pub fn set_element_size(&mut self, index: PartIndex, size: Size) {
        if let Some(view) = self.views.get_mut(index.slot()) {
            view.size = size;
        }
    }

    pub fn set_handle_size(&mut self, index: PartIndex, size: Size) {
        if let Some(handle) = self.views.get_mut(index.slot()).and_then(|v| v.handle.as_mut()) {
            handle.size = size;
        }
    }

    /// Viewport box of the open dialog, measured by the host.
    pub fn set_dialog_box(&mut self, rect: Rect) {
        self.dialog_box = rect;
    }

    /// Container-relative centre of a hotspot's rendered box.
    pub fn hotspot_center(&self, index: PartIndex) -> Option<Point> {
        let view = self.view(index)?;
        Some(view.placement.center(&self.container, view.size))
    }

    /// Full repaint of the connectors from the current state.
    pub fn redraw(&mut self) {
        if self.status == Status::Revealing {
            // Connectors only appear once the entrance draws them.
            self.renderer.redraw(self.surface.as_mut(), &self.container, &[]);
            return;
        }
        let segments = static_segments(&self.container, &self.guidelines, |i| self.hotspot_center(i));
        self.renderer.redraw(self.surface.as_mut(), &self.container, &segments);
    }

    // ─── Entrance ────────────────────────────────────────────────────────

    /// Page finished loading. Viewers get the entrance start state and
    /// `true`: the host applies it, forces a layout flush, then drives
    /// [`Self::entrance_frame`] every animation frame.
    pub fn begin_entrance(&mut self) -> bool {
        self.canvas_visible = true;
        if self.mode == Mode::Editor {
            self.redraw();
            return false;
        }
        if self.status != Status::Loading {
            return false;
        }
        let tracks = plan_entrance(&self.hotspots, &self.guidelines);
        if tracks.is_empty() {
            self.status = Status::Ready;
            self.animations_ready = true;
            return false;
        }
        for track in &tracks {
            if let Some(view) = self.views.get_mut(track.index.slot()) {
                view.transition = None;
                view.opacity = 0.0;
                view.placement = Placement::Anchored(track.start);
            }
        }
        self.animator = Some(EntranceAnimator::new(tracks));
        self.status = Status::Revealing;
        self.redraw();
        true
    }

    /// Advance the entrance. `live_center` reports where a hotspot is
    /// rendered right now, mid-transition. Returns whether more frames are
    /// needed.
    pub fn entrance_frame(&mut self, now: f64, live_center: &dyn Fn(PartIndex) -> Option<Point>) -> bool {
        let Some(animator) = self.animator.as_mut() else {
            return false;
        };
        let steps = if animator.is_running() {
            animator.tick(now)
        } else {
            for view in &mut self.views {
                view.transition = Some(HOTSPOT_TRANSITION);
            }
            animator.start(now)
        };
        for step in steps {
            match step {
                EntranceStep::Reveal(index) => {
                    let end = self.hotspots.get(index).map(|h| h.position);
                    if let (Some(view), Some(end)) = (self.views.get_mut(index.slot()), end) {
                        view.opacity = 1.0;
                        view.placement = Placement::Anchored(end);
                    }
                }
                EntranceStep::DrawLines { progress } => self.draw_reveal(progress, live_center),
                EntranceStep::Finished => {
                    self.status = Status::Ready;
                    self.animations_ready = true;
                    self.redraw();
                }
            }
        }
        self.animator.as_ref().is_some_and(EntranceAnimator::is_running)
    }

    fn draw_reveal(&mut self, progress: f64, live_center: &dyn Fn(PartIndex) -> Option<Point>) {
        let Some(animator) = self.animator.as_ref() else {
            return;
        };
        let pairs: Vec<(Point, Point)> = animator
            .tracks()
            .iter()
            .filter(|t| t.has_guideline)
            .filter_map(|t| {
                let center = live_center(t.index).or_else(|| self.hotspot_center(t.index))?;
                Some((self.container.to_pixels(t.start), center))
            })
            .collect();
        let segments = reveal_segments(pairs, progress);
        self.renderer.redraw(self.surface.as_mut(), &self.container, &segments);
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    fn container_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.container.size())
    }

    fn frame_for(&self, target: DragTarget) -> Option<DragFrame> {
        let offset = self.origin.to_vec2();
        match target {
            DragTarget::Hotspot(i) => {
                let view = self.view(i)?;
                Some(DragFrame::new(
                    view.box_in(&self.container) + offset,
                    Some(self.container_rect()),
                ))
            }
            DragTarget::Handle(i) => {
                let handle = self.view(i)?.handle.as_ref()?;
                Some(DragFrame::new(
                    handle.placement.element_box(&self.container, handle.size) + offset,
                    Some(self.container_rect()),
                ))
            }
            DragTarget::Dialog => Some(DragFrame::new(self.dialog_box, None)),
        }
    }

    fn controller(&mut self, target: DragTarget) -> Option<&mut DragController> {
        match target {
            DragTarget::Hotspot(i) => self.views.get_mut(i.slot()).map(|v| &mut v.drag),
            DragTarget::Handle(i) => self
                .views
                .get_mut(i.slot())
                .and_then(|v| v.handle.as_mut())
                .map(|h| &mut h.drag),
            DragTarget::Dialog => self.dialog.as_mut().map(|d| &mut d.drag),
        }
    }

    /// Pointer pressed on `hit`. Form controls never reach a drag.
    pub fn pointer_down(&mut self, hit: Option<Hit>, event: InputEvent) {
        let target = match hit {
            Some(Hit {
                role: Role::Dialog, ..
            }) if self.dialog.is_some() => DragTarget::Dialog,
            _ if self.mode != Mode::Editor => return,
            Some(Hit {
                role: Role::Hotspot | Role::RemoveButton,
                index: Some(i),
            }) => DragTarget::Hotspot(i),
            Some(Hit {
                role: Role::GuidelineHandle,
                index: Some(i),
            }) => DragTarget::Handle(i),
            _ => return,
        };
        self.route(target, event);
    }

    pub fn pointer_move(&mut self, event: InputEvent) {
        if let Some(target) = self.active {
            self.route(target, event);
        }
    }

    pub fn pointer_up(&mut self, event: InputEvent) {
        if let Some(target) = self.active.take() {
            self.route(target, event);
            if let Some(controller) = self.controller(target) {
                controller.cancel();
            }
        }
    }

    /// Next event-loop tick after a release.
    pub fn tick(&mut self) {
        self.click_guard.tick();
    }

    fn route(&mut self, target: DragTarget, event: InputEvent) {
        let Some(frame) = self.frame_for(target) else {
            return;
        };
        let Some(controller) = self.controller(target) else {
            return;
        };
        let events = controller.handle(&event, &frame);
        if matches!(event, InputEvent::PointerDown { .. }) && !controller.is_idle() {
            self.active = Some(target);
        }
        for drag_event in events {
            match target {
                DragTarget::Hotspot(i) => self.on_hotspot_drag(i, drag_event),
                DragTarget::Handle(i) => self.on_handle_drag(i, drag_event),
                DragTarget::Dialog => self.on_dialog_drag(drag_event),
            }
        }
    }

    fn on_hotspot_drag(&mut self, index: PartIndex, event: DragEvent) {
        let container = self.container;
        let Some(view) = self.views.get_mut(index.slot()) else {
            return;
        };
        match event {
            DragEvent::Started { origin } => {
                view.placement = Placement::Pixel(origin);
            }
            DragEvent::Moved { position } => {
                view.placement = Placement::Pixel(position);
                let center = view.placement.center(&container, view.size);
                self.indicator = Some(PositionIndicator::for_center(center, container.to_percent(center)));
                self.redraw();
            }
            DragEvent::Stopped { moved: false } => {
                self.indicator = None;
            }
            DragEvent::Stopped { moved: true } => {
                let pct = container.to_percent(view.placement.center(&container, view.size));
                view.placement = Placement::Anchored(pct);
                if let Some(hotspot) = self.hotspots.get_mut(index) {
                    hotspot.position = pct;
                }
                self.indicator = None;
                self.click_guard.arm();
                self.redraw();
                log::debug!("hotspot {index} dropped at {pct}");
                self.persistence
                    .update_position(PositionUpdate::moved(self.config.post_id, index, pct));
            }
        }
    }

    fn on_handle_drag(&mut self, index: PartIndex, event: DragEvent) {
        let container = self.container;
        let owner_center = self.hotspot_center(index);
        let Some(handle) = self.views.get_mut(index.slot()).and_then(|v| v.handle.as_mut()) else {
            return;
        };
        match event {
            DragEvent::Started { origin } => {
                handle.placement = Placement::Pixel(origin);
            }
            DragEvent::Moved { position } => {
                handle.placement = Placement::Pixel(position);
                let proposed = handle.placement.center(&container, handle.size);
                let out = snap::resolve(index, proposed, owner_center, &self.guidelines, &container);
                self.guidelines.set(index, out.percent);
                self.redraw();
            }
            DragEvent::Stopped { moved: false } => {}
            DragEvent::Stopped { moved: true } => {
                let proposed = handle.placement.center(&container, handle.size);
                let out = snap::resolve(index, proposed, owner_center, &self.guidelines, &container);
                handle.placement = Placement::Anchored(out.percent);
                self.guidelines.set(index, out.percent);
                if let Some(hotspot) = self.hotspots.get_mut(index) {
                    hotspot.guideline = Some(out.percent);
                }
                self.click_guard.arm();
                self.redraw();
                self.persistence
                    .update_position(PositionUpdate::guideline(self.config.post_id, index, out.percent));
            }
        }
    }

    fn on_dialog_drag(&mut self, event: DragEvent) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        match event {
            DragEvent::Started { origin } => dialog.pin(origin),
            DragEvent::Moved { position } => {
                dialog.pin(position);
                self.dialog_box = Rect::from_origin_size(position, self.dialog_box.size());
            }
            DragEvent::Stopped { moved } => {
                if moved {
                    self.click_guard.arm();
                }
            }
        }
    }

    // ─── Clicks and keys ─────────────────────────────────────────────────

    pub fn click(&mut self, hit: Option<Hit>, ctx: &ClickContext) -> ClickResponse {
        let Some(Hit { role, index }) = hit else {
            return ClickResponse::PassThrough;
        };
        let editor = self.mode == Mode::Editor;
        match (role, index) {
            (Role::RemoveButton, Some(i)) if editor => {
                self.delete_hotspot(i);
                ClickResponse::Consumed
            }
            (Role::Hotspot, Some(i)) => {
                if !is_desktop_width(ctx.viewport_width) {
                    return ClickResponse::PassThrough;
                }
                if !self.click_guard.is_suppressed() {
                    self.open_panel(i);
                }
                ClickResponse::Consumed
            }
            (Role::AccordionToggle, _) => ClickResponse::ToggleAccordion,
            (Role::PanelClose | Role::PanelBackdrop, _) => {
                self.close_panel();
                ClickResponse::Consumed
            }
            (Role::EditPart, _) if editor => {
                self.edit_from_panel();
                ClickResponse::Consumed
            }
            (Role::AddPart, _) if editor => {
                self.open_add_dialog();
                ClickResponse::Consumed
            }
            (Role::DialogClose | Role::DialogCancel | Role::DialogBackdrop, _) => {
                self.close_dialog();
                ClickResponse::Consumed
            }
            (Role::DialogSave, _) => {
                let title = ctx.dialog_title.clone().unwrap_or_default();
                self.save_dialog(&title);
                ClickResponse::Consumed
            }
            (Role::DialogSelectImage, _) => {
                if let Some(dialog) = &self.dialog {
                    self.picker.open(dialog.mode().picker_title());
                }
                ClickResponse::Consumed
            }
            _ => ClickResponse::PassThrough,
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if key == "Escape" {
            self.close_panel();
        }
    }

    /// The machine dropdown changed.
    pub fn select_page(&self, url: &str) {
        if !url.is_empty() {
            self.host.navigate(url);
        }
    }

    // ─── Hover ───────────────────────────────────────────────────────────

    pub fn hover_enter_desktop(&mut self, index: PartIndex, pointer: Point, tooltip_width: f64) {
        if let Some(h) = self.hotspots.get(index) {
            self.tooltip.show_cursor(index, &h.title, pointer, tooltip_width);
        }
    }

    pub fn hover_enter_inline(&mut self, index: PartIndex, anchor: Rect, tip: Size) {
        if self.hotspots.get(index).is_some() {
            self.tooltip.show_inline(index, anchor, tip, self.container_rect());
        }
    }

    pub fn hover_move(&mut self, pointer: Point, tooltip_width: f64) {
        self.tooltip.follow(pointer, tooltip_width);
    }

    pub fn hover_leave(&mut self) {
        self.tooltip.hide();
    }

    // ─── Panel ───────────────────────────────────────────────────────────

    pub fn open_panel(&mut self, index: PartIndex) {
        let Some(h) = self.hotspots.get(index) else {
            return;
        };
        let content = PanelContent {
            index,
            title: h.title.clone(),
            content_html: h.content_html.clone(),
            image_url: h.image.as_ref().map(|img| img.url.clone()).filter(|u| !u.is_empty()),
            editable: self.mode == Mode::Editor,
            cta: self.config.cta(),
        };
        self.panel.open(content);
        self.tooltip.hide();
    }

    pub fn close_panel(&mut self) {
        self.panel.close();
    }

    fn edit_from_panel(&mut self) {
        if let Some(content) = self.panel.close() {
            self.dialog_seq += 1;
            let dialog = PartDialog::edit(
                content.index,
                &content.title,
                &content.content_html,
                content.image_url,
                self.dialog_seq,
            );
            self.open_dialog(dialog);
        }
    }

    // ─── Dialogs ─────────────────────────────────────────────────────────

    pub fn open_add_dialog(&mut self) {
        self.dialog_seq += 1;
        self.open_dialog(PartDialog::add(self.dialog_seq));
    }

    fn open_dialog(&mut self, dialog: PartDialog) {
        if self.dialog.is_some() {
            self.editor.dispose();
        }
        self.editor.init(dialog.editor_id(), &dialog.initial_content);
        self.dialog = Some(dialog);
    }

    pub fn close_dialog(&mut self) {
        if self.dialog.take().is_some() {
            self.editor.dispose();
        }
    }

    pub fn image_selected(&mut self, image: ImageRef) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.select_image(image);
        }
    }

    /// Validate and send the open dialog. Success reloads the page; the
    /// dialog stays open until then.
    pub fn save_dialog(&mut self, title: &str) {
        let Some(dialog) = self.dialog.as_ref() else {
            return;
        };
        match dialog.submit(title, self.editor.content(), self.config.post_id) {
            Ok(DialogRequest::Create(part)) => {
                self.persistence
                    .create_part(part, settle(self.host.clone(), Mutation::Create));
            }
            Ok(DialogRequest::Update(update)) => {
                self.persistence
                    .update_part(update, settle(self.host.clone(), Mutation::Update));
            }
            Err(PersistError::Validation(message)) => self.host.alert(&message),
            Err(e) => log::warn!("dialog submit failed: {e}"),
        }
    }

    // ─── Delete ──────────────────────────────────────────────────────────

    /// Confirm, remove locally and re-sequence, then tell the store.
    /// Returns whether the part was removed.
    pub fn delete_hotspot(&mut self, index: PartIndex) -> bool {
        if self.hotspots.get(index).is_none() || !self.host.confirm(CONFIRM_DELETE) {
            return false;
        }
        self.hotspots.remove(index);
        self.views.remove(index.slot());
        self.guidelines.remove_and_shift(index);
        self.tooltip.hide();
        self.redraw();
        log::info!("part {index} deleted; {} remain", self.hotspots.len());
        self.persistence
            .update_position(PositionUpdate::delete(self.config.post_id, index));
        true
    }
}
