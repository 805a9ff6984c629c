//! Browser implementations of the session's capabilities: the rich-text
//! editor (TinyMCE when loaded, the bare textarea otherwise), the media
//! library picker, and the page itself.

use gloo::timers::callback::Timeout;
use gloo::utils::{document, window};
use js_sys::{Array, Function, Object, Reflect};
use pb_core::ImageRef;
use pb_editor::{ContentEditor, ImagePicker, PageHost};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlTextAreaElement;

const TINYMCE_PLUGINS: &str = "lists link image fullscreen";
const TINYMCE_TOOLBAR: &str = "undo redo | formatselect | bold italic underline | alignleft aligncenter alignright | bullist numlist | link image | fullscreen";

fn global(name: &str) -> Option<JsValue> {
    Reflect::get(&window(), &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    method.apply(target, &args.iter().collect::<Array>())
}

fn set(obj: &Object, key: &str, value: impl Into<JsValue>) {
    if let Err(e) = Reflect::set(obj, &JsValue::from_str(key), &value.into()) {
        log::warn!("could not set option {key}: {e:?}");
    }
}

// ─── Content editor ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct TinyMceEditor {
    id: Option<String>,
}

impl TinyMceEditor {
    pub fn new() -> Self {
        Self::default()
    }

    fn instance(id: &str) -> Option<JsValue> {
        let tinymce = global("tinymce")?;
        call_method(&tinymce, "get", &[JsValue::from_str(id)])
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null())
    }

    fn textarea(id: &str) -> Option<HtmlTextAreaElement> {
        document().get_element_by_id(id)?.dyn_into().ok()
    }

    fn remove_instance(id: &str) {
        if let (Some(tinymce), Some(ed)) = (global("tinymce"), Self::instance(id)) {
            if let Err(e) = call_method(&tinymce, "remove", &[ed]) {
                log::warn!("tinymce.remove failed: {e:?}");
            }
        }
    }
}

impl ContentEditor for TinyMceEditor {
    /// The textarea is created by the dialog markup in the same event turn,
    /// so TinyMCE attaches on the next tick.
    fn init(&mut self, id: &str, html: &str) {
        self.id = Some(id.to_string());
        let id = id.to_string();
        let html = html.to_string();
        Timeout::new(0, move || {
            if let Some(area) = Self::textarea(&id) {
                area.set_value(&html);
            }
            let Some(tinymce) = global("tinymce") else {
                return;
            };
            Self::remove_instance(&id);
            let options = Object::new();
            set(&options, "selector", format!("#{id}"));
            set(&options, "menubar", true);
            set(&options, "plugins", TINYMCE_PLUGINS);
            set(&options, "toolbar", TINYMCE_TOOLBAR);
            set(&options, "height", 300);
            set(&options, "branding", false);
            if let Err(e) = call_method(&tinymce, "init", &[options.into()]) {
                log::warn!("tinymce.init failed: {e:?}");
            }
        })
        .forget();
    }

    fn content(&self) -> String {
        let Some(id) = self.id.as_deref() else {
            return String::new();
        };
        if global("tinymce").is_some() {
            return Self::instance(id)
                .and_then(|ed| call_method(&ed, "getContent", &[]).ok())
                .and_then(|v| v.as_string())
                .unwrap_or_default();
        }
        Self::textarea(id)
            .map(|area| area.value().trim().to_string())
            .unwrap_or_default()
    }

    fn set_content(&mut self, html: &str) {
        let Some(id) = self.id.as_deref() else {
            return;
        };
        match Self::instance(id) {
            Some(ed) => {
                if let Err(e) = call_method(&ed, "setContent", &[JsValue::from_str(html)]) {
                    log::warn!("tinymce setContent failed: {e:?}");
                }
            }
            None => {
                if let Some(area) = Self::textarea(id) {
                    area.set_value(html);
                }
            }
        }
    }

    fn dispose(&mut self) {
        if let Some(id) = self.id.take() {
            Self::remove_instance(&id);
        }
    }
}

// ─── Media picker ────────────────────────────────────────────────────────

/// `wp.media` frame; the picked attachment goes to `on_pick`.
pub struct MediaPicker {
    on_pick: Rc<dyn Fn(ImageRef)>,
    on_select: Option<Closure<dyn FnMut()>>,
}

impl MediaPicker {
    pub fn new(on_pick: Rc<dyn Fn(ImageRef)>) -> Self {
        Self {
            on_pick,
            on_select: None,
        }
    }

    fn open_frame(&mut self, title: &str) -> Result<(), JsValue> {
        let Some(wp) = global("wp") else {
            log::warn!("media library not available");
            return Ok(());
        };
        let options = Object::new();
        set(&options, "title", title);
        set(&options, "multiple", false);
        let library = Object::new();
        set(&library, "type", "image");
        set(&options, "library", library);
        let frame = call_method(&wp, "media", &[options.into()])?;

        let on_pick = Rc::clone(&self.on_pick);
        let selected = frame.clone();
        let on_select = Closure::<dyn FnMut()>::new(move || match attachment(&selected) {
            Ok(image) => on_pick(image),
            Err(e) => log::warn!("could not read picked image: {e:?}"),
        });
        call_method(
            &frame,
            "on",
            &[JsValue::from_str("select"), on_select.as_ref().clone()],
        )?;
        self.on_select = Some(on_select);
        call_method(&frame, "open", &[])?;
        Ok(())
    }
}

/// `frame.state().get("selection").first().toJSON()` as an image ref.
fn attachment(frame: &JsValue) -> Result<ImageRef, JsValue> {
    let state = call_method(frame, "state", &[])?;
    let selection = call_method(&state, "get", &[JsValue::from_str("selection")])?;
    let first = call_method(&selection, "first", &[])?;
    let json = call_method(&first, "toJSON", &[])?;
    let id = Reflect::get(&json, &JsValue::from_str("id"))?
        .as_f64()
        .unwrap_or(0.0);
    let url = Reflect::get(&json, &JsValue::from_str("url"))?
        .as_string()
        .unwrap_or_default();
    Ok(ImageRef { id: id as u64, url })
}

impl ImagePicker for MediaPicker {
    fn open(&mut self, title: &str) {
        if let Err(e) = self.open_frame(title) {
            log::warn!("media frame failed: {e:?}");
        }
    }
}

// ─── Page host ───────────────────────────────────────────────────────────

pub struct BrowserHost;

impl PageHost for BrowserHost {
    fn alert(&self, message: &str) {
        gloo::dialogs::alert(message);
    }

    fn confirm(&self, message: &str) -> bool {
        gloo::dialogs::confirm(message)
    }

    fn reload(&self) {
        if let Err(e) = window().location().reload() {
            log::warn!("reload failed: {e:?}");
        }
    }

    fn navigate(&self, url: &str) {
        if let Err(e) = window().location().set_href(url) {
            log::warn!("navigation to {url} failed: {e:?}");
        }
    }
}
