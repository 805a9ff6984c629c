//! WASM bridge for Parts Breakout: mounts the hotspot session on the page.
//!
//! Compiled via `wasm-pack build --target web`. The page script calls
//! `mount()` once the DOM is parsed; everything after that is driven by
//! listeners the mounted app owns.

mod app;
mod canvas2d;
mod dom;
mod editors;
mod http;
mod logger;

use app::PageApp;
use log::LevelFilter;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

thread_local! {
    static APP: RefCell<Option<Rc<PageApp>>> = const { RefCell::new(None) };
}

/// Mount on the page's `.parts-breakout-wrapper`.
///
/// Returns `false` when the page has no wrapper. Mounting twice is a no-op.
#[wasm_bindgen]
pub fn mount() -> Result<bool, JsValue> {
    console_error_panic_hook_setup();
    logger::init(LevelFilter::Info);

    APP.with(|slot| {
        if slot.borrow().is_some() {
            return Ok(true);
        }
        match app::mount() {
            Ok(Some(app)) => {
                log::info!("mounted in {:?} mode", app.mode());
                *slot.borrow_mut() = Some(app);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => Err(JsValue::from_str(&e)),
        }
    })
}

/// Detach every listener and remove the overlays added to `<body>`.
#[wasm_bindgen]
pub fn unmount() {
    APP.with(|slot| {
        if let Some(app) = slot.borrow_mut().take() {
            app.teardown();
        }
    });
}

/// `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"` or `"off"`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    match level.parse::<LevelFilter>() {
        Ok(filter) => logger::init(filter),
        Err(_) => log::warn!("unknown log level {level:?}"),
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Parts Breakout WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
