//! Collaborators the session depends on but does not implement.
//!
//! The browser bridge backs these with TinyMCE, the WordPress media frame
//! and `window`; tests use recording stubs.

/// Rich-text editor attached to a dialog's content field.
pub trait ContentEditor {
    /// Attach to the field with DOM id `element_id`, seeded with `html`.
    fn init(&mut self, element_id: &str, html: &str);
    fn content(&self) -> String;
    fn set_content(&mut self, html: &str);
    /// Detach and drop the editor instance. Safe to call when not attached.
    fn dispose(&mut self);
}

/// Media picker. A choice is reported back through
/// `BreakoutSession::image_selected`.
pub trait ImagePicker {
    fn open(&mut self, title: &str);
}

/// Page-level effects: blocking prompts and navigation.
pub trait PageHost {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
    fn reload(&self);
    fn navigate(&self, url: &str);
}
