//! Desktop side panel with a part's full content.

use pb_core::{Cta, PartIndex};

/// Markup of the editor's "Edit Part" affordance.
pub const EDIT_BUTTON_HTML: &str = r#"<button type="button" class="parts-edit-part-btn button-primary">Edit Part <span class="pb-pencil-icon">✎</span></button>"#;

/// Everything the panel shows for one part.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelContent {
    pub index: PartIndex,
    pub title: String,
    /// Trusted content fragment from the page.
    pub content_html: String,
    pub image_url: Option<String>,
    pub editable: bool,
    pub cta: Option<Cta>,
}

impl PanelContent {
    pub fn to_html(&self) -> String {
        let mut html = format!("<h2>{}</h2>{}", escape_html(&self.title), self.content_html);
        if self.editable {
            html.push_str(EDIT_BUTTON_HTML);
        }
        if let Some(cta) = &self.cta {
            html.push_str(&format!(
                r#"<a class="pb-cta-link" href="{}">{}</a>"#,
                escape_html(&cta.url),
                escape_html(&cta.label)
            ));
        }
        html
    }
}

#[derive(Debug, Clone, Default)]
pub struct SidePanel {
    content: Option<PanelContent>,
}

impl SidePanel {
    pub fn open(&mut self, content: PanelContent) {
        log::debug!("panel opened for part {}", content.index);
        self.content = Some(content);
    }

    /// Returns what was showing, if anything.
    pub fn close(&mut self) -> Option<PanelContent> {
        self.content.take()
    }

    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> Option<&PanelContent> {
        self.content.as_ref()
    }
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
