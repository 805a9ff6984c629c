//! Add / edit part dialogs.
//!
//! Floating panels that collect a title, rich content and an optional
//! image, then turn into a create or update request. The dialog body can be
//! dragged around the viewport.

use crate::drag::{DragController, DragOptions};
use crate::persist::{NewPart, PartUpdate, PersistError};
use pb_core::{ImageRef, PartIndex, Point};

pub const TITLE_REQUIRED: &str = "Title is required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Add,
    Edit(PartIndex),
}

impl DialogMode {
    /// Class prefix of the dialog's own controls.
    pub fn prefix(self) -> &'static str {
        match self {
            DialogMode::Add => "parts-add",
            DialogMode::Edit(_) => "parts-edit",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            DialogMode::Add => "Add New Part",
            DialogMode::Edit(_) => "Edit Part",
        }
    }

    pub fn picker_title(self) -> &'static str {
        match self {
            DialogMode::Add => "Select Part Image",
            DialogMode::Edit(_) => "Select Image",
        }
    }
}

/// Request produced by a valid submission.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogRequest {
    Create(NewPart),
    Update(PartUpdate),
}

#[derive(Debug, Clone)]
pub struct PartDialog {
    mode: DialogMode,
    /// Values the fields are seeded with.
    pub initial_title: String,
    pub initial_content: String,
    /// Image shown in the preview.
    pub preview_url: Option<String>,
    /// Image picked while this dialog was open.
    picked: Option<ImageRef>,
    editor_id: String,
    /// Page position the dialog is pinned at once dragged.
    fixed_at: Option<Point>,
    pub(crate) drag: DragController,
}

impl PartDialog {
    pub fn add(seq: u64) -> Self {
        Self::build(DialogMode::Add, String::new(), String::new(), None, seq)
    }

    pub fn edit(index: PartIndex, title: &str, content: &str, image_url: Option<String>, seq: u64) -> Self {
        Self::build(
            DialogMode::Edit(index),
            title.to_string(),
            content.to_string(),
            image_url,
            seq,
        )
    }

    fn build(mode: DialogMode, title: String, content: String, preview_url: Option<String>, seq: u64) -> Self {
        Self {
            editor_id: format!("{}-content-{seq}", mode.prefix()),
            mode,
            initial_title: title,
            initial_content: content,
            preview_url,
            picked: None,
            fixed_at: None,
            drag: DragController::new(DragOptions::FREE),
        }
    }

    pub fn mode(&self) -> DialogMode {
        self.mode
    }

    /// DOM id the content editor attaches to.
    pub fn editor_id(&self) -> &str {
        &self.editor_id
    }

    pub fn fixed_at(&self) -> Option<Point> {
        self.fixed_at
    }

    pub(crate) fn pin(&mut self, at: Point) {
        self.fixed_at = Some(at);
    }

    pub fn picked(&self) -> Option<&ImageRef> {
        self.picked.as_ref()
    }

    pub fn select_image(&mut self, image: ImageRef) {
        self.preview_url = (!image.url.is_empty()).then(|| image.url.clone());
        self.picked = Some(image);
    }

    /// Validate and build the request. The title is trimmed; a blank one
    /// fails without producing a request.
    pub fn submit(&self, title: &str, content: String, post_id: u64) -> Result<DialogRequest, PersistError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PersistError::Validation(TITLE_REQUIRED.to_string()));
        }
        let image_id = self.picked.as_ref().map(|img| img.id).filter(|id| *id != 0);
        Ok(match self.mode {
            DialogMode::Add => {
                DialogRequest::Create(NewPart::from_dialog(post_id, title.to_string(), content, image_id))
            }
            DialogMode::Edit(index) => DialogRequest::Update(PartUpdate {
                post_id,
                index,
                title: Some(title.to_string()),
                content: Some(content),
                image_id,
            }),
        })
    }
}
