//! Persistence API: request shapes, responses and errors.
//!
//! Three logical operations reach the backing store as form-encoded POSTs
//! carrying a nonce header. Drag commits are fire-and-forget; create and
//! update report back through a completion, and the only resync is a page
//! reload. Requests are not sequenced: the last one to land wins.

use crate::capability::PageHost;
use pb_core::{PartIndex, PercentPoint};
use serde::Deserialize;
use std::rc::Rc;
use thiserror::Error;

/// Request header carrying the security token.
pub const NONCE_HEADER: &str = "X-WP-Nonce";
/// Body content type for every mutation.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Default placement of a part created from the add dialog.
pub const NEW_PART_POSITION: PercentPoint = PercentPoint::new(10.0, 10.0);
/// Default guideline end of a part created from the add dialog.
pub const NEW_PART_GUIDELINE: PercentPoint = PercentPoint::new(50.0, 50.0);

pub type FormFields = Vec<(&'static str, String)>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The store answered without a truthy `success`.
    #[error("Request rejected by the server")]
    Rejected,

    /// The response body was not the expected JSON.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Caught client-side; no request was sent.
    #[error("{0}")]
    Validation(String),

    #[error("Part {0} not found")]
    PartNotFound(PartIndex),

    #[error("Invalid parameters")]
    InvalidParameters,
}

/// Position, guideline or delete update for one part.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdate {
    pub post_id: u64,
    pub index: PartIndex,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub line_x: Option<f64>,
    pub line_y: Option<f64>,
    pub delete: bool,
}

impl PositionUpdate {
    fn empty(post_id: u64, index: PartIndex) -> Self {
        Self {
            post_id,
            index,
            left: None,
            top: None,
            line_x: None,
            line_y: None,
            delete: false,
        }
    }

    pub fn moved(post_id: u64, index: PartIndex, to: PercentPoint) -> Self {
        Self {
            left: Some(to.x),
            top: Some(to.y),
            ..Self::empty(post_id, index)
        }
    }

    pub fn guideline(post_id: u64, index: PartIndex, end: PercentPoint) -> Self {
        Self {
            line_x: Some(end.x),
            line_y: Some(end.y),
            ..Self::empty(post_id, index)
        }
    }

    pub fn delete(post_id: u64, index: PartIndex) -> Self {
        Self {
            delete: true,
            ..Self::empty(post_id, index)
        }
    }

    pub fn form_fields(&self) -> FormFields {
        let mut fields = vec![("post_id", self.post_id.to_string()), ("index", self.index.to_string())];
        push_opt(&mut fields, "left", self.left);
        push_opt(&mut fields, "top", self.top);
        push_opt(&mut fields, "line_x", self.line_x);
        push_opt(&mut fields, "line_y", self.line_y);
        if self.delete {
            fields.push(("delete", "1".to_string()));
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPart {
    pub post_id: u64,
    pub position: PercentPoint,
    pub title: String,
    pub content: String,
    pub image_id: Option<u64>,
    pub guideline: PercentPoint,
}

impl NewPart {
    /// A part as the add dialog creates it: near the top-left corner with
    /// its guideline end in the middle of the image.
    pub fn from_dialog(post_id: u64, title: String, content: String, image_id: Option<u64>) -> Self {
        Self {
            post_id,
            position: NEW_PART_POSITION,
            title,
            content,
            image_id,
            guideline: NEW_PART_GUIDELINE,
        }
    }

    pub fn form_fields(&self) -> FormFields {
        let mut fields = vec![
            ("post_id", self.post_id.to_string()),
            ("left", self.position.x.to_string()),
            ("top", self.position.y.to_string()),
            ("part_title", self.title.clone()),
            ("content", self.content.clone()),
            ("line_x", self.guideline.x.to_string()),
            ("line_y", self.guideline.y.to_string()),
        ];
        if let Some(id) = self.image_id {
            fields.push(("image_id", id.to_string()));
        }
        fields
    }
}

/// Content update for one part. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct PartUpdate {
    pub post_id: u64,
    pub index: PartIndex,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_id: Option<u64>,
}

impl PartUpdate {
    pub fn form_fields(&self) -> FormFields {
        let mut fields = vec![("post_id", self.post_id.to_string()), ("index", self.index.to_string())];
        if let Some(title) = &self.title {
            fields.push(("part_title", title.clone()));
        }
        if let Some(content) = &self.content {
            fields.push(("content", content.clone()));
        }
        if let Some(id) = self.image_id {
            fields.push(("image_id", id.to_string()));
        }
        fields
    }
}

fn push_opt(fields: &mut FormFields, name: &'static str, value: Option<f64>) {
    if let Some(v) = value {
        fields.push((name, v.to_string()));
    }
}

/// JSON body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SaveResponse {
    pub success: bool,
    pub deleted: bool,
    pub index: Option<u32>,
    pub message: Option<String>,
}

impl SaveResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn from_json(body: &str) -> Result<Self, PersistError> {
        serde_json::from_str(body).map_err(|e| PersistError::Decode(e.to_string()))
    }

    /// Anything but a truthy `success` is a generic failure.
    pub fn into_result(self) -> Result<Self, PersistError> {
        if self.success {
            return Ok(self);
        }
        if let Some(message) = &self.message {
            log::warn!("save rejected: {message}");
        }
        Err(PersistError::Rejected)
    }
}

pub type Completion = Box<dyn FnOnce(Result<SaveResponse, PersistError>)>;

/// The backing store as the session sees it.
pub trait PersistenceApi {
    /// Fire and forget. Failures are only logged.
    fn update_position(&self, update: PositionUpdate);
    fn create_part(&self, part: NewPart, done: Completion);
    fn update_part(&self, update: PartUpdate, done: Completion);
}

/// Which dialog submitted a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
}

impl Mutation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Mutation::Create => "Sorry, the part could not be created.",
            Mutation::Update => "Sorry, the part could not be updated.",
        }
    }

    pub fn network_message(self) -> &'static str {
        match self {
            Mutation::Create => "Network error while creating part.",
            Mutation::Update => "Network error while updating part.",
        }
    }
}

/// Completion for dialog saves: reload on success, alert otherwise.
pub fn settle(host: Rc<dyn PageHost>, mutation: Mutation) -> Completion {
    Box::new(move |result| match result {
        Ok(_) => host.reload(),
        Err(PersistError::Network(e) | PersistError::Decode(e)) => {
            log::warn!("{mutation:?} failed: {e}");
            host.alert(mutation.network_message());
        }
        Err(e) => {
            log::warn!("{mutation:?} failed: {e}");
            host.alert(mutation.failure_message());
        }
    })
}
