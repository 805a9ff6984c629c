//! In-memory backing store.
//!
//! Same rules as the real one: parts live in a dense list per post, the
//! wire index is 1-based, deletes re-index everything after the removed
//! part, and partial updates only touch the fields they carry.

use crate::persist::{
    Completion, NewPart, PartUpdate, PersistError, PersistenceApi, PositionUpdate, SaveResponse,
};
use pb_core::{Hotspot, HotspotSet, ImageRef, PartIndex, PercentPoint};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Title given to parts created without one.
pub const DEFAULT_TITLE: &str = "New Part";
/// Position given to parts created without one.
pub const DEFAULT_POSITION: PercentPoint = PercentPoint::new(50.0, 50.0);

#[derive(Debug, Clone, PartialEq)]
pub struct StoredPart {
    pub image_id: u64,
    pub title: String,
    pub content: String,
    pub left: f64,
    pub top: f64,
    pub line_x: Option<f64>,
    pub line_y: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    posts: HashMap<u64, Vec<StoredPart>>,
    /// Every position update seen, in arrival order.
    history: Vec<PositionUpdate>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_post(mut self, post_id: u64, parts: Vec<StoredPart>) -> Self {
        self.posts.insert(post_id, parts);
        self
    }

    pub fn parts(&self, post_id: u64) -> &[StoredPart] {
        self.posts.get(&post_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn history(&self) -> &[PositionUpdate] {
        &self.history
    }

    /// What a fresh page load would render for `post_id`.
    pub fn hotspots(&self, post_id: u64) -> HotspotSet {
        let parts = self
            .parts(post_id)
            .iter()
            .enumerate()
            .map(|(slot, p)| {
                let mut h = Hotspot::new(PartIndex::from_slot(slot), PercentPoint::new(p.left, p.top))
                    .with_title(p.title.clone())
                    .with_content(p.content.clone());
                if let (Some(x), Some(y)) = (p.line_x, p.line_y) {
                    h = h.with_guideline(PercentPoint::new(x, y));
                }
                if p.image_id != 0 {
                    h.image = Some(ImageRef {
                        id: p.image_id,
                        url: String::new(),
                    });
                }
                h
            })
            .collect();
        HotspotSet::from_parts(parts)
    }

    fn part_mut(&mut self, post_id: u64, index: PartIndex) -> Result<&mut StoredPart, PersistError> {
        if post_id == 0 {
            return Err(PersistError::InvalidParameters);
        }
        self.posts
            .get_mut(&post_id)
            .and_then(|parts| parts.get_mut(index.slot()))
            .ok_or(PersistError::PartNotFound(index))
    }

    pub fn apply_position(&mut self, update: &PositionUpdate) -> Result<SaveResponse, PersistError> {
        self.history.push(update.clone());
        self.part_mut(update.post_id, update.index)?;
        if update.delete {
            if let Some(parts) = self.posts.get_mut(&update.post_id) {
                parts.remove(update.index.slot());
            }
            return Ok(SaveResponse {
                deleted: true,
                ..SaveResponse::ok()
            });
        }
        let part = self.part_mut(update.post_id, update.index)?;
        if let Some(v) = update.left {
            part.left = v;
        }
        if let Some(v) = update.top {
            part.top = v;
        }
        if let Some(v) = update.line_x {
            part.line_x = Some(v);
        }
        if let Some(v) = update.line_y {
            part.line_y = Some(v);
        }
        Ok(SaveResponse::ok())
    }

    pub fn create(&mut self, part: &NewPart) -> Result<SaveResponse, PersistError> {
        if part.post_id == 0 {
            return Err(PersistError::InvalidParameters);
        }
        let title = if part.title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            part.title.clone()
        };
        let parts = self.posts.entry(part.post_id).or_default();
        parts.push(StoredPart {
            image_id: part.image_id.unwrap_or(0),
            title,
            content: part.content.clone(),
            left: part.position.x,
            top: part.position.y,
            line_x: Some(part.guideline.x),
            line_y: Some(part.guideline.y),
        });
        Ok(SaveResponse {
            index: Some(parts.len() as u32),
            ..SaveResponse::ok()
        })
    }

    pub fn update(&mut self, update: &PartUpdate) -> Result<SaveResponse, PersistError> {
        let part = self.part_mut(update.post_id, update.index)?;
        if let Some(title) = &update.title {
            part.title = title.clone();
        }
        if let Some(content) = &update.content {
            part.content = content.clone();
        }
        if let Some(id) = update.image_id {
            part.image_id = id;
        }
        Ok(SaveResponse::ok())
    }
}

/// Store errors reach callers the way the HTTP endpoint reports them: as a
/// response without `success`.
fn as_response(result: Result<SaveResponse, PersistError>) -> Result<SaveResponse, PersistError> {
    result
        .or_else(|e| {
            Ok(SaveResponse {
                message: Some(e.to_string()),
                ..SaveResponse::default()
            })
        })
        .and_then(SaveResponse::into_result)
}

impl PersistenceApi for Rc<RefCell<MemoryStore>> {
    fn update_position(&self, update: PositionUpdate) {
        if let Err(e) = self.borrow_mut().apply_position(&update) {
            log::warn!("position update for part {} failed: {e}", update.index);
        }
    }

    fn create_part(&self, part: NewPart, done: Completion) {
        let result = self.borrow_mut().create(&part);
        done(as_response(result));
    }

    fn update_part(&self, update: PartUpdate, done: Completion) {
        let result = self.borrow_mut().update(&update);
        done(as_response(result));
    }
}
