//! Initial render data: the hotspots the page was rendered with.
//!
//! Hosts either scrape the rendered markup into [`HotspotRecord`]s or hand
//! over the same shape as JSON. A record with a bad index is skipped with a
//! warning; the rest of the page still renders.

use crate::model::{Hotspot, HotspotSet, ImageRef, PartIndex, PercentPoint};
use crate::style::parse_inline_position;
use serde::Deserialize;

/// One hotspot as it arrives from the page.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotspotRecord {
    pub index: u32,
    pub left: Option<f64>,
    pub top: Option<f64>,
    /// Raw inline style, used when `left`/`top` are not given.
    pub style: Option<String>,
    pub line_x: Option<f64>,
    pub line_y: Option<f64>,
    pub title: String,
    pub content: String,
    pub image: Option<ImageRef>,
}

/// Where a part without a readable position is placed.
pub const FALLBACK_POSITION: PercentPoint = PercentPoint::new(50.0, 50.0);

impl HotspotRecord {
    fn position(&self) -> Result<PercentPoint, String> {
        match (self.left, self.top, &self.style) {
            (Some(x), Some(y), _) => Ok(PercentPoint::new(x, y)),
            (_, _, Some(style)) => parse_inline_position(style),
            _ => Err("no position".to_string()),
        }
    }

    /// Validate the record and build a hotspot from it.
    ///
    /// Only a bad index is fatal. An unreadable position falls back to the
    /// centre of the image, the same default the backing store uses, so the
    /// part keeps its identity and stays reachable.
    pub fn to_hotspot(&self) -> Result<Hotspot, String> {
        let index = PartIndex::new(self.index)
            .ok_or_else(|| format!("hotspot {:?}: index must be 1-based", self.title))?;
        let position = match self.position() {
            Ok(p) if p.x.is_finite() && p.y.is_finite() => p,
            Ok(p) => {
                log::warn!("hotspot {index}: non-finite position {p}, centring");
                FALLBACK_POSITION
            }
            Err(e) => {
                log::warn!("hotspot {index}: {e}, centring");
                FALLBACK_POSITION
            }
        };
        let guideline = match (self.line_x, self.line_y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(PercentPoint::new(x, y)),
            _ => None,
        };
        Ok(Hotspot {
            index,
            position,
            guideline,
            title: self.title.clone(),
            content_html: self.content.clone(),
            image: self.image.clone().filter(|img| img.id != 0 || !img.url.is_empty()),
        })
    }
}

/// The full set of hotspots a page was rendered with.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct InitialData {
    pub hotspots: Vec<HotspotRecord>,
}

impl InitialData {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Initial data parse error: {e}"))
    }

    /// Build the hotspot set, ordered by the records' indices. Records
    /// without a usable index are logged and dropped.
    pub fn into_hotspots(self) -> HotspotSet {
        let mut parts: Vec<Hotspot> = self
            .hotspots
            .iter()
            .filter_map(|record| match record.to_hotspot() {
                Ok(h) => Some(h),
                Err(e) => {
                    log::warn!("skipping hotspot: {e}");
                    None
                }
            })
            .collect();
        parts.sort_by_key(|h| h.index);
        HotspotSet::from_parts(parts)
    }
}
