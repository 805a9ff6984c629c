//! Hotspot data model.
//!
//! A breakout page is a set of hotspots ("parts") laid over a responsive
//! image. Every coordinate stored here is a percentage of the container box,
//! so nothing in the model depends on the current pixel size of the page.
//!
//! Hotspot identity is a dense 1-based [`PartIndex`]. Removing a hotspot
//! re-sequences everything after it, exactly like the backing store does.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable 1-based position of a part within its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartIndex(u32);

impl PartIndex {
    pub const FIRST: PartIndex = PartIndex(1);

    /// Returns `None` for zero, which is never a valid part index.
    pub fn new(n: u32) -> Option<Self> {
        (n >= 1).then_some(PartIndex(n))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Index of the part stored at zero-based slot `slot`.
    pub fn from_slot(slot: usize) -> Self {
        PartIndex(slot as u32 + 1)
    }

    /// Zero-based slot of this part.
    pub fn slot(self) -> usize {
        (self.0 - 1) as usize
    }

    fn pred(self) -> Option<Self> {
        PartIndex::new(self.0 - 1)
    }
}

impl fmt::Display for PartIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Round to one decimal place, the precision every stored percentage uses.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A coordinate expressed as percentages (0–100) of the container box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

impl PercentPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build a point rounded to one decimal on both axes.
    pub fn rounded(x: f64, y: f64) -> Self {
        Self {
            x: round_tenth(x),
            y: round_tenth(y),
        }
    }
}

impl fmt::Display for PercentPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}%, {}%)", self.x, self.y)
    }
}

/// A media-library image attached to a part.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: u64,
    #[serde(default)]
    pub url: String,
}

/// One positioned marker on the main image.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub index: PartIndex,
    /// Saved centre of the marker.
    pub position: PercentPoint,
    /// Far end of the connector line. `None` means no line is drawn.
    pub guideline: Option<PercentPoint>,
    pub title: String,
    /// Rendered rich content fragment (trusted HTML from the page).
    pub content_html: String,
    pub image: Option<ImageRef>,
}

impl Hotspot {
    pub fn new(index: PartIndex, position: PercentPoint) -> Self {
        Self {
            index,
            position,
            guideline: None,
            title: String::new(),
            content_html: String::new(),
            image: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_content(mut self, html: impl Into<String>) -> Self {
        self.content_html = html.into();
        self
    }

    pub fn with_guideline(mut self, end: PercentPoint) -> Self {
        self.guideline = Some(end);
        self
    }
}

/// Dense, ordered collection of hotspots.
///
/// Indices always run `1..=len()` without gaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotspotSet {
    parts: Vec<Hotspot>,
}

impl HotspotSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `parts` in their current order and re-sequence
    /// indices so they are dense and 1-based.
    pub fn from_parts(parts: Vec<Hotspot>) -> Self {
        let mut set = Self { parts };
        set.resequence();
        set
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotspot> {
        self.parts.iter()
    }

    pub fn indices(&self) -> impl Iterator<Item = PartIndex> + '_ {
        self.parts.iter().map(|h| h.index)
    }

    pub fn get(&self, index: PartIndex) -> Option<&Hotspot> {
        self.parts.get(index.slot())
    }

    pub fn get_mut(&mut self, index: PartIndex) -> Option<&mut Hotspot> {
        self.parts.get_mut(index.slot())
    }

    pub fn last_index(&self) -> Option<PartIndex> {
        self.parts.last().map(|h| h.index)
    }

    /// Append a hotspot, assigning it the next index.
    pub fn push(&mut self, mut hotspot: Hotspot) -> PartIndex {
        let index = PartIndex::from_slot(self.parts.len());
        hotspot.index = index;
        self.parts.push(hotspot);
        index
    }

    /// Remove a hotspot and shift every later index down by one.
    pub fn remove(&mut self, index: PartIndex) -> Option<Hotspot> {
        if index.slot() >= self.parts.len() {
            return None;
        }
        let removed = self.parts.remove(index.slot());
        self.resequence();
        Some(removed)
    }

    fn resequence(&mut self) {
        for (slot, part) in self.parts.iter_mut().enumerate() {
            part.index = PartIndex::from_slot(slot);
        }
    }
}

/// Live guideline endpoints, keyed by the owning hotspot.
///
/// One entry per hotspot that currently has a connector line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Guidelines {
    ends: BTreeMap<PartIndex, PercentPoint>,
}

impl Guidelines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_hotspots(hotspots: &HotspotSet) -> Self {
        let ends = hotspots
            .iter()
            .filter_map(|h| h.guideline.map(|end| (h.index, end)))
            .collect();
        Self { ends }
    }

    pub fn get(&self, index: PartIndex) -> Option<PercentPoint> {
        self.ends.get(&index).copied()
    }

    pub fn set(&mut self, index: PartIndex, end: PercentPoint) {
        self.ends.insert(index, end);
    }

    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    pub fn contains(&self, index: PartIndex) -> bool {
        self.ends.contains_key(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PartIndex, PercentPoint)> + '_ {
        self.ends.iter().map(|(k, v)| (*k, *v))
    }

    /// Drop the entry for `index` and renumber every later entry so the map
    /// keeps matching a re-sequenced [`HotspotSet`].
    pub fn remove_and_shift(&mut self, index: PartIndex) -> Option<PercentPoint> {
        let removed = self.ends.remove(&index);
        let later: Vec<PartIndex> = self.ends.range(index..).map(|(k, _)| *k).collect();
        for key in later {
            if let (Some(end), Some(shifted)) = (self.ends.remove(&key), key.pred()) {
                self.ends.insert(shifted, end);
            }
        }
        removed
    }
}
