//! Delegated event dispatch.
//!
//! One listener per event type on the document. The target is resolved to a
//! [`Role`] by asking an ordered registry of selectors; nested roles come
//! before their containers so the innermost one wins (a remove button
//! inside a hotspot is a remove button, not a hotspot).

use pb_core::PartIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    RemoveButton,
    EditPart,
    AddPart,
    PanelClose,
    PanelBackdrop,
    DialogClose,
    DialogCancel,
    DialogSave,
    DialogSelectImage,
    DialogBackdrop,
    /// A form control inside a dialog; never starts a dialog drag.
    FormControl,
    /// The dialog body itself (drag grip).
    Dialog,
    GuidelineHandle,
    Hotspot,
    AccordionToggle,
}

/// How a selector is tested against the event target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// The target or any ancestor.
    Closest(&'static str),
    /// The target element itself.
    Exact(&'static str),
}

impl Match {
    pub fn selector(&self) -> &'static str {
        match self {
            Match::Closest(s) | Match::Exact(s) => s,
        }
    }
}

/// Element matched by a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Found {
    /// Raw `data-index` of the matched element.
    pub data_index: Option<String>,
}

/// DOM queries the registry needs, answered for one event target.
pub trait RoleLookup {
    fn closest(&self, selector: &str) -> Option<Found>;
    fn is(&self, selector: &str) -> Option<Found>;
}

/// Selector for the nearest element carrying a part index.
pub const INDEXED: &str = "[data-index]";

/// Interactive controls of an open part dialog. Buttons elsewhere on the
/// page (accordion toggles, the add button) are not dialog controls.
pub const DIALOG_CONTROLS: &str = ".parts-add-form input, .parts-add-form textarea, .parts-add-form select, .parts-add-form button, .parts-add-form .tox";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub role: Role,
    pub index: Option<PartIndex>,
}

#[derive(Debug, Clone)]
pub struct RoleRegistry {
    entries: Vec<(Role, Match)>,
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Roles of the breakout page, innermost first.
    pub fn standard() -> Self {
        Self::new()
            .with(Role::RemoveButton, Match::Closest(".parts-remove-btn"))
            .with(Role::EditPart, Match::Closest(".parts-edit-part-btn"))
            .with(Role::AddPart, Match::Closest(".parts-add-part-btn"))
            .with(Role::PanelClose, Match::Exact(".parts-slideout-close"))
            .with(Role::PanelBackdrop, Match::Exact(".parts-slideout-overlay"))
            .with(Role::DialogClose, Match::Closest(".parts-add-close"))
            .with(Role::DialogCancel, Match::Closest(".parts-add-cancel, .parts-edit-cancel"))
            .with(Role::DialogSave, Match::Closest(".parts-add-save, .parts-edit-save"))
            .with(
                Role::DialogSelectImage,
                Match::Closest(".parts-add-select-image, .parts-edit-select-image"),
            )
            .with(Role::DialogBackdrop, Match::Exact(".parts-add-form-overlay"))
            .with(Role::AccordionToggle, Match::Closest(".part-accordion-toggle"))
            .with(Role::FormControl, Match::Closest(DIALOG_CONTROLS))
            .with(Role::Dialog, Match::Closest(".parts-add-form"))
            .with(Role::GuidelineHandle, Match::Closest(".parts-line-handle"))
            .with(Role::Hotspot, Match::Closest(".part-hotspot"))
    }

    pub fn with(mut self, role: Role, matcher: Match) -> Self {
        self.entries.push((role, matcher));
        self
    }

    pub fn entries(&self) -> &[(Role, Match)] {
        &self.entries
    }

    /// First registered role the target satisfies.
    pub fn resolve(&self, target: &dyn RoleLookup) -> Option<Hit> {
        self.entries.iter().find_map(|(role, matcher)| {
            let found = match matcher {
                Match::Closest(sel) => target.closest(sel),
                Match::Exact(sel) => target.is(sel),
            }?;
            // Controls nested in a hotspot take the hotspot's index.
            let raw = found
                .data_index
                .or_else(|| target.closest(INDEXED).and_then(|f| f.data_index));
            let index = raw
                .as_deref()
                .and_then(|raw| raw.trim().parse::<u32>().ok())
                .and_then(PartIndex::new);
            Some(Hit { role: *role, index })
        })
    }
}

/// Element trees shaped like the breakout page, with enough selector
/// matching (compound classes, selector lists, descendant chains) to
/// resolve roles the way the browser does.
#[cfg(test)]
pub(crate) mod markup {
    use super::{Found, RoleLookup};
    use std::rc::Rc;

    pub struct Node {
        tag: &'static str,
        classes: Vec<&'static str>,
        data_index: Option<&'static str>,
        parent: Option<Rc<Node>>,
    }

    /// `shape` reads `tag.class.class`, with an optional `[n]` data-index.
    pub fn el(shape: &'static str, parent: Option<&Rc<Node>>) -> Rc<Node> {
        let (head, data_index) = match shape.split_once('[') {
            Some((head, rest)) => (head, Some(rest.trim_end_matches(']'))),
            None => (shape, None),
        };
        let mut parts = head.split('.');
        let tag = parts.next().unwrap_or("div");
        Rc::new(Node {
            tag,
            classes: parts.collect(),
            data_index,
            parent: parent.cloned(),
        })
    }

    impl Node {
        fn matches_simple(&self, simple: &str) -> bool {
            if simple == "[data-index]" {
                return self.data_index.is_some();
            }
            let mut parts = simple.split('.');
            let tag = parts.next().unwrap_or("");
            (tag.is_empty() || tag == self.tag) && parts.all(|c| self.classes.contains(&c))
        }

        fn matches(&self, selector: &str) -> bool {
            selector.split(',').any(|complex| {
                let chain: Vec<&str> = complex.split_whitespace().collect();
                match chain.split_last() {
                    Some((last, rest)) => {
                        self.matches_simple(last) && ancestors_match(self.parent.as_ref(), rest)
                    }
                    None => false,
                }
            })
        }

        fn found(&self) -> Found {
            Found {
                data_index: self.data_index.map(str::to_string),
            }
        }
    }

    fn ancestors_match(mut node: Option<&Rc<Node>>, chain: &[&str]) -> bool {
        let Some((last, rest)) = chain.split_last() else {
            return true;
        };
        while let Some(n) = node {
            if n.matches_simple(last) {
                return ancestors_match(n.parent.as_ref(), rest);
            }
            node = n.parent.as_ref();
        }
        false
    }

    /// The element an event was dispatched to.
    pub struct Target(pub Rc<Node>);

    impl RoleLookup for Target {
        fn closest(&self, selector: &str) -> Option<Found> {
            let mut node = Some(&self.0);
            while let Some(n) = node {
                if n.matches(selector) {
                    return Some(n.found());
                }
                node = n.parent.as_ref();
            }
            None
        }

        fn is(&self, selector: &str) -> Option<Found> {
            self.0.matches(selector).then(|| self.0.found())
        }
    }

    pub fn body() -> Rc<Node> {
        let html = el("html", None);
        el("body", Some(&html))
    }

    /// `div.part-hotspot[n]` inside the wrapper.
    pub fn hotspot(n: &'static str) -> Rc<Node> {
        let wrapper = el("div.parts-breakout-wrapper", Some(&body()));
        el(
            match n {
                "1" => "div.part-hotspot[1]",
                "2" => "div.part-hotspot[2]",
                _ => "div.part-hotspot[3]",
            },
            Some(&wrapper),
        )
    }

    /// The mobile list's toggle button for one part.
    pub fn accordion_toggle() -> Rc<Node> {
        let list = el("div.parts-mobile-list", Some(&body()));
        let block = el("div.part-mobile-block", Some(&list));
        el("button.part-accordion-toggle", Some(&block))
    }

    /// Open part dialog; returns the form element.
    pub fn dialog_form() -> Rc<Node> {
        let overlay = el("div.parts-add-form-overlay.open", Some(&body()));
        el("div.parts-add-form", Some(&overlay))
    }

    /// Slideout content area.
    pub fn panel_content() -> Rc<Node> {
        let overlay = el("div.parts-slideout-overlay.open", Some(&body()));
        let panel = el("div.parts-slideout", Some(&overlay));
        el("div.parts-slideout-content", Some(&panel))
    }
}
