//! Page configuration handed to the front end by the server.
//!
//! The server localizes a flat object onto the page. Scalars in that object
//! may arrive as strings (`"1"`, `"42"`) depending on how they were
//! serialized, so the flag and id fields accept both forms.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Fallback stroke/accent colour when the page does not configure one.
pub const DEFAULT_ACCENT_COLOR: &str = "#0073aa";

/// Viewports at least this wide use the desktop interaction model.
pub const DESKTOP_MIN_WIDTH: f64 = 768.0;

/// Call-to-action link shown at the bottom of the side panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cta {
    pub label: String,
    pub url: String,
}

/// Everything the session needs to know about the page it runs on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BreakoutConfig {
    #[serde(deserialize_with = "truthy")]
    pub can_edit: bool,
    #[serde(deserialize_with = "lenient_id")]
    pub post_id: u64,
    /// Endpoint for position, guideline and delete updates.
    pub rest_url: String,
    pub rest_create_url: String,
    pub rest_update_url: String,
    /// Security token sent with every mutation.
    pub nonce: String,
    pub line_color: String,
    pub circle_color: String,
    pub cta_label: String,
    pub cta_url: String,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            can_edit: false,
            post_id: 0,
            rest_url: String::new(),
            rest_create_url: String::new(),
            rest_update_url: String::new(),
            nonce: String::new(),
            line_color: DEFAULT_ACCENT_COLOR.to_string(),
            circle_color: DEFAULT_ACCENT_COLOR.to_string(),
            cta_label: String::new(),
            cta_url: String::new(),
        }
    }
}

impl BreakoutConfig {
    /// Parse the localized page object. Empty colours fall back to the
    /// default accent.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let mut config: Self =
            serde_json::from_str(json).map_err(|e| format!("Config parse error: {e}"))?;
        config.fill_defaults();
        Ok(config)
    }

    fn fill_defaults(&mut self) {
        if self.line_color.trim().is_empty() {
            self.line_color = DEFAULT_ACCENT_COLOR.to_string();
        }
        if self.circle_color.trim().is_empty() {
            self.circle_color = DEFAULT_ACCENT_COLOR.to_string();
        }
    }

    /// The call-to-action, present only when both label and URL are set.
    pub fn cta(&self) -> Option<Cta> {
        if self.cta_label.is_empty() || self.cta_url.is_empty() {
            return None;
        }
        Some(Cta {
            label: self.cta_label.clone(),
            url: self.cta_url.clone(),
        })
    }
}

/// Whether a viewport of this width gets the desktop behaviour.
pub fn is_desktop_width(width: f64) -> bool {
    width >= DESKTOP_MIN_WIDTH
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s == "1" || s == "true",
        _ => false,
    })
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| de::Error::custom(format!("invalid post id: {n}"))),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid post id: {s:?}"))),
        Value::Null => Ok(0),
        other => Err(de::Error::custom(format!("invalid post id: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn can_edit_accepts_truthy_permutations() {
        for raw in [r#"true"#, r#"1"#, r#""1""#, r#""true""#] {
            let json = format!(r#"{{"canEdit":{raw}}}"#);
            let config = BreakoutConfig::from_json(&json).unwrap();
            assert!(config.can_edit, "expected {raw} to be truthy");
        }
        for raw in [r#"false"#, r#"0"#, r#""""#, r#""yes""#, r#"null"#] {
            let json = format!(r#"{{"canEdit":{raw}}}"#);
            let config = BreakoutConfig::from_json(&json).unwrap();
            assert!(!config.can_edit, "expected {raw} to be falsy");
        }
    }

    #[test]
    fn post_id_accepts_string_or_number() {
        let a = BreakoutConfig::from_json(r#"{"postId":42}"#).unwrap();
        let b = BreakoutConfig::from_json(r#"{"postId":"42"}"#).unwrap();
        assert_eq!(a.post_id, 42);
        assert_eq!(b.post_id, 42);
        assert!(BreakoutConfig::from_json(r#"{"postId":"abc"}"#).is_err());
    }

    #[test]
    fn missing_colors_fall_back() {
        let config = BreakoutConfig::from_json(r#"{"lineColor":""}"#).unwrap();
        assert_eq!(config.line_color, DEFAULT_ACCENT_COLOR);
        assert_eq!(config.circle_color, DEFAULT_ACCENT_COLOR);
    }

    #[test]
    fn full_page_object() {
        let json = r##"{
            "canEdit": "1",
            "postId": "7",
            "restUrl": "https://example.test/wp-json/parts-breakout/v1/part-position",
            "restCreateUrl": "https://example.test/wp-json/parts-breakout/v1/part-create",
            "restUpdateUrl": "https://example.test/wp-json/parts-breakout/v1/part-update",
            "nonce": "abc123",
            "lineColor": "#a92f2e",
            "circleColor": "#a92f2e",
            "ctaLabel": "REQUEST ESTIMATE",
            "ctaUrl": "https://example.test/request-estimate/"
        }"##;
        let config = BreakoutConfig::from_json(json).unwrap();
        assert!(config.can_edit);
        assert_eq!(config.post_id, 7);
        assert_eq!(config.line_color, "#a92f2e");
        assert_eq!(
            config.cta(),
            Some(Cta {
                label: "REQUEST ESTIMATE".into(),
                url: "https://example.test/request-estimate/".into(),
            })
        );
    }

    #[test]
    fn cta_requires_label_and_url() {
        let config = BreakoutConfig::from_json(r#"{"ctaLabel":"Go"}"#).unwrap();
        assert_eq!(config.cta(), None);
    }

    #[test]
    fn desktop_breakpoint() {
        assert!(is_desktop_width(768.0));
        assert!(!is_desktop_width(767.9));
    }
}
