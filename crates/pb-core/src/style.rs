//! Inline-style and attribute value parsing.
//!
//! Server-rendered hotspots carry their saved position as an inline style
//! (`left: 12.5%; top: 40%;`) and their guideline as `data-line-*`
//! attributes that may be empty. Built on `winnow` 0.7.

use crate::model::PercentPoint;
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Read the `left` / `top` percentages out of an inline style attribute.
///
/// Unknown declarations are skipped. Both properties must be present.
#[must_use = "parsing result should be used"]
pub fn parse_inline_position(style: &str) -> Result<PercentPoint, String> {
    let mut rest = style;
    let mut left = None;
    let mut top = None;

    skip_separators(&mut rest);
    while !rest.is_empty() {
        let (name, value) = parse_declaration
            .parse_next(&mut rest)
            .map_err(|e| format!("Style parse error: {e}"))?;
        match name.to_ascii_lowercase().as_str() {
            "left" => left = Some(parse_percent(value)?),
            "top" => top = Some(parse_percent(value)?),
            _ => {}
        }
        skip_separators(&mut rest);
    }

    match (left, top) {
        (Some(x), Some(y)) => Ok(PercentPoint::new(x, y)),
        _ => Err(format!("Style parse error: no left/top in {style:?}")),
    }
}

/// Parse a percentage such as `12.5%`, ` 40 ` or `-3.25%`.
#[must_use = "parsing result should be used"]
pub fn parse_percent(value: &str) -> Result<f64, String> {
    let mut rest = value.trim();
    let n = parse_number
        .parse_next(&mut rest)
        .map_err(|e| format!("Percentage parse error in {value:?}: {e}"))?;
    if rest.starts_with('%') {
        rest = &rest[1..];
    }
    if !rest.trim().is_empty() {
        return Err(format!("Percentage parse error: trailing {rest:?} in {value:?}"));
    }
    Ok(n)
}

/// Parse an optional coordinate attribute. Missing, empty and malformed
/// values all mean "absent".
pub fn parse_optional_coord(value: Option<&str>) -> Option<f64> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    match parse_percent(raw) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("ignoring coordinate attribute: {e}");
            None
        }
    }
}

/// Format a percentage for a CSS length (`12.5%`, `10%`).
pub fn css_percent(value: f64) -> String {
    format!("{value}%")
}

/// Format a pixel offset for a CSS length.
pub fn css_px(value: f64) -> String {
    format!("{value}px")
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn skip_separators(input: &mut &str) {
    loop {
        let before = *input;
        *input = input.trim_start();
        if input.starts_with(';') {
            *input = &input[1..];
        }
        if *input == before {
            break;
        }
    }
}

fn parse_property_name<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_').parse_next(input)
}

fn parse_declaration<'s>(input: &mut &'s str) -> ModalResult<(&'s str, &'s str)> {
    let name = parse_property_name(input)?;
    *input = input.trim_start();
    if !input.starts_with(':') {
        return Err(winnow::error::ErrMode::Backtrack(ContextError::new()));
    }
    *input = &input[1..];
    let value: &str = take_till(0.., ';').parse_next(input)?;
    if input.starts_with(';') {
        *input = &input[1..];
    }
    Ok((name, value.trim()))
}

fn parse_number(input: &mut &str) -> ModalResult<f64> {
    let start = *input;
    if input.starts_with('-') || input.starts_with('+') {
        *input = &input[1..];
    }
    let int_part: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    let mut frac_len = 0;
    if input.starts_with('.') {
        *input = &input[1..];
        let frac: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
        frac_len = frac.len();
    }
    if int_part.is_empty() && frac_len == 0 {
        return Err(winnow::error::ErrMode::Backtrack(ContextError::new()));
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f64>()
        .map_err(|_| winnow::error::ErrMode::Backtrack(ContextError::new()))
}
