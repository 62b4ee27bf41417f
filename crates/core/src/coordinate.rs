//! Free-form coordinate strings: discovery in spreadsheet rows, parsing to
//! map points, and map links.
//!
//! Coordinates are typed by hand as `lat,lon`, `lon,lat`, `lat; lon` or
//! with degree marks and hemisphere letters.

use serde::Serialize;

use crate::cell::CellValue;
use crate::record::PLACEHOLDER;

/// Minimum length (in characters) of a cell that may hold a coordinate.
const MIN_COORDINATE_CELL_CHARS: usize = 11;

/// Minimum length of a stored coordinate worth plotting.
const MIN_MAPPABLE_CHARS: usize = 5;

const MAPS_URL: &str = "https://www.google.com/maps?q=";

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// `true` for text that looks like a coordinate pair: longer than ten
/// characters, containing a comma and at least one digit.
pub fn looks_like_coordinate(text: &str) -> bool {
    text.contains(',')
        && text.chars().count() >= MIN_COORDINATE_CELL_CHARS
        && text.chars().any(|c| c.is_ascii_digit())
}

/// First text cell of the row that looks like a coordinate pair.
pub fn find_coordinate(row: &[CellValue]) -> Option<&str> {
    row.iter()
        .filter_map(CellValue::as_str)
        .find(|text| looks_like_coordinate(text))
}

/// `true` when a stored coordinate is worth trying to plot.
pub fn is_mappable(coordinate: &str) -> bool {
    coordinate != PLACEHOLDER
        && coordinate.chars().count() >= MIN_MAPPABLE_CHARS
        && coordinate.chars().any(|c| c.is_ascii_digit())
}

/// Parse a hand-typed coordinate.
///
/// Letters and degree marks are dropped, then the text is split on `;`
/// if present, else on `,`, else on whitespace. A first number beyond
/// ±90 cannot be a latitude, so the pair is read as `lon,lat`.
pub fn parse_coordinate(coordinate: &str) -> Option<GeoPoint> {
    let cleaned: String = coordinate
        .chars()
        .filter(|c| !c.is_ascii_alphabetic() && *c != '°')
        .collect();
    let cleaned = cleaned.trim();

    let parts: Vec<&str> = if cleaned.contains(';') {
        cleaned.split(';').collect()
    } else if cleaned.contains(',') {
        cleaned.split(',').collect()
    } else {
        cleaned.split_whitespace().collect()
    };
    if parts.len() < 2 {
        return None;
    }

    let first = parse_leading_number(&parts[0].replacen(',', ".", 1))?;
    let second = parse_leading_number(&parts[1].replacen(',', ".", 1))?;

    if first.abs() > 90.0 {
        Some(GeoPoint {
            lat: second,
            lon: first,
        })
    } else {
        Some(GeoPoint {
            lat: first,
            lon: second,
        })
    }
}

/// Google Maps link for a stored coordinate, or `None` when there is
/// nothing to link to.
pub fn maps_link(coordinate: &str) -> Option<String> {
    let trimmed = coordinate.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER || trimmed == "0" {
        return None;
    }
    let query: String = trimmed
        .chars()
        .filter(|c| *c != '°' && !c.is_whitespace())
        .collect();
    Some(format!("{MAPS_URL}{query}"))
}

/// Longest leading `[+-]digits[.digits]` prefix of `text`, after leading
/// whitespace.
fn parse_leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in text.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    text[..end].trim_end_matches('.').parse().ok()
}
