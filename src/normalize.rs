//! Numeric and unit normalization shared by every parser
//!
//! Instrument exports mix units into values (`50.12 mg`), use decimal commas
//! in result blocks and are not always valid UTF-8. The helpers here turn raw
//! cells into [`Scalar`] values under one of two explicit coercion modes.

use crate::error::{IngestError, Result};
use crate::models::Scalar;
use std::path::Path;
use tracing::debug;

/// How a cell that is not a number is represented after coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Non-numeric cells become null
    ToNull,
    /// Non-numeric cells keep their original text
    LeaveAsText,
}

/// Read an instrument export, falling back to Latin-1 for non-UTF-8 bytes
pub fn read_export(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| IngestError::io(format!("Failed to read {}", path.display()), e))?;
    Ok(decode_export(bytes))
}

/// Decode raw export bytes
///
/// Exports written on lab PCs often carry single-byte degree signs and
/// micro symbols; each such byte maps to the Latin-1 code point of the same value.
pub fn decode_export(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!("Export is not valid UTF-8, decoding as Latin-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// First whitespace-delimited token of a value, dropping any trailing unit
pub fn first_token(raw: &str) -> Option<&str> {
    raw.split_whitespace().next()
}

/// Replace decimal commas with decimal points
pub fn decimal_point(raw: &str) -> String {
    raw.replace(',', ".")
}

/// Parse a trimmed cell as a float
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Coerce a single cell; empty cells are always null
pub fn coerce(raw: &str, mode: Coercion) -> Scalar {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Scalar::Null;
    }
    match (parse_number(trimmed), mode) {
        (Some(value), _) => Scalar::Number(value),
        (None, Coercion::ToNull) => Scalar::Null,
        (None, Coercion::LeaveAsText) => Scalar::Text(trimmed.to_string()),
    }
}

/// Coerce a whole column, keeping it as text unless every cell is numeric
///
/// Columns are converted as a unit so a single stray label leaves the
/// column untouched rather than producing a mix of numbers and text.
pub fn coerce_column(cells: &[&str]) -> Vec<Scalar> {
    let all_numeric = cells
        .iter()
        .all(|cell| cell.trim().is_empty() || parse_number(cell).is_some());

    if all_numeric {
        return cells
            .iter()
            .map(|cell| coerce(cell, Coercion::ToNull))
            .collect();
    }

    cells
        .iter()
        .map(|cell| match cell.trim() {
            "" => Scalar::Null,
            trimmed => Scalar::Text(trimmed.to_string()),
        })
        .collect()
}

/// Round half away from zero to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Drop `leading` characters from the front and `trailing` from the end
///
/// Works on characters, not bytes, so labels carrying `°` or `µ` are safe.
pub fn trim_chars(raw: &str, leading: usize, trailing: usize) -> String {
    let count = raw.chars().count();
    let keep = count.saturating_sub(leading + trailing);
    raw.chars().skip(leading).take(keep).collect()
}
