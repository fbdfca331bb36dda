//! TG export header parsing and metadata normalization
//!
//! The ExpDat preamble is a block of `#LABEL:;value` lines terminated by a
//! blank line. Only a handful of labels are kept; unit-bearing labels are
//! renamed through the legacy key table, values lose their unit suffix and
//! temperature-program segments are gathered into a nested map.

use crate::constants::{
    DATE_LABEL, HEADER_ALLOWLIST, HEADER_FIELD_SEPARATOR, HEADER_LABEL_SEPARATOR,
    LEGACY_KEY_NAMES, NUMERIC_METADATA_KEYS, SEGMENT_MARKER, UNIT_SEPARATOR,
};
use crate::error::{IngestError, Result};
use crate::models::{InstrumentMetadata, Scalar};
use crate::normalize::{first_token, parse_number};
use tracing::debug;

/// Parsed header with the line index of its terminating blank line
#[derive(Debug, Clone)]
pub struct TgHeader {
    pub metadata: InstrumentMetadata,

    /// Zero-based line index of the blank line; the body starts after it
    pub blank_line: usize,
}

impl TgHeader {
    /// Parse the header block of an ExpDat export
    pub fn parse(content: &str) -> Result<Self> {
        let mut raw_fields = Vec::new();
        let mut blank_line = None;

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                blank_line = Some(index);
                break;
            }
            raw_fields.push(split_header_line(line, index)?);
        }

        let blank_line = blank_line
            .ok_or_else(|| IngestError::format("No blank line terminating the TG header"))?;

        debug!(
            "Header has {} lines, body starts after line {}",
            raw_fields.len(),
            blank_line + 1
        );

        let metadata = normalize_fields(raw_fields)?;
        Ok(Self {
            metadata,
            blank_line,
        })
    }
}

/// Split `#LABEL:;value` into its label and raw value
fn split_header_line(line: &str, index: usize) -> Result<(String, String)> {
    let fields: Vec<&str> = line.split(HEADER_FIELD_SEPARATOR).collect();
    if fields.len() != 2 {
        return Err(IngestError::format(format!(
            "Header line {} has {} '{}'-separated fields, expected 2: '{}'",
            index + 1,
            fields.len(),
            HEADER_FIELD_SEPARATOR,
            line
        )));
    }

    let mut chars = fields[0].chars();
    let marker = chars.next();
    let label = chars.as_str();

    let parts: Vec<&str> = label.split(HEADER_LABEL_SEPARATOR).collect();
    if parts.len() != 2 {
        return Err(IngestError::format(format!(
            "Header label on line {} must contain exactly one '{}': '{}'",
            index + 1,
            HEADER_LABEL_SEPARATOR,
            fields[0]
        )));
    }

    let mut key = parts[0];
    if marker == Some('[') {
        key = key.strip_suffix(']').unwrap_or(key);
    }

    Ok((key.to_string(), fields[1].to_string()))
}

fn is_wanted(label: &str) -> bool {
    HEADER_ALLOWLIST.contains(&label) || label.contains(SEGMENT_MARKER)
}

/// Canonical key for a unit-bearing label
fn canonical_key(label: &str) -> String {
    if let Some((_, name)) = LEGACY_KEY_NAMES.iter().find(|(raw, _)| *raw == label) {
        return (*name).to_string();
    }

    match label.split_once(UNIT_SEPARATOR) {
        Some((prefix, _)) if prefix.contains("DATE") => prefix.to_string(),
        Some((prefix, _)) => {
            let mut name = prefix.to_string();
            name.pop();
            name
        }
        None => label.to_string(),
    }
}

/// `DD.MM.YYYY` becomes `YYYY.MM.DD`
fn reverse_date(value: &str) -> String {
    value.split('.').rev().collect::<Vec<_>>().join(".")
}

fn normalize_fields(raw_fields: Vec<(String, String)>) -> Result<InstrumentMetadata> {
    let mut metadata = InstrumentMetadata::default();

    for (label, raw_value) in raw_fields.into_iter().filter(|(l, _)| is_wanted(l)) {
        let token = first_token(&raw_value).ok_or_else(|| {
            IngestError::format(format!("Header field '{}' has no value", label))
        })?;

        let value = if label == DATE_LABEL {
            reverse_date(token)
        } else {
            token.to_string()
        };

        let key = canonical_key(&label);
        let is_segment = key.contains(SEGMENT_MARKER);
        let key = key.to_lowercase();

        if is_segment {
            metadata.segments.insert(key, Scalar::Text(value));
        } else {
            metadata.fields.insert(key, Scalar::Text(value));
        }
    }

    for key in NUMERIC_METADATA_KEYS {
        let raw = match metadata.fields.get(*key) {
            Some(Scalar::Text(text)) => text.clone(),
            _ => return Err(IngestError::lookup_missing(*key, "TG header")),
        };
        let value = parse_number(&raw).ok_or_else(|| {
            IngestError::format(format!("Header field '{}' is not numeric: '{}'", key, raw))
        })?;
        metadata.fields.insert((*key).to_string(), Scalar::Number(value));
    }

    Ok(metadata)
}
