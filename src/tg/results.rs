//! TG results block parsing
//!
//! An ExpRes export stores one result per line after its header block. The
//! first line of the block holds the row labels shared by every result, so
//! the block is read transposed: each line becomes a column keyed by its
//! first field. Bookkeeping rows are then dropped, the columns whose labels
//! the exporter does not reliably fill are renamed by position, and decimal
//! commas are normalized before numeric coercion.

use crate::constants::{
    RESULT_BOOKKEEPING_ROWS, RESULT_COLUMN_RENAMES, RESULT_KEY_LEADING_STRIP,
    HEADER_FIELD_SEPARATOR,
};
use crate::error::{IngestError, Result};
use crate::models::{ResultEntry, ResultRecord};
use crate::normalize::{Coercion, coerce, decimal_point, first_token, trim_chars};
use std::collections::HashSet;
use tracing::debug;

/// One raw result line before row filtering
#[derive(Debug, Clone)]
struct RawColumn {
    key: String,
    cells: Vec<String>,
}

/// Parse an ExpRes export into a result record
pub fn parse_results(content: &str) -> Result<ResultRecord> {
    let lines: Vec<&str> = content.lines().collect();

    let block_start = lines
        .iter()
        .position(|line| line.trim().is_empty())
        .map(|blank| blank + 1)
        .ok_or_else(|| IngestError::format("No blank line before the TG results block"))?;

    // Last line is the export footer
    let block_end = lines.len().saturating_sub(1).max(block_start);
    let block = &lines[block_start..block_end];

    let (label_line, result_lines) = block
        .split_first()
        .ok_or_else(|| IngestError::format("TG results block is empty"))?;

    let labels = parse_row_labels(label_line)?;
    let columns = result_lines
        .iter()
        .enumerate()
        .map(|(offset, line)| parse_result_line(line, labels.len(), block_start + offset + 2))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Results block: {} row labels, {} result columns",
        labels.len(),
        columns.len()
    );

    let kept_rows = retained_rows(&labels)?;
    let keys = positional_keys(&columns)?;

    let entries = columns
        .iter()
        .zip(keys)
        .map(|(column, key)| {
            let values = kept_rows
                .iter()
                .map(|&row| {
                    let cell = decimal_point(&column.cells[row]);
                    (labels[row].clone(), coerce(&cell, Coercion::ToNull))
                })
                .collect();
            ResultEntry::new(key, values)
        })
        .collect();

    Ok(ResultRecord::new(entries))
}

/// Row labels from the block's first line, without its leading label cell
fn parse_row_labels(line: &str) -> Result<Vec<String>> {
    let labels = line
        .split(HEADER_FIELD_SEPARATOR)
        .skip(1)
        .map(|field| {
            first_token(field).map(str::to_string).ok_or_else(|| {
                IngestError::format(format!("Empty row label in results header '{}'", line))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if labels.is_empty() {
        return Err(IngestError::format("TG results header has no row labels"));
    }
    Ok(labels)
}

fn parse_result_line(line: &str, expected: usize, line_number: usize) -> Result<RawColumn> {
    let mut fields = line
        .split(HEADER_FIELD_SEPARATOR)
        .map(|field| first_token(field).unwrap_or_default().to_string());

    let key_field = fields.next().unwrap_or_default();
    let key = trim_chars(&key_field, RESULT_KEY_LEADING_STRIP, 0);
    if key.is_empty() {
        return Err(IngestError::format(format!(
            "Result line {} has no result key: '{}'",
            line_number, line
        )));
    }

    let cells: Vec<String> = fields.collect();
    if cells.len() != expected {
        return Err(IngestError::format(format!(
            "Result '{}' on line {} has {} values, expected {}",
            key,
            line_number,
            cells.len(),
            expected
        )));
    }

    Ok(RawColumn { key, cells })
}

/// Indices of the rows left after removing the bookkeeping rows
fn retained_rows(labels: &[String]) -> Result<Vec<usize>> {
    for bookkeeping in RESULT_BOOKKEEPING_ROWS {
        if !labels.iter().any(|label| label == bookkeeping) {
            return Err(IngestError::format(format!(
                "TG results block lacks the '{}' row",
                bookkeeping
            )));
        }
    }

    Ok(labels
        .iter()
        .enumerate()
        .filter(|(_, label)| !RESULT_BOOKKEEPING_ROWS.contains(&label.as_str()))
        .map(|(index, _)| index)
        .collect())
}

/// Result keys after applying the positional renames
fn positional_keys(columns: &[RawColumn]) -> Result<Vec<String>> {
    if columns.len() < RESULT_COLUMN_RENAMES.len() {
        return Err(IngestError::format(format!(
            "TG results block has {} result lines, at least {} are required",
            columns.len(),
            RESULT_COLUMN_RENAMES.len()
        )));
    }

    let mut keys: Vec<String> = columns.iter().map(|column| column.key.clone()).collect();
    for (position, name) in RESULT_COLUMN_RENAMES {
        if let Some(index) = position.index(keys.len()) {
            keys[index] = (*name).to_string();
        }
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = keys.iter().find(|key| !seen.insert(key.as_str())) {
        return Err(IngestError::format(format!(
            "Duplicate result key '{}' in TG results block",
            duplicate
        )));
    }

    Ok(keys)
}
