//! TG measurement table parsing
//!
//! The body of an ExpDat export follows the header's blank line: a
//! `;`-separated table whose header row carries units after a slash and a
//! doubled comment marker on its first column, closed by a one-line footer.

use crate::constants::{
    EDGE_COLUMN_TRAILING_STRIP, FIRST_COLUMN_LEADING_STRIP, TABLE_DELIMITER, UNIT_SEPARATOR,
};
use crate::error::{IngestError, Result};
use crate::models::{MeasurementTable, Scalar};
use crate::normalize::{coerce_column, trim_chars};
use tracing::debug;

/// Parse the measurement table following the header's blank line
pub fn parse_measurement_table(content: &str, blank_line: usize) -> Result<MeasurementTable> {
    let lines: Vec<&str> = content.lines().collect();

    // Last line is the export footer
    let end = lines.len().saturating_sub(1);
    let start = (blank_line + 1).min(end);

    let body: Vec<&str> = lines[start..end]
        .iter()
        .copied()
        .filter(|line| !line.trim().is_empty())
        .collect();

    if body.is_empty() {
        return Err(IngestError::format(
            "TG export has no measurement table after its header",
        ));
    }

    let text = body.join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(TABLE_DELIMITER)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns = normalize_column_names(&headers);

    let mut raw_rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw_rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    debug!(
        "Measurement table: {} columns, {} rows",
        columns.len(),
        raw_rows.len()
    );

    let rows = coerce_rows(&raw_rows, columns.len());
    MeasurementTable::new(columns, rows)
}

/// Drop unit suffixes and the comment/punctuation artifacts on the edge columns
pub fn normalize_column_names(headers: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = headers
        .iter()
        .map(|header| match header.split_once(UNIT_SEPARATOR) {
            Some((name, _)) => name.to_string(),
            None => header.clone(),
        })
        .collect();

    if let Some(first) = columns.first_mut() {
        *first = trim_chars(first, FIRST_COLUMN_LEADING_STRIP, EDGE_COLUMN_TRAILING_STRIP);
    }
    if let Some(last) = columns.last_mut() {
        *last = trim_chars(last, 0, EDGE_COLUMN_TRAILING_STRIP);
    }

    columns
}

/// Coerce column by column, then restore row order
fn coerce_rows(raw_rows: &[Vec<String>], width: usize) -> Vec<Vec<Scalar>> {
    let coerced_columns: Vec<Vec<Scalar>> = (0..width)
        .map(|index| {
            let cells: Vec<&str> = raw_rows.iter().map(|row| row[index].as_str()).collect();
            coerce_column(&cells)
        })
        .collect();

    (0..raw_rows.len())
        .map(|row| {
            coerced_columns
                .iter()
                .map(|column| column[row].clone())
                .collect()
        })
        .collect()
}
