//! Refinement parameter table parsing
//!
//! `fitparams.txt` starts with a title line, followed by a tab-separated
//! table whose first data row holds the refined values.

use crate::constants::FIT_PARAMS_DELIMITER;
use crate::error::{IngestError, Result};
use crate::models::FitParameters;
use crate::normalize::{Coercion, coerce, read_export};
use std::path::Path;
use tracing::{debug, info};

/// Parse the first data row of a refinement parameter table
pub fn parse_fit_parameters(content: &str) -> Result<FitParameters> {
    let table = content
        .split_once('\n')
        .map(|(_, rest)| rest)
        .unwrap_or_default();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(FIT_PARAMS_DELIMITER)
        .has_headers(true)
        .from_reader(table.as_bytes());

    let names: Vec<String> = reader
        .headers()?
        .iter()
        .map(|name| name.trim().to_string())
        .collect();

    let record = reader
        .records()
        .next()
        .ok_or_else(|| IngestError::format("Fit parameter table has no data rows"))??;

    let params: Vec<_> = names
        .into_iter()
        .zip(record.iter())
        .map(|(name, cell)| (name, coerce(cell, Coercion::LeaveAsText)))
        .collect();

    debug!("Parsed {} fit parameters", params.len());
    Ok(FitParameters::new(params))
}

/// Read and parse a refinement parameter file
pub fn read_fit_parameters(path: &Path) -> Result<FitParameters> {
    info!("Parsing XRD fit parameters: {}", path.display());
    let content = read_export(path)?;
    parse_fit_parameters(&content).map_err(|e| e.in_file(path))
}
