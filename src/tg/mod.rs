//! TG/DSC export parsing
//!
//! A TG run produces two exports:
//! - an `ExpDat` file: metadata header, blank line, `;`-separated measurement
//!   table and a footer line
//! - an `ExpRes` file: header block, blank line, transposed results block and
//!   a footer line
//!
//! ## Architecture
//!
//! - [`header`] - header block parsing and metadata normalization
//! - [`table`] - measurement table parsing
//! - [`results`] - transposed results block reconstruction
//! - [`derived`] - opt-in derived quantities (dry mass, coke content)

pub mod derived;
pub mod header;
pub mod results;
pub mod table;

#[cfg(test)]
pub mod tests;

pub use derived::{DerivedQuantities, apply_derived_quantities, water_content_wpct};
pub use header::TgHeader;
pub use results::parse_results;
pub use table::parse_measurement_table;

use crate::error::Result;
use crate::models::{InstrumentMetadata, MeasurementTable, ResultRecord};
use crate::normalize::read_export;
use std::path::Path;
use tracing::info;

/// Parse an ExpDat export's content into metadata and measurement table
pub fn parse_data_export(content: &str) -> Result<(InstrumentMetadata, MeasurementTable)> {
    let header = TgHeader::parse(content)?;
    let table = parse_measurement_table(content, header.blank_line)?;
    Ok((header.metadata, table))
}

/// Read and parse an ExpDat export
pub fn read_data_export(path: &Path) -> Result<(InstrumentMetadata, MeasurementTable)> {
    info!("Parsing TG data export: {}", path.display());
    let content = read_export(path)?;
    parse_data_export(&content).map_err(|e| e.in_file(path))
}

/// Read and parse an ExpRes export
pub fn read_results_export(path: &Path) -> Result<ResultRecord> {
    info!("Parsing TG results export: {}", path.display());
    let content = read_export(path)?;
    parse_results(&content).map_err(|e| e.in_file(path))
}
