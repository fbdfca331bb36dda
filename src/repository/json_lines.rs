//! File-backed repository writing one JSON record per line

use super::{ParentCatalog, Repository};
use crate::error::{IngestError, Result};
use crate::models::{AnalysisRecord, ParentKind};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Appends records to a JSON Lines file and resolves parents from a catalog
#[derive(Debug)]
pub struct JsonLinesRepository {
    catalog: ParentCatalog,
    output: PathBuf,
}

impl JsonLinesRepository {
    pub fn new(catalog: ParentCatalog, output: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            output: output.into(),
        }
    }
}

impl Repository for JsonLinesRepository {
    fn lookup(&self, kind: ParentKind, id: &str) -> Result<Option<String>> {
        Ok(self.catalog.lookup(kind, id))
    }

    fn persist(&mut self, record: &AnalysisRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)
            .map_err(|e| IngestError::storage("Failed to serialize record", e))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output)
            .map_err(|e| {
                IngestError::storage(format!("Failed to open {}", self.output.display()), e)
            })?;

        // Single write so a record is never split across lines
        file.write_all(line.as_bytes()).map_err(|e| {
            IngestError::storage(format!("Failed to write {}", self.output.display()), e)
        })?;

        debug!(
            "Persisted record for {} into {}",
            record.data_loc(),
            self.output.display()
        );
        Ok(())
    }
}
