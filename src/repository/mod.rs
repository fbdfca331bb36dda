//! Persistence adapter contract and parent catalog
//!
//! The ingestion core never talks to a database directly. It asks a
//! [`Repository`] whether a parent entity exists and hands it finished
//! records. Each folder's records go through a [`Session`], so nothing from
//! a folder is persisted unless the whole folder parsed and resolved.

pub mod json_lines;
pub mod memory;

pub use json_lines::JsonLinesRepository;
pub use memory::InMemoryRepository;

use crate::error::{IngestError, Result};
use crate::models::{AnalysisRecord, ParentKind};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Storage collaborator used by the ingestion pipeline
pub trait Repository {
    /// Reference to the parent of `kind` with identifier `id`, if it exists
    fn lookup(&self, kind: ParentKind, id: &str) -> Result<Option<String>>;

    /// Store one record atomically
    fn persist(&mut self, record: &AnalysisRecord) -> Result<()>;
}

/// Per-folder unit of work over a repository
///
/// Records added to a session are only handed to the repository on
/// [`Session::commit`]; a dropped session discards them.
pub struct Session<'a, R: Repository + ?Sized> {
    repository: &'a mut R,
    pending: Vec<AnalysisRecord>,
}

impl<'a, R: Repository + ?Sized> Session<'a, R> {
    pub fn begin(repository: &'a mut R) -> Self {
        Self {
            repository,
            pending: Vec::new(),
        }
    }

    /// Read access for parent lookups
    pub fn repository(&self) -> &R {
        &*self.repository
    }

    pub fn add(&mut self, record: AnalysisRecord) {
        self.pending.push(record);
    }

    /// Persist every pending record, returning how many were stored
    pub fn commit(mut self) -> Result<usize> {
        let records: Vec<AnalysisRecord> = self.pending.drain(..).collect();
        for record in &records {
            self.repository.persist(record)?;
        }
        debug!("Committed {} records", records.len());
        Ok(records.len())
    }
}

impl<R: Repository + ?Sized> Drop for Session<'_, R> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            debug!("Discarding {} uncommitted records", self.pending.len());
        }
    }
}

/// Known parent entities indexed by kind
#[derive(Debug, Clone, Default)]
pub struct ParentCatalog {
    parents: HashMap<ParentKind, HashSet<String>>,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    kind: ParentKind,
    id: String,
}

impl ParentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ParentKind, id: impl Into<String>) -> bool {
        self.parents.entry(kind).or_default().insert(id.into())
    }

    pub fn contains(&self, kind: ParentKind, id: &str) -> bool {
        self.parents.get(&kind).is_some_and(|ids| ids.contains(id))
    }

    pub fn len(&self) -> usize {
        self.parents.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load a `kind,id` CSV catalog of known parents
    ///
    /// `kind` is one of `reactor_sample`, `zeolite` or `extrudate`.
    pub fn load_csv(path: &Path) -> Result<Self> {
        info!("Loading parent catalog: {}", path.display());

        let mut reader = csv::Reader::from_path(path).map_err(|e| IngestError::CsvParsing {
            file: path.display().to_string(),
            message: "Failed to open parent catalog".to_string(),
            source: Some(e),
        })?;

        let mut catalog = Self::new();
        for row in reader.deserialize::<CatalogRow>() {
            let row = row.map_err(|e| IngestError::from(e).in_file(path))?;
            let id = row.id.trim().to_string();
            if !catalog.insert(row.kind, id.clone()) {
                warn!("Duplicate {} '{}' in parent catalog, keeping one", row.kind, id);
            }
        }

        info!("Loaded {} parent entries", catalog.len());
        Ok(catalog)
    }

    /// Reference for `id` when it is a known parent of `kind`
    pub fn lookup(&self, kind: ParentKind, id: &str) -> Option<String> {
        self.contains(kind, id).then(|| id.to_string())
    }
}
