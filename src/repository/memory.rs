//! In-memory repository used for dry runs and tests

use super::{ParentCatalog, Repository};
use crate::error::Result;
use crate::models::{AnalysisRecord, ParentKind};

/// Repository that keeps persisted records in a vector
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    catalog: ParentCatalog,
    records: Vec<AnalysisRecord>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: ParentCatalog) -> Self {
        Self {
            catalog,
            records: Vec::new(),
        }
    }

    /// Register a known parent
    pub fn with_parent(mut self, kind: ParentKind, id: &str) -> Self {
        self.catalog.insert(kind, id);
        self
    }

    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<AnalysisRecord> {
        self.records
    }
}

impl Repository for InMemoryRepository {
    fn lookup(&self, kind: ParentKind, id: &str) -> Result<Option<String>> {
        Ok(self.catalog.lookup(kind, id))
    }

    fn persist(&mut self, record: &AnalysisRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Curve, CurveKind, FitParameters, ParentLink, XrdAnalysis};

    pub(crate) fn sample_record() -> AnalysisRecord {
        AnalysisRecord::Xrd(XrdAnalysis {
            dry_and_sealed: 0,
            drying_temp: 0,
            creation_date: "2026.01.05".to_string(),
            data_loc: "/data/xrd/MFI20_RS03_L2".to_string(),
            ref_res: FitParameters::new(vec![("Rwp".to_string(), 7.81.into())]),
            ref_xrd: Curve::from_points(CurveKind::Calculated, vec![(5.0, 10.0)]),
            xrd: Curve::from_points(CurveKind::Experimental, vec![(5.0, 11.0)]),
            parent: ParentLink::Zeolite("MFI20".to_string()),
        })
    }

    #[test]
    fn test_lookup_only_matches_registered_kind() {
        let repository = InMemoryRepository::new().with_parent(ParentKind::Zeolite, "MFI20");

        assert_eq!(
            repository.lookup(ParentKind::Zeolite, "MFI20").unwrap(),
            Some("MFI20".to_string())
        );
        assert_eq!(repository.lookup(ParentKind::Extrudate, "MFI20").unwrap(), None);
    }

    #[test]
    fn test_persist_keeps_records() {
        let mut repository = InMemoryRepository::new();
        repository.persist(&sample_record()).unwrap();
        assert_eq!(repository.records().len(), 1);
        assert_eq!(repository.records()[0].data_loc(), "/data/xrd/MFI20_RS03_L2");
    }
}
