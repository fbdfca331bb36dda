//! Parent entity resolution
//!
//! A measurement attaches to exactly one parent: a reactor sample (matched
//! on layer code), a zeolite or an extrudate (both matched on material id).
//! All three lookups are performed, then an ordered decision table picks the
//! first match. Reactor samples win over zeolites, zeolites over extrudates.

use crate::error::{IngestError, Result};
use crate::models::{ParentKind, ParentLink};
use crate::repository::Repository;
use tracing::debug;

/// Results of the three independent parent lookups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupOutcome {
    pub reactor_sample: Option<String>,
    pub zeolite: Option<String>,
    pub extrudate: Option<String>,
}

/// A decision rule: which lookup it reads, and the link it produces
pub type ResolutionRule = (fn(&LookupOutcome) -> Option<&str>, fn(String) -> ParentLink);

fn reactor_sample_match(outcome: &LookupOutcome) -> Option<&str> {
    outcome.reactor_sample.as_deref()
}

fn zeolite_match(outcome: &LookupOutcome) -> Option<&str> {
    outcome.zeolite.as_deref()
}

fn extrudate_match(outcome: &LookupOutcome) -> Option<&str> {
    outcome.extrudate.as_deref()
}

/// Parent priority, highest first
pub const RESOLUTION_ORDER: [ResolutionRule; 3] = [
    (reactor_sample_match, ParentLink::ReactorSample),
    (zeolite_match, ParentLink::Zeolite),
    (extrudate_match, ParentLink::Extrudate),
];

impl LookupOutcome {
    /// Query the repository for every parent kind
    pub fn lookup<R: Repository + ?Sized>(
        repository: &R,
        material: &str,
        layer_code: &str,
    ) -> Result<Self> {
        Ok(Self {
            reactor_sample: repository.lookup(ParentKind::ReactorSample, layer_code)?,
            zeolite: repository.lookup(ParentKind::Zeolite, material)?,
            extrudate: repository.lookup(ParentKind::Extrudate, material)?,
        })
    }

    /// First matching rule in priority order
    pub fn decide(&self) -> Option<ParentLink> {
        RESOLUTION_ORDER
            .iter()
            .find_map(|(matched, link)| matched(self).map(|id| link(id.to_string())))
    }
}

/// Resolve the single parent of a record
pub fn resolve_parent<R: Repository + ?Sized>(
    repository: &R,
    material: &str,
    layer_code: &str,
) -> Result<ParentLink> {
    let outcome = LookupOutcome::lookup(repository, material, layer_code)?;
    debug!(
        "Parent lookups for {} / {}: {:?}",
        material, layer_code, outcome
    );

    outcome
        .decide()
        .ok_or_else(|| IngestError::entity_resolution(material, layer_code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    fn outcome(reactor: bool, zeolite: bool, extrudate: bool) -> LookupOutcome {
        LookupOutcome {
            reactor_sample: reactor.then(|| "MFI20_RS03_L2".to_string()),
            zeolite: zeolite.then(|| "MFI20".to_string()),
            extrudate: extrudate.then(|| "MFI20".to_string()),
        }
    }

    #[test]
    fn test_decision_table_covers_every_combination() {
        let cases = [
            ((true, true, true), Some(ParentKind::ReactorSample)),
            ((true, false, true), Some(ParentKind::ReactorSample)),
            ((true, false, false), Some(ParentKind::ReactorSample)),
            ((false, true, true), Some(ParentKind::Zeolite)),
            ((false, true, false), Some(ParentKind::Zeolite)),
            ((false, false, true), Some(ParentKind::Extrudate)),
            ((false, false, false), None),
        ];

        for ((reactor, zeolite, extrudate), expected) in cases {
            let decided = outcome(reactor, zeolite, extrudate).decide();
            assert_eq!(
                decided.as_ref().map(ParentLink::kind),
                expected,
                "case {:?}",
                (reactor, zeolite, extrudate)
            );
        }
    }

    #[test]
    fn test_zeolite_beats_extrudate() {
        let repository = InMemoryRepository::new()
            .with_parent(ParentKind::Zeolite, "MFI20")
            .with_parent(ParentKind::Extrudate, "MFI20");

        let link = resolve_parent(&repository, "MFI20", "MFI20_RS03_L2").unwrap();
        assert_eq!(link, ParentLink::Zeolite("MFI20".to_string()));
    }

    #[test]
    fn test_reactor_sample_wins_regardless_of_material() {
        let repository = InMemoryRepository::new()
            .with_parent(ParentKind::ReactorSample, "MFI20_RS03_L2")
            .with_parent(ParentKind::Zeolite, "MFI20")
            .with_parent(ParentKind::Extrudate, "MFI20");

        let link = resolve_parent(&repository, "MFI20", "MFI20_RS03_L2").unwrap();
        assert_eq!(link, ParentLink::ReactorSample("MFI20_RS03_L2".to_string()));
    }

    #[test]
    fn test_no_parent_is_resolution_error() {
        let repository = InMemoryRepository::new().with_parent(ParentKind::Zeolite, "FAU15");

        let error = resolve_parent(&repository, "MFI20", "MFI20_RS03_L2").unwrap_err();
        match error {
            IngestError::EntityResolution {
                material,
                layer_code,
            } => {
                assert_eq!(material, "MFI20");
                assert_eq!(layer_code, "MFI20_RS03_L2");
            }
            other => panic!("Expected EntityResolution error, got {:?}", other),
        }
    }
}
