//! Derived TG quantities: dry sample mass, coke content and water content
//!
//! Water and residual mass are signed mass changes as exported (losses are
//! negative). The calculator is opt-in and only adds entries; the measured
//! results are left as they are.

use crate::constants::{
    DERIVED_DECIMALS, MASS_COKE_KEY, MASS_H2O_KEY, NOT_APPLICABLE, RESIDUAL_MASS_KEY, RESULT_ROW,
    SAMPLE_DRY_MASS_KEY, Y_VALUE_ROW,
};
use crate::error::Result;
use crate::models::{InstrumentMetadata, ResultEntry, ResultRecord, Scalar};
use crate::normalize::round_to;
use tracing::debug;

/// Quantities derived from a TG run, rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedQuantities {
    pub dry_mass: f64,
    pub coke_content: f64,
}

impl DerivedQuantities {
    /// Compute from sample mass, water mass change and residual mass change
    pub fn compute(sample_mass: f64, water_content: f64, residual_mass: f64) -> Self {
        Self {
            dry_mass: round_to(sample_mass + water_content, DERIVED_DECIMALS),
            coke_content: round_to(-residual_mass + water_content, DERIVED_DECIMALS),
        }
    }

    /// Look up the inputs in parsed TG records
    pub fn from_records(metadata: &InstrumentMetadata, results: &ResultRecord) -> Result<Self> {
        let sample_mass = metadata.sample_mass()?;
        let water_content = results.number(MASS_H2O_KEY, RESULT_ROW)?;
        let residual_mass = results.number(RESIDUAL_MASS_KEY, Y_VALUE_ROW)?;
        Ok(Self::compute(sample_mass, water_content, residual_mass))
    }
}

/// Add `Mass_Coke` and `Sample_Dry_Mass` entries to the results
pub fn apply_derived_quantities(
    metadata: &InstrumentMetadata,
    results: &mut ResultRecord,
) -> Result<DerivedQuantities> {
    let derived = DerivedQuantities::from_records(metadata, results)?;
    debug!(
        "Derived dry mass {} and coke content {}",
        derived.dry_mass, derived.coke_content
    );

    results.insert(derived_entry(MASS_COKE_KEY, derived.coke_content));
    results.insert(derived_entry(SAMPLE_DRY_MASS_KEY, derived.dry_mass));
    Ok(derived)
}

fn derived_entry(key: &str, value: f64) -> ResultEntry {
    ResultEntry::new(
        key,
        vec![
            (RESULT_ROW.to_string(), Scalar::Number(value)),
            (Y_VALUE_ROW.to_string(), Scalar::Text(NOT_APPLICABLE.to_string())),
        ],
    )
}

/// Water content as a percentage of the initial sample mass
pub fn water_content_wpct(metadata: &InstrumentMetadata, results: &ResultRecord) -> Result<f64> {
    let sample_mass = metadata.sample_mass()?;
    let water_content = results.number(MASS_H2O_KEY, RESULT_ROW)?;
    Ok(round_to(-100.0 * water_content / sample_mass, DERIVED_DECIMALS))
}
