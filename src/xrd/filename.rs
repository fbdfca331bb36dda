//! Sample identity decoding from XRD file names
//!
//! Refinement files are named `<material>_<reactor sample>_<layer>_<description>`.
//! The reactor layer code is the first three fields joined back together.

use crate::constants::{FILENAME_SEGMENTS, FILENAME_SEPARATOR};
use crate::error::{IngestError, Result};
use crate::models::SampleIdentity;

/// Decode the sample identity from a file name
pub fn parse_sample_identity(file_name: &str) -> Result<SampleIdentity> {
    let segments: Vec<&str> = file_name.split(FILENAME_SEPARATOR).collect();

    let [material, reactor_sample, layer, description] = segments.as_slice() else {
        return Err(IngestError::format(format!(
            "File name '{}' has {} '{}'-separated fields, expected {}",
            file_name,
            segments.len(),
            FILENAME_SEPARATOR,
            FILENAME_SEGMENTS
        )));
    };

    let layer_code = [*material, *reactor_sample, *layer].join(&FILENAME_SEPARATOR.to_string());

    Ok(SampleIdentity {
        material: material.to_string(),
        reactor_sample: reactor_sample.to_string(),
        layer_code,
        description: description.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_segment_name() {
        let identity = parse_sample_identity("MFI20_RS03_L2_calcined").unwrap();
        assert_eq!(
            identity,
            SampleIdentity {
                material: "MFI20".to_string(),
                reactor_sample: "RS03".to_string(),
                layer_code: "MFI20_RS03_L2".to_string(),
                description: "calcined".to_string(),
            }
        );
    }

    #[test]
    fn test_description_keeps_file_suffix() {
        let identity = parse_sample_identity("MFI20_RS03_L2_spent-avg.xy").unwrap();
        assert_eq!(identity.description, "spent-avg.xy");
        assert_eq!(identity.layer_code, "MFI20_RS03_L2");
    }

    #[test]
    fn test_wrong_segment_counts_fail() {
        for name in ["MFI20_RS03_L2", "MFI20_RS03_L2_calcined_extra", "MFI20"] {
            let error = parse_sample_identity(name).unwrap_err();
            assert!(
                matches!(error, IngestError::Format { .. }),
                "{} should be rejected",
                name
            );
        }
    }
}
