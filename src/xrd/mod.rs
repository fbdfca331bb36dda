//! XRD refinement output parsing
//!
//! A refinement run folder holds the experimental pattern, the calculated
//! pattern and a table of refined parameters. The sample identity is encoded
//! in the experimental pattern's file name.

pub mod curve;
pub mod filename;
pub mod fit_params;

pub use curve::{parse_curve, read_curve};
pub use filename::parse_sample_identity;
pub use fit_params::{parse_fit_parameters, read_fit_parameters};
