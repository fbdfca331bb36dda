//! Fixture folders for processor tests


use crate::tg::tests::{sample_data_export, sample_results_export};
use std::fs;
use std::path::{Path, PathBuf};

/// Refinement parameter table with a title line
pub fn sample_fit_params() -> &'static str {
    "Rietveld refinement\nRwp\tGOF\ta\tb\tc\tphase\n7.81\t1.42\t20.09\t19.88\t13.37\tMFI\n"
}

/// Measured pattern with its header line
pub fn sample_experimental_curve() -> &'static str {
    "'Id: averaged scan\n5.00 120.5\n5.02 118.25\n5.04 121.0\n"
}

/// Calculated pattern without header
pub fn sample_calculated_curve() -> &'static str {
    "5.00 119.0\n5.02 118.9\n5.04 120.2\n"
}

/// TG run folder named after its layer code
pub fn create_tg_folder(root: &Path, layer_code: &str) -> PathBuf {
    let folder = root.join(layer_code);
    fs::create_dir_all(&folder).unwrap();
    fs::write(
        folder.join(format!("{}_ExpDat.csv", layer_code)),
        sample_data_export(),
    )
    .unwrap();
    fs::write(
        folder.join(format!("{}_ExpRes.csv", layer_code)),
        sample_results_export(),
    )
    .unwrap();
    folder
}

/// XRD refinement folder whose pattern files encode `layer_code`
pub fn create_xrd_folder(root: &Path, folder_name: &str, layer_code: &str) -> PathBuf {
    let folder = root.join(folder_name);
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join("fitparams.txt"), sample_fit_params()).unwrap();
    fs::write(
        folder.join(format!("{}_spent-avg.xy", layer_code)),
        sample_experimental_curve(),
    )
    .unwrap();
    fs::write(
        folder.join(format!("{}_spent-calc.xy", layer_code)),
        sample_calculated_curve(),
    )
    .unwrap();
    folder
}
