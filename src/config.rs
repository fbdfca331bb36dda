//! Configuration management and validation.
//!
//! Settings come in layers: built-in defaults, then an optional TOML file,
//! then command-line overrides applied through the `with_*` builders.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_FIT_PARAMS_KEYWORD, DEFAULT_TG_DATA_KEYWORD,
    DEFAULT_TG_RESULTS_KEYWORD, DEFAULT_XRD_CALCULATED_KEYWORD, DEFAULT_XRD_EXPERIMENTAL_KEYWORD,
};
use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Ingestion settings shared by the TG and XRD pipelines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Name fragment of the TG measurement export
    pub tg_data_keyword: String,

    /// Name fragment of the TG results export
    pub tg_results_keyword: String,

    /// Name fragment of the XRD refinement parameter table
    pub fit_params_keyword: String,

    /// Name fragment of the measured XRD pattern
    pub xrd_experimental_keyword: String,

    /// Name fragment of the calculated XRD pattern
    pub xrd_calculated_keyword: String,

    /// Add dry mass and coke content to TG results
    pub compute_coke: bool,

    /// XRD sample was dried and sealed before measurement
    pub dry_and_sealed: bool,

    /// XRD drying temperature in °C
    pub drying_temp: i64,

    /// Keep going after a folder fails
    pub continue_on_error: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            tg_data_keyword: DEFAULT_TG_DATA_KEYWORD.to_string(),
            tg_results_keyword: DEFAULT_TG_RESULTS_KEYWORD.to_string(),
            fit_params_keyword: DEFAULT_FIT_PARAMS_KEYWORD.to_string(),
            xrd_experimental_keyword: DEFAULT_XRD_EXPERIMENTAL_KEYWORD.to_string(),
            xrd_calculated_keyword: DEFAULT_XRD_CALCULATED_KEYWORD.to_string(),
            compute_coke: false,
            dry_and_sealed: false,
            drying_temp: 0,
            continue_on_error: true,
        }
    }
}

impl IngestConfig {
    /// Load configuration from an explicit file, the user config file, or defaults
    ///
    /// An explicit path must exist. The user config file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|path| path.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            IngestError::io(format!("Failed to read config file {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| {
            IngestError::configuration(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Reject settings the pipelines cannot work with
    pub fn validate(&self) -> Result<()> {
        let keywords = [
            ("tg_data_keyword", &self.tg_data_keyword),
            ("tg_results_keyword", &self.tg_results_keyword),
            ("fit_params_keyword", &self.fit_params_keyword),
            ("xrd_experimental_keyword", &self.xrd_experimental_keyword),
            ("xrd_calculated_keyword", &self.xrd_calculated_keyword),
        ];

        for (name, keyword) in keywords {
            if keyword.trim().is_empty() {
                return Err(IngestError::configuration(format!("{} must not be empty", name)));
            }
        }

        Ok(())
    }

    pub fn with_compute_coke(mut self, compute_coke: bool) -> Self {
        self.compute_coke = compute_coke;
        self
    }

    pub fn with_dry_and_sealed(mut self, dry_and_sealed: bool) -> Self {
        self.dry_and_sealed = dry_and_sealed;
        self
    }

    pub fn with_drying_temp(mut self, drying_temp: i64) -> Self {
        self.drying_temp = drying_temp;
        self
    }

    /// Stop the batch at the first failing folder
    pub fn with_fail_fast(mut self) -> Self {
        self.continue_on_error = false;
        self
    }
}

/// `<config dir>/tgxrd-ingest/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.tg_data_keyword, "ExpDat");
        assert_eq!(config.tg_results_keyword, "ExpRes");
        assert_eq!(config.fit_params_keyword, "fitparams.txt");
        assert!(!config.compute_coke);
        assert!(config.continue_on_error);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "compute_coke = true").unwrap();
        writeln!(file, "drying_temp = 120").unwrap();

        let config = IngestConfig::load(Some(file.path())).unwrap();
        assert!(config.compute_coke);
        assert_eq!(config.drying_temp, 120);
        assert_eq!(config.xrd_calculated_keyword, "calc.xy");
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "tg_data_keyword = \"\"").unwrap();

        let error = IngestConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(error, IngestError::Configuration { .. }));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "compute_coke = maybe").unwrap();

        let error = IngestConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(error, IngestError::Configuration { .. }));
    }

    #[test]
    fn test_builders() {
        let config = IngestConfig::default()
            .with_compute_coke(true)
            .with_dry_and_sealed(true)
            .with_drying_temp(200)
            .with_fail_fast();

        assert!(config.compute_coke);
        assert!(config.dry_and_sealed);
        assert_eq!(config.drying_temp, 200);
        assert!(!config.continue_on_error);
    }
}
