//! Error handling for TG and XRD ingestion.
//!
//! Every failure is fatal for the file or folder being ingested. Format
//! problems, missing upstream keys, unresolved parents and storage failures
//! are kept as distinct variants so callers can tell a malformed export from
//! a business-rule failure.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name used for format errors raised before the source file is known
const UNKNOWN_FILE: &str = "unknown";

#[derive(Error, Debug)]
pub enum IngestError {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A file does not match its expected shape
    #[error("Format error in file '{file}': {message}")]
    Format { file: String, message: String },

    /// A key required by a later step is absent from an upstream record
    #[error("Missing key '{key}' in {context}")]
    LookupMissing { key: String, context: String },

    /// No parent entity matches the record's identity
    #[error(
        "No parent entry (zeolite, extrudate, or reactor sample) found for material '{material}' / layer code '{layer_code}'"
    )]
    EntityResolution {
        material: String,
        layer_code: String,
    },

    /// Opaque failure from the persistence adapter
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Delimited text could not be read
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Record serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Column frame construction failed
    #[error("Frame conversion error: {0}")]
    Frame(#[from] polars::error::PolarsError),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Input folder does not exist
    #[error("Folder not found: {path}")]
    FolderNotFound { path: PathBuf },

    /// No file in the folder carries the expected name fragment
    #[error("No file containing '{keyword}' in folder {folder}")]
    MissingInputFile { folder: PathBuf, keyword: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a format error whose file is not yet known
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            file: UNKNOWN_FILE.to_string(),
            message: message.into(),
        }
    }

    /// Create a missing-key error
    pub fn lookup_missing(key: impl Into<String>, context: impl Into<String>) -> Self {
        Self::LookupMissing {
            key: key.into(),
            context: context.into(),
        }
    }

    /// Create an entity resolution error
    pub fn entity_resolution(material: impl Into<String>, layer_code: impl Into<String>) -> Self {
        Self::EntityResolution {
            material: material.into(),
            layer_code: layer_code.into(),
        }
    }

    /// Create a storage error with an underlying cause
    pub fn storage(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a storage error without an underlying cause
    pub fn storage_message(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Attach the source file to format and CSV errors raised by content-level parsers
    pub fn in_file(self, path: &Path) -> Self {
        let file = path.display().to_string();
        match self {
            Self::Format { message, .. } => Self::Format { file, message },
            Self::CsvParsing {
                message, source, ..
            } => Self::CsvParsing {
                file,
                message,
                source,
            },
            other => other,
        }
    }

    /// True for errors caused by a malformed input file
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. } | Self::CsvParsing { .. })
    }
}

impl From<std::io::Error> for IngestError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for IngestError {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: UNKNOWN_FILE.to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_file_retags_format_errors() {
        let error = IngestError::format("bad separator").in_file(Path::new("/data/run1/a.txt"));
        match error {
            IngestError::Format { file, message } => {
                assert_eq!(file, "/data/run1/a.txt");
                assert_eq!(message, "bad separator");
            }
            _ => panic!("Expected Format error"),
        }
    }

    #[test]
    fn test_in_file_leaves_other_errors_alone() {
        let error = IngestError::lookup_missing("Mass_H2O", "results").in_file(Path::new("x"));
        assert!(matches!(error, IngestError::LookupMissing { .. }));
        assert!(!error.is_format_error());
    }

    #[test]
    fn test_display_messages() {
        let error = IngestError::entity_resolution("MFI20", "MFI20_RS03_L2");
        let text = error.to_string();
        assert!(text.contains("MFI20"));
        assert!(text.contains("MFI20_RS03_L2"));

        let storage = IngestError::storage_message("commit failed");
        assert_eq!(storage.to_string(), "Storage error: commit failed");
    }
}
