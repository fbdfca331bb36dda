//! Run folder discovery and input file location
//!
//! A run folder holds the exports of one measurement. Batch mode treats every
//! immediate sub-folder of the input directory as a run folder.

use crate::error::{IngestError, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Input argument that selects batch mode on its own
pub const BATCH_MARKER: &str = ".";

/// Run folders to ingest for an input path
///
/// Returns every immediate sub-folder (sorted by name) when `all` is set or
/// the input is `.`, otherwise the input folder itself.
pub fn discover_run_folders(input: &Path, all: bool) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Err(IngestError::FolderNotFound {
            path: input.to_path_buf(),
        });
    }

    if !(all || input == Path::new(BATCH_MARKER)) {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut folders = Vec::new();
    for entry in WalkDir::new(input)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            IngestError::io(
                format!("Failed to list {}", input.display()),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            )
        })?;
        if entry.file_type().is_dir() {
            folders.push(entry.into_path());
        }
    }

    debug!("Found {} run folders in {}", folders.len(), input.display());
    Ok(folders)
}

/// First file in `folder` whose name contains `keyword`, in name order
pub fn locate_input(folder: &Path, keyword: &str) -> Result<PathBuf> {
    let pattern = format!(
        "{}/*{}*",
        Pattern::escape(&folder.to_string_lossy()),
        Pattern::escape(keyword)
    );

    let entries = glob::glob(&pattern).map_err(|e| {
        IngestError::configuration(format!("Invalid file pattern '{}': {}", pattern, e))
    })?;

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    matches.sort();

    let found = matches
        .into_iter()
        .next()
        .ok_or_else(|| IngestError::MissingInputFile {
            folder: folder.to_path_buf(),
            keyword: keyword.to_string(),
        })?;

    debug!("Located '{}' input: {}", keyword, found.display());
    Ok(found)
}

/// Final path component as UTF-8
pub fn path_name(path: &Path) -> Result<&str> {
    let resolved = path.file_name().and_then(|name| name.to_str());
    resolved.ok_or_else(|| IngestError::format(format!("{} has no usable name", path.display())))
}

/// Absolute location of a run folder, recorded on every record
pub fn data_location(folder: &Path) -> Result<String> {
    let absolute = std::path::absolute(folder).map_err(|e| {
        IngestError::io(format!("Failed to resolve {}", folder.display()), e)
    })?;
    Ok(absolute.display().to_string())
}
