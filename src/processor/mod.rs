//! Ingestion engine.
//!
//! Walks run folders one at a time: build the folder's record, then persist
//! it through a per-folder [`Session`]. A failing folder never leaves partial
//! records behind, and by default the batch carries on with the next folder.

pub mod discovery;
pub mod pipeline;

#[cfg(test)]
pub mod tests;

pub use discovery::{discover_run_folders, locate_input};
pub use pipeline::{build_tg_record, build_xrd_record};

use crate::config::IngestConfig;
use crate::error::Result;
use crate::models::{AnalysisRecord, Instrument, ProcessingStats};
use crate::repository::{Repository, Session};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Drives folder ingestion against a repository
pub struct IngestProcessor<R: Repository> {
    config: IngestConfig,
    repository: R,
    progress: ProgressBar,
}

impl<R: Repository> IngestProcessor<R> {
    pub fn new(config: IngestConfig, repository: R) -> Self {
        Self {
            config,
            repository,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report per-folder progress on the given bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    /// Ingest one run folder, returning the number of records persisted
    pub fn ingest_folder(&mut self, instrument: Instrument, folder: &Path) -> Result<usize> {
        info!("Ingesting {} folder: {}", instrument, folder.display());

        let mut session = Session::begin(&mut self.repository);
        let record = match instrument {
            Instrument::Tg => AnalysisRecord::Tg(build_tg_record(
                &self.config,
                session.repository(),
                folder,
            )?),
            Instrument::Xrd => AnalysisRecord::Xrd(build_xrd_record(
                &self.config,
                session.repository(),
                folder,
            )?),
        };
        session.add(record);
        session.commit()
    }

    /// Ingest a list of run folders
    ///
    /// Failures are collected into the returned statistics unless the
    /// configuration asks to stop at the first one.
    pub fn process(&mut self, instrument: Instrument, folders: &[PathBuf]) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        let mut stats = ProcessingStats::default();

        self.progress.set_length(folders.len() as u64);

        for folder in folders {
            let name = folder
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            self.progress.set_message(name);

            match self.ingest_folder(instrument, folder) {
                Ok(persisted) => {
                    stats.folders_processed += 1;
                    stats.records_persisted += persisted;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", folder.display(), e);
                    if !self.config.continue_on_error {
                        self.progress.abandon();
                        return Err(e);
                    }
                    stats.folders_failed += 1;
                    stats.failures.push((folder.clone(), e.to_string()));
                }
            }

            self.progress.inc(1);
        }

        self.progress.finish_and_clear();
        stats.processing_time = start_time.elapsed();

        info!(
            "{} ingestion finished: {} processed, {} failed",
            instrument, stats.folders_processed, stats.folders_failed
        );
        Ok(stats)
    }
}
