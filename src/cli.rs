//! Command-line interface components.

use crate::config::IngestConfig;
use crate::constants::DEFAULT_OUTPUT_FILE;
use crate::models::{Instrument, ProcessingStats};
use crate::processor::{IngestProcessor, discover_run_folders};
use crate::repository::{InMemoryRepository, JsonLinesRepository, ParentCatalog};
use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "tgxrd-ingest")]
#[command(about = "Ingest TG/DSC exports and XRD refinement outputs into normalized records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ingest TG/DSC run folders (ExpDat + ExpRes exports)
    Tg {
        #[command(flatten)]
        common: CommonArgs,

        /// Add dry sample mass and coke content to the results
        #[arg(long)]
        coke: bool,
    },

    /// Ingest XRD refinement folders (fit parameters + two patterns)
    Xrd {
        #[command(flatten)]
        common: CommonArgs,

        /// Sample was dried and sealed before measurement
        #[arg(long)]
        dry_and_sealed: bool,

        /// Drying temperature in °C
        #[arg(long, value_name = "CELSIUS", allow_negative_numbers = true)]
        drying_temp: Option<i64>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct CommonArgs {
    /// Run folder, or a directory of run folders with --all (`.` always means all)
    #[arg(value_name = "PATH")]
    pub input: PathBuf,

    /// Process every immediate sub-folder of PATH
    #[arg(long)]
    pub all: bool,

    /// CSV catalog of known parents (columns: kind,id)
    #[arg(long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// JSON Lines file receiving the records
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Parse and resolve without writing any record
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first failing folder
    #[arg(long)]
    pub fail_fast: bool,

    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn common(&self) -> &CommonArgs {
        match &self.command {
            Command::Tg { common, .. } | Command::Xrd { common, .. } => common,
        }
    }

    pub fn instrument(&self) -> Instrument {
        match self.command {
            Command::Tg { .. } => Instrument::Tg,
            Command::Xrd { .. } => Instrument::Xrd,
        }
    }

    /// Layer command-line flags over the loaded configuration
    pub fn apply_overrides(&self, mut config: IngestConfig) -> IngestConfig {
        match &self.command {
            Command::Tg { coke, .. } => {
                if *coke {
                    config = config.with_compute_coke(true);
                }
            }
            Command::Xrd {
                dry_and_sealed,
                drying_temp,
                ..
            } => {
                if *dry_and_sealed {
                    config = config.with_dry_and_sealed(true);
                }
                if let Some(temp) = drying_temp {
                    config = config.with_drying_temp(*temp);
                }
            }
        }

        if self.common().fail_fast {
            config = config.with_fail_fast();
        }
        config
    }
}

impl CommonArgs {
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Install the stderr tracing subscriber
pub fn setup_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tgxrd_ingest={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .context("Failed to initialize logging")
}

fn create_progress_bar(len: usize, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Run the selected ingestion command
pub fn run(args: Args) -> Result<ProcessingStats> {
    let common = args.common();
    setup_logging(common.log_level())?;
    debug!("Command line arguments: {:?}", args);

    let config = IngestConfig::load(common.config.as_deref())?;
    let config = args.apply_overrides(config);
    config.validate()?;

    let instrument = args.instrument();
    let folders = discover_run_folders(&common.input, common.all)?;
    if folders.is_empty() {
        warn!("No run folders found in {}", common.input.display());
    }

    let catalog = ParentCatalog::load_csv(&common.catalog)
        .with_context(|| format!("Failed to load parent catalog {}", common.catalog.display()))?;

    if !common.quiet {
        println!(
            "{}",
            format!("Starting {} ingestion", instrument).bright_green().bold()
        );
        println!("  {} {}", "Input:".bright_cyan(), common.input.display());
        println!("  {} {}", "Folders:".bright_cyan(), folders.len());
        if common.dry_run {
            println!("  {} {}", "Output:".bright_cyan(), "dry run".bright_yellow());
        } else {
            println!("  {} {}", "Output:".bright_cyan(), common.output.display());
        }
    }

    let progress = create_progress_bar(folders.len(), common.quiet)?;

    let stats = if common.dry_run {
        let repository = InMemoryRepository::with_catalog(catalog);
        IngestProcessor::new(config, repository)
            .with_progress(progress)
            .process(instrument, &folders)?
    } else {
        let repository = JsonLinesRepository::new(catalog, &common.output);
        IngestProcessor::new(config, repository)
            .with_progress(progress)
            .process(instrument, &folders)?
    };

    info!(
        "Finished in {:.2}s",
        stats.processing_time.as_secs_f64()
    );

    if !common.quiet {
        print_summary(&stats);
    }
    Ok(stats)
}

/// Colored end-of-run report
pub fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Ingestion summary".bright_green().bold());
    println!(
        "  {} {}",
        "Processed:".bright_cyan(),
        stats.folders_processed.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Records:".bright_cyan(),
        stats.records_persisted.to_string().bright_white().bold()
    );

    let failed = stats.folders_failed.to_string();
    let failed = if stats.folders_failed > 0 {
        failed.bright_red().bold()
    } else {
        failed.bright_white().bold()
    };
    println!("  {} {}", "Failed:".bright_cyan(), failed);

    for (folder, message) in &stats.failures {
        println!("    {} {}", folder.display().to_string().bright_yellow(), message);
    }

    println!(
        "  {} {:.2}s",
        "Time:".bright_cyan(),
        stats.processing_time.as_secs_f64()
    );
}
