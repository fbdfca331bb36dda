//! TG/XRD Ingest Library
//!
//! A Rust library for turning laboratory instrument exports into normalized
//! analysis records.
//!
//! This library provides tools for:
//! - Parsing NETZSCH-style TG/DSC exports: metadata header, measurement table
//!   and the transposed results block
//! - Deriving dry sample mass, coke content and water content from TG results
//! - Parsing XRD refinement outputs: measured and calculated patterns plus the
//!   refined parameter table
//! - Decoding sample identity from folder and file names
//! - Resolving each measurement to exactly one parent entity
//! - Persisting records per folder through a pluggable repository

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod normalize;
pub mod processor;
pub mod repository;
pub mod resolver;
pub mod tg;
pub mod xrd;

// Re-export commonly used types
pub use config::IngestConfig;
pub use error::{IngestError, Result};
pub use models::{
    AnalysisRecord, Curve, CurveKind, FitParameters, Instrument, InstrumentMetadata,
    MeasurementTable, ParentKind, ParentLink, ProcessingStats, ResultEntry, ResultRecord, Scalar,
    SampleIdentity, TgAnalysis, XrdAnalysis,
};
pub use processor::IngestProcessor;
pub use repository::{InMemoryRepository, JsonLinesRepository, ParentCatalog, Repository};
pub use resolver::resolve_parent;
