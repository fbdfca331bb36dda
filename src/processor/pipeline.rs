//! Per-folder record builders
//!
//! Each builder locates the folder's exports, parses them, resolves the
//! parent entity and assembles the record. Nothing is persisted here.

use super::discovery::{data_location, locate_input, path_name};
use crate::config::IngestConfig;
use crate::constants::{CREATION_DATE_FORMAT, FOLDER_MATERIAL_SEPARATOR};
use crate::error::Result;
use crate::models::{CurveKind, TgAnalysis, XrdAnalysis};
use crate::repository::Repository;
use crate::resolver::resolve_parent;
use crate::tg::{self, apply_derived_quantities, water_content_wpct};
use crate::xrd::{parse_sample_identity, read_curve, read_fit_parameters};
use chrono::Local;
use std::path::Path;
use tracing::info;

/// Build the TG analysis record of one run folder
///
/// The folder name is the layer code; its part before the first `_` is the
/// material id.
pub fn build_tg_record<R: Repository + ?Sized>(
    config: &IngestConfig,
    repository: &R,
    folder: &Path,
) -> Result<TgAnalysis> {
    let layer_code = path_name(folder)?;
    let material = layer_code
        .split(FOLDER_MATERIAL_SEPARATOR)
        .next()
        .unwrap_or(layer_code);

    let data_path = locate_input(folder, &config.tg_data_keyword)?;
    let results_path = locate_input(folder, &config.tg_results_keyword)?;

    let (meta, data) = tg::read_data_export(&data_path)?;
    let mut results = tg::read_results_export(&results_path)?;

    if config.compute_coke {
        apply_derived_quantities(&meta, &mut results)?;
    }

    let water_content_wpct = water_content_wpct(&meta, &results)?;
    let parent = resolve_parent(repository, material, layer_code)?;
    info!("Resolved {} to {} {}", layer_code, parent.kind(), parent.id());

    Ok(TgAnalysis {
        water_content_wpct,
        creation_date: meta.date()?.to_string(),
        meta,
        results,
        data_loc: data_location(folder)?,
        data,
        parent,
    })
}

/// Build the XRD analysis record of one refinement folder
///
/// The sample identity comes from the experimental pattern's file name.
pub fn build_xrd_record<R: Repository + ?Sized>(
    config: &IngestConfig,
    repository: &R,
    folder: &Path,
) -> Result<XrdAnalysis> {
    let params_path = locate_input(folder, &config.fit_params_keyword)?;
    let experimental_path = locate_input(folder, &config.xrd_experimental_keyword)?;
    let calculated_path = locate_input(folder, &config.xrd_calculated_keyword)?;

    let ref_res = read_fit_parameters(&params_path)?;
    let xrd = read_curve(&experimental_path, CurveKind::Experimental)?;
    let ref_xrd = read_curve(&calculated_path, CurveKind::Calculated)?;

    let file_name = path_name(&experimental_path)?;
    let identity = parse_sample_identity(file_name).map_err(|e| e.in_file(&experimental_path))?;
    let parent = resolve_parent(repository, &identity.material, &identity.layer_code)?;
    info!(
        "Resolved {} to {} {}",
        identity.layer_code,
        parent.kind(),
        parent.id()
    );

    Ok(XrdAnalysis {
        dry_and_sealed: u8::from(config.dry_and_sealed),
        drying_temp: config.drying_temp,
        creation_date: Local::now().format(CREATION_DATE_FORMAT).to_string(),
        data_loc: data_location(folder)?,
        ref_res,
        ref_xrd,
        xrd,
        parent,
    })
}
