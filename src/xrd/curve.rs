//! Two-column diffraction curve parsing

use crate::error::{IngestError, Result};
use crate::models::{Curve, CurveKind};
use crate::normalize::{parse_number, read_export};
use std::path::Path;
use tracing::{debug, info};

/// Parse whitespace-separated `X Y` lines into a curve
///
/// Experimental curves start with a header line that is skipped
/// unconditionally; calculated curves have none.
pub fn parse_curve(content: &str, kind: CurveKind) -> Result<Curve> {
    let skip = usize::from(kind.has_header());

    let points = content
        .lines()
        .enumerate()
        .skip(skip)
        .map(|(index, line)| parse_point(line, index + 1))
        .collect::<Result<Vec<_>>>()?;

    debug!("Parsed {:?} curve with {} points", kind, points.len());
    Ok(Curve::from_points(kind, points))
}

fn parse_point(line: &str, line_number: usize) -> Result<(f64, f64)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [x, y] = tokens.as_slice() else {
        return Err(IngestError::format(format!(
            "Curve line {} has {} values, expected 2: '{}'",
            line_number,
            tokens.len(),
            line
        )));
    };

    match (parse_number(x), parse_number(y)) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(IngestError::format(format!(
            "Curve line {} is not numeric: '{}'",
            line_number, line
        ))),
    }
}

/// Read and parse a curve file
pub fn read_curve(path: &Path, kind: CurveKind) -> Result<Curve> {
    info!("Parsing {:?} XRD curve: {}", kind, path.display());
    let content = read_export(path)?;
    parse_curve(&content, kind).map_err(|e| e.in_file(path))
}
