//! Core data structures for TG and XRD ingestion.
//!
//! Defines the normalized records produced by the parsers, the parent link
//! chosen by the resolver, the analysis records handed to persistence and
//! the run statistics reported by the processor.

use crate::constants::{
    CURVE_CALCULATED_LABEL, CURVE_EXPERIMENTAL_LABEL, CURVE_X_LABEL, DATE_KEY, SAMPLE_MASS_KEY,
};
use crate::error::{IngestError, Result};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A single normalized cell: number, text or missing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Null,
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Text rendering used when a column is exported as strings
    fn to_text(&self) -> Option<String> {
        match self {
            Scalar::Number(value) => Some(value.to_string()),
            Scalar::Text(text) => Some(text.clone()),
            Scalar::Null => None,
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// Normalized TG header metadata
///
/// Holds the allowlisted fields under lower-cased keys and every
/// temperature-program segment in a nested map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstrumentMetadata {
    #[serde(flatten)]
    pub fields: BTreeMap<String, Scalar>,
    pub segments: BTreeMap<String, Scalar>,
}

impl InstrumentMetadata {
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.fields.get(key)
    }

    /// Numeric field, failing when the key is absent or not a number
    pub fn number(&self, key: &str) -> Result<f64> {
        match self.fields.get(key) {
            Some(Scalar::Number(value)) => Ok(*value),
            _ => Err(IngestError::lookup_missing(key, "instrument metadata")),
        }
    }

    pub fn sample_mass(&self) -> Result<f64> {
        self.number(SAMPLE_MASS_KEY)
    }

    /// Normalized measurement date (`YYYY.MM.DD`)
    pub fn date(&self) -> Result<&str> {
        self.fields
            .get(DATE_KEY)
            .and_then(Scalar::as_str)
            .ok_or_else(|| IngestError::lookup_missing(DATE_KEY, "instrument metadata"))
    }
}

/// TG measurement table in row order with normalized column names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementTable {
    columns: Vec<String>,
    data: Vec<Vec<Scalar>>,
}

impl MeasurementTable {
    /// Build a table; every row must have one cell per column
    pub fn new(columns: Vec<String>, data: Vec<Vec<Scalar>>) -> Result<Self> {
        if let Some((index, row)) = data
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(IngestError::format(format!(
                "Measurement row {} has {} cells, expected {}",
                index + 1,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, data })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Scalar>] {
        &self.data
    }

    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Cells of one column in row order
    pub fn column(&self, name: &str) -> Option<Vec<&Scalar>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.data.iter().map(|row| &row[index]).collect())
    }

    /// Column-oriented view for columnar interchange
    ///
    /// Columns whose cells are all numbers or nulls become `Float64`, the
    /// rest become `String`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut frame_columns = Vec::with_capacity(self.columns.len());

        for (index, name) in self.columns.iter().enumerate() {
            let numeric = self
                .data
                .iter()
                .all(|row| matches!(row[index], Scalar::Number(_) | Scalar::Null));

            let series = if numeric {
                let values: Vec<Option<f64>> =
                    self.data.iter().map(|row| row[index].as_f64()).collect();
                Series::new(name.as_str().into(), values)
            } else {
                let values: Vec<Option<String>> =
                    self.data.iter().map(|row| row[index].to_text()).collect();
                Series::new(name.as_str().into(), values)
            };
            frame_columns.push(series.into_column());
        }

        Ok(DataFrame::new(frame_columns)?)
    }
}

/// One derived TG quantity: row label to value, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    pub key: String,
    pub values: Vec<(String, Scalar)>,
}

impl ResultEntry {
    pub fn new(key: impl Into<String>, values: Vec<(String, Scalar)>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    pub fn value(&self, label: &str) -> Option<&Scalar> {
        self.values
            .iter()
            .find(|(row, _)| row == label)
            .map(|(_, value)| value)
    }
}

/// TG results keyed by quantity, preserving the exporter's column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRecord {
    entries: Vec<ResultEntry>,
}

impl ResultRecord {
    pub fn new(entries: Vec<ResultEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&ResultEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Insert an entry, replacing any entry with the same key in place
    pub fn insert(&mut self, entry: ResultEntry) {
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Numeric value of `key`/`label`; a null cell counts as missing
    pub fn number(&self, key: &str, label: &str) -> Result<f64> {
        let entry = self
            .get(key)
            .ok_or_else(|| IngestError::lookup_missing(key, "TG results"))?;

        match entry.value(label) {
            Some(Scalar::Number(value)) => Ok(*value),
            _ => Err(IngestError::lookup_missing(
                format!("{}.{}", key, label),
                "TG results",
            )),
        }
    }
}

impl Serialize for ResultRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key, &OrderedPairs(&entry.values))?;
        }
        map.end()
    }
}

/// Serializes `(label, value)` pairs as a map without reordering
struct OrderedPairs<'a>(&'a [(String, Scalar)]);

impl Serialize for OrderedPairs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Which diffraction pattern a curve holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// Measured pattern; its file starts with a header line
    Experimental,
    /// Refined pattern; its file has no header
    Calculated,
}

impl CurveKind {
    pub fn y_label(self) -> &'static str {
        match self {
            CurveKind::Experimental => CURVE_EXPERIMENTAL_LABEL,
            CurveKind::Calculated => CURVE_CALCULATED_LABEL,
        }
    }

    pub fn has_header(self) -> bool {
        matches!(self, CurveKind::Experimental)
    }
}

/// One diffraction pattern as paired X/Y sequences
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    kind: CurveKind,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Curve {
    pub fn from_points(kind: CurveKind, points: Vec<(f64, f64)>) -> Self {
        let (x, y) = points.into_iter().unzip();
        Self { kind, x, y }
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

impl Serialize for Curve {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(CURVE_X_LABEL, &self.x)?;
        map.serialize_entry(self.kind.y_label(), &self.y)?;
        map.end()
    }
}

/// Refinement parameters from the first data row of a fit table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitParameters {
    params: Vec<(String, Scalar)>,
}

impl FitParameters {
    pub fn new(params: Vec<(String, Scalar)>) -> Self {
        Self { params }
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl Serialize for FitParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        OrderedPairs(&self.params).serialize(serializer)
    }
}

/// Sample identity encoded positionally in an XRD file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleIdentity {
    pub material: String,
    pub reactor_sample: String,
    pub layer_code: String,
    pub description: String,
}

/// Kinds of parent entity a measurement can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    ReactorSample,
    Zeolite,
    Extrudate,
}

impl ParentKind {
    pub const ALL: [ParentKind; 3] = [
        ParentKind::ReactorSample,
        ParentKind::Zeolite,
        ParentKind::Extrudate,
    ];

    /// Record column holding a reference to this kind of parent
    pub fn id_column(self) -> &'static str {
        match self {
            ParentKind::ReactorSample => "reactor_sample_id",
            ParentKind::Zeolite => "zeolite_id",
            ParentKind::Extrudate => "extrudate_id",
        }
    }
}

impl fmt::Display for ParentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParentKind::ReactorSample => "reactor_sample",
            ParentKind::Zeolite => "zeolite",
            ParentKind::Extrudate => "extrudate",
        };
        f.write_str(name)
    }
}

/// The single parent entity a measurement record attaches to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentLink {
    ReactorSample(String),
    Zeolite(String),
    Extrudate(String),
}

impl ParentLink {
    pub fn kind(&self) -> ParentKind {
        match self {
            ParentLink::ReactorSample(_) => ParentKind::ReactorSample,
            ParentLink::Zeolite(_) => ParentKind::Zeolite,
            ParentLink::Extrudate(_) => ParentKind::Extrudate,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ParentLink::ReactorSample(id) | ParentLink::Zeolite(id) | ParentLink::Extrudate(id) => {
                id
            }
        }
    }
}

/// Serialized as all three id columns, exactly one of them non-null
impl Serialize for ParentLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ParentKind::ALL.len()))?;
        for kind in ParentKind::ALL {
            let id = (kind == self.kind()).then(|| self.id());
            map.serialize_entry(kind.id_column(), &id)?;
        }
        map.end()
    }
}

/// Normalized TG/DSC analysis ready for persistence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TgAnalysis {
    pub water_content_wpct: f64,
    pub meta: InstrumentMetadata,
    pub results: ResultRecord,
    pub data_loc: String,
    pub data: MeasurementTable,
    pub creation_date: String,
    #[serde(flatten)]
    pub parent: ParentLink,
}

/// Normalized ex-situ XRD refinement ready for persistence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XrdAnalysis {
    pub dry_and_sealed: u8,
    pub drying_temp: i64,
    pub creation_date: String,
    pub data_loc: String,
    pub ref_res: FitParameters,
    pub ref_xrd: Curve,
    pub xrd: Curve,
    #[serde(flatten)]
    pub parent: ParentLink,
}

/// Any record crossing the persistence boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum AnalysisRecord {
    Tg(TgAnalysis),
    Xrd(XrdAnalysis),
}

impl AnalysisRecord {
    pub fn parent(&self) -> &ParentLink {
        match self {
            AnalysisRecord::Tg(record) => &record.parent,
            AnalysisRecord::Xrd(record) => &record.parent,
        }
    }

    pub fn data_loc(&self) -> &str {
        match self {
            AnalysisRecord::Tg(record) => &record.data_loc,
            AnalysisRecord::Xrd(record) => &record.data_loc,
        }
    }
}

/// Instrument family of a run folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instrument {
    Tg,
    Xrd,
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instrument::Tg => f.write_str("TG"),
            Instrument::Xrd => f.write_str("XRD"),
        }
    }
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub folders_processed: usize,
    pub folders_failed: usize,
    pub records_persisted: usize,
    pub failures: Vec<(PathBuf, String)>,
    pub processing_time: Duration,
}

impl ProcessingStats {
    pub fn total_folders(&self) -> usize {
        self.folders_processed + self.folders_failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parent_link_serializes_all_columns() {
        let link = ParentLink::Zeolite("MFI20".to_string());
        let value = serde_json::to_value(&link).unwrap();
        assert_eq!(
            value,
            json!({"reactor_sample_id": null, "zeolite_id": "MFI20", "extrudate_id": null})
        );
    }

    #[test]
    fn test_result_record_keeps_order_and_nulls() {
        let record = ResultRecord::new(vec![
            ResultEntry::new(
                "Peak_DSC",
                vec![
                    ("Result".to_string(), Scalar::Number(101.5)),
                    ("Y_value".to_string(), Scalar::Null),
                ],
            ),
            ResultEntry::new(
                "Mass_H2O",
                vec![("Result".to_string(), Scalar::Number(-2.34))],
            ),
        ]);

        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(
            text,
            r#"{"Peak_DSC":{"Result":101.5,"Y_value":null},"Mass_H2O":{"Result":-2.34}}"#
        );
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["Peak_DSC", "Mass_H2O"]);
    }

    #[test]
    fn test_result_record_insert_replaces() {
        let mut record = ResultRecord::default();
        record.insert(ResultEntry::new("A", vec![("Result".to_string(), 1.0.into())]));
        record.insert(ResultEntry::new("A", vec![("Result".to_string(), 2.0.into())]));
        assert_eq!(record.len(), 1);
        assert_eq!(record.number("A", "Result").unwrap(), 2.0);
        assert!(matches!(
            record.number("B", "Result"),
            Err(IngestError::LookupMissing { .. })
        ));
    }

    #[test]
    fn test_curve_serialization() {
        let curve = Curve::from_points(CurveKind::Calculated, vec![(5.0, 10.0), (5.02, 11.5)]);
        let value = serde_json::to_value(&curve).unwrap();
        assert_eq!(value, json!({"X": [5.0, 5.02], "Ycalc": [10.0, 11.5]}));
    }

    #[test]
    fn test_metadata_serializes_flat_with_segments() {
        let mut metadata = InstrumentMetadata::default();
        metadata.fields.insert("sample mass".to_string(), Scalar::Number(50.0));
        metadata.fields.insert("date".to_string(), "2021.03.15".into());
        metadata
            .segments
            .insert("seg. 1".to_string(), "30°C/10.0(K/min)/900°C".into());

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["sample mass"], json!(50.0));
        assert_eq!(value["date"], json!("2021.03.15"));
        assert_eq!(value["segments"]["seg. 1"], json!("30°C/10.0(K/min)/900°C"));
        assert_eq!(metadata.date().unwrap(), "2021.03.15");
    }

    #[test]
    fn test_measurement_table_rejects_ragged_rows() {
        let result = MeasurementTable::new(
            vec!["Temp".to_string(), "Mass".to_string()],
            vec![vec![Scalar::Number(30.0)]],
        );
        assert!(matches!(result, Err(IngestError::Format { .. })));
    }

    #[test]
    fn test_measurement_table_to_frame() {
        let table = MeasurementTable::new(
            vec!["Temp".to_string(), "Label".to_string()],
            vec![
                vec![Scalar::Number(30.0), "a".into()],
                vec![Scalar::Null, "b".into()],
            ],
        )
        .unwrap();

        let frame = table.to_frame().unwrap();
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.width(), 2);
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["Temp", "Label"]);
    }
}
