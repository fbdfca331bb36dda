//! Format constants for TG and XRD instrument exports
//!
//! The instrument layouts are fixed by the exporting software, so every
//! label set, rename and keyword lives here as a declarative table. Adapting
//! to a new export revision should only require editing this file.

// =============================================================================
// TG Header (ExpDat preamble)
// =============================================================================

/// Field separator between label and value in header lines
pub const HEADER_FIELD_SEPARATOR: char = ';';

/// Separator between the label text and its trailing colon
pub const HEADER_LABEL_SEPARATOR: char = ':';

/// Raw header labels kept in the metadata record
pub const HEADER_ALLOWLIST: &[&str] = &[
    "SAMPLE",
    "DATE/TIME",
    "TEMPCAL",
    "SENSITIVITY",
    "SAMPLE MASS /mg",
    "SAMPLE CRUCIBLE MASS /mg",
];

/// Marker identifying temperature program segment keys
pub const SEGMENT_MARKER: &str = "SEG.";

/// Label carrying the measurement timestamp
pub const DATE_LABEL: &str = "DATE/TIME";

/// Legacy key names for unit-bearing header labels
///
/// The exporter appends units after a slash (`SAMPLE MASS /mg`). Historic
/// records store these under the prefix with its trailing character removed;
/// the date label keeps its prefix unchanged.
pub const LEGACY_KEY_NAMES: &[(&str, &str)] = &[
    ("DATE/TIME", "DATE"),
    ("SAMPLE MASS /mg", "SAMPLE MASS"),
    ("SAMPLE CRUCIBLE MASS /mg", "SAMPLE CRUCIBLE MASS"),
];

/// Lower-cased metadata key holding the normalized date
pub const DATE_KEY: &str = "date";

/// Lower-cased metadata key holding the sample mass in mg
pub const SAMPLE_MASS_KEY: &str = "sample mass";

/// Lower-cased metadata key holding the crucible mass in mg
pub const CRUCIBLE_MASS_KEY: &str = "sample crucible mass";

/// Metadata keys coerced to numbers
pub const NUMERIC_METADATA_KEYS: &[&str] = &[CRUCIBLE_MASS_KEY, SAMPLE_MASS_KEY];

/// Key of the nested segment map in serialized metadata
pub const SEGMENTS_KEY: &str = "segments";

// =============================================================================
// TG Measurement Table (ExpDat body)
// =============================================================================

/// Column separator of the measurement table
pub const TABLE_DELIMITER: u8 = b';';

/// Separator between a column name and its unit suffix
pub const UNIT_SEPARATOR: char = '/';

/// Characters stripped from the front of the first column name (`##`)
pub const FIRST_COLUMN_LEADING_STRIP: usize = 2;

/// Characters stripped from the end of the first and last column names
pub const EDGE_COLUMN_TRAILING_STRIP: usize = 1;

// =============================================================================
// TG Results (ExpRes)
// =============================================================================

/// Characters stripped from the front of each result line's key field
pub const RESULT_KEY_LEADING_STRIP: usize = 2;

/// Bookkeeping rows dropped from the reconstructed result table
pub const RESULT_BOOKKEEPING_ROWS: &[&str] = &[
    "File",
    "Segment",
    "Unit",
    "Range_Xmin",
    "Range_Xmax",
    "Range_Ymin",
    "Range_Ymax",
];

/// Ordinal position of a result column, counted from either end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPosition {
    FromStart(usize),
    FromEnd(usize),
}

impl ColumnPosition {
    /// Resolve to a zero-based index for a table with `len` columns
    pub fn index(self, len: usize) -> Option<usize> {
        match self {
            ColumnPosition::FromStart(offset) => (offset < len).then_some(offset),
            ColumnPosition::FromEnd(offset) => len.checked_sub(offset + 1),
        }
    }
}

/// Result keys assigned by position; the exported labels are not reliable
pub const RESULT_COLUMN_RENAMES: &[(ColumnPosition, &str)] = &[
    (ColumnPosition::FromStart(0), PEAK_DSC_KEY),
    (ColumnPosition::FromStart(1), MASS_H2O_KEY),
    (ColumnPosition::FromEnd(1), RESIDUAL_MASS_KEY),
    (ColumnPosition::FromEnd(0), PEAK_DTG_KEY),
];

pub const PEAK_DSC_KEY: &str = "Peak_DSC";
pub const MASS_H2O_KEY: &str = "Mass_H2O";
pub const RESIDUAL_MASS_KEY: &str = "Residual_Mass";
pub const PEAK_DTG_KEY: &str = "Peak_DTG";
pub const MASS_COKE_KEY: &str = "Mass_Coke";
pub const SAMPLE_DRY_MASS_KEY: &str = "Sample_Dry_Mass";

/// Row label of the primary result value
pub const RESULT_ROW: &str = "Result";

/// Row label of the y-axis value at the result position
pub const Y_VALUE_ROW: &str = "Y_value";

/// Placeholder for values a result entry does not carry
pub const NOT_APPLICABLE: &str = "-";

// =============================================================================
// XRD
// =============================================================================

/// Separator of the positional fields in XRD file names
pub const FILENAME_SEPARATOR: char = '_';

/// Number of positional fields in an XRD file name
pub const FILENAME_SEGMENTS: usize = 4;

/// Column separator of the refinement parameter table
pub const FIT_PARAMS_DELIMITER: u8 = b'\t';

/// Series labels of the diffraction curves
pub const CURVE_X_LABEL: &str = "X";
pub const CURVE_EXPERIMENTAL_LABEL: &str = "Yexp";
pub const CURVE_CALCULATED_LABEL: &str = "Ycalc";

// =============================================================================
// Input discovery defaults
// =============================================================================

pub const DEFAULT_TG_DATA_KEYWORD: &str = "ExpDat";
pub const DEFAULT_TG_RESULTS_KEYWORD: &str = "ExpRes";
pub const DEFAULT_FIT_PARAMS_KEYWORD: &str = "fitparams.txt";
pub const DEFAULT_XRD_EXPERIMENTAL_KEYWORD: &str = "avg.xy";
pub const DEFAULT_XRD_CALCULATED_KEYWORD: &str = "calc.xy";

/// Separator between material id and the rest of a TG folder name
pub const FOLDER_MATERIAL_SEPARATOR: char = '_';

/// Date format of ingestion-stamped records
pub const CREATION_DATE_FORMAT: &str = "%Y.%m.%d";

/// Application directory under the user config dir
pub const CONFIG_DIR_NAME: &str = "tgxrd-ingest";

/// Config file name inside the application directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default JSON Lines file receiving persisted records
pub const DEFAULT_OUTPUT_FILE: &str = "tgxrd-records.jsonl";

/// Decimal places kept for derived quantities
pub const DERIVED_DECIMALS: i32 = 2;
