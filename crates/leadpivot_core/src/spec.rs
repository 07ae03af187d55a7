//! Pivot specification models and top-level error types.

use leadpivot_io_xlsx::SpecCellFormat;
use thiserror::Error;

use crate::conf::{C_HINT_PARSE, C_HINT_SCHEMA, C_HINT_UNEXPECTED, derive_default_pivot_options};

////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Input options for [`crate::pipeline::run_pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpecPivotOptions {
    /// Agent column; also the index header of the output sheet.
    pub col_agent: String,
    /// Status column.
    pub col_status: String,
    /// Separator between statuses inside one cell.
    pub status_separator: char,
    /// Output worksheet name.
    pub sheet_name: String,
    /// Output file name stem.
    pub file_name_prefix: String,
    /// `chrono` format of the file name timestamp.
    pub timestamp_format: String,
    /// Number of raw rows kept for preview.
    pub n_rows_preview: usize,
    /// Fixed width of every output column.
    pub width_cell: f64,
    /// Body cell format.
    pub fmt_cell: SpecCellFormat,
    /// Header row format.
    pub fmt_header: SpecCellFormat,
}

impl Default for SpecPivotOptions {
    fn default() -> Self {
        derive_default_pivot_options()
    }
}

impl SpecPivotOptions {
    /// Columns the loaded table must contain, in reporting order.
    pub fn required_columns(&self) -> [&str; 2] {
        [self.col_agent.as_str(), self.col_status.as_str()]
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Records

/// One `(agent, status)` pair produced by row expansion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpandedRecord {
    /// Trimmed agent name.
    pub agent_name: String,
    /// One trimmed status token (possibly empty).
    pub status: String,
}

impl ExpandedRecord {
    pub fn new(agent_name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            status: status.into(),
        }
    }
}

/// First rows of a loaded table, as text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecTablePreview {
    /// Column names in file order.
    pub columns: Vec<String>,
    /// Row-major cells; `None` marks an empty field.
    pub rows: Vec<Vec<Option<String>>>,
}

/// Generated spreadsheet ready for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Download file name.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime_type: &'static str,
    /// Complete XLSX payload.
    pub bytes: Vec<u8>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Failure category of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumPipelineErrorKind {
    /// Required column(s) absent.
    Schema,
    /// Input could not be read as tabular text.
    Parse,
    /// Anything else during reshaping or export.
    Unexpected,
}

impl EnumPipelineErrorKind {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnumPipelineErrorKind::Schema => "schema",
            EnumPipelineErrorKind::Parse => "parse",
            EnumPipelineErrorKind::Unexpected => "unexpected",
        }
    }
}

/// Top-level error for the load/reshape/export pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Failed to parse input: {0}")]
    Parse(String),

    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl PipelineError {
    pub fn kind(&self) -> EnumPipelineErrorKind {
        match self {
            PipelineError::Schema { .. } => EnumPipelineErrorKind::Schema,
            PipelineError::Parse(_) => EnumPipelineErrorKind::Parse,
            PipelineError::Unexpected(_) => EnumPipelineErrorKind::Unexpected,
        }
    }

    /// User-facing hint matching the failure category.
    pub fn hint(&self) -> &'static str {
        match self.kind() {
            EnumPipelineErrorKind::Schema => C_HINT_SCHEMA,
            EnumPipelineErrorKind::Parse => C_HINT_PARSE,
            EnumPipelineErrorKind::Unexpected => C_HINT_UNEXPECTED,
        }
    }

    /// Missing column names for schema failures, empty otherwise.
    pub fn missing_columns(&self) -> &[String] {
        match self {
            PipelineError::Schema { missing } => missing,
            _ => &[],
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_names_all_missing_columns() {
        let err = PipelineError::Schema {
            missing: vec!["agent_name".to_string(), "Lead_status".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required columns: agent_name, Lead_status"
        );
        assert_eq!(err.kind().as_str(), "schema");
        assert_eq!(err.missing_columns().len(), 2);
        assert_eq!(err.hint(), C_HINT_SCHEMA);
    }

    #[test]
    fn non_schema_errors_have_no_missing_columns() {
        let err = PipelineError::Parse("bad quote".to_string());
        assert!(err.missing_columns().is_empty());
        assert_eq!(err.hint(), C_HINT_PARSE);
        assert_eq!(
            PipelineError::Unexpected("x".to_string()).kind(),
            EnumPipelineErrorKind::Unexpected
        );
    }

    #[test]
    fn default_options_require_agent_then_status() {
        let options = SpecPivotOptions::default();
        assert_eq!(options.required_columns(), ["agent_name", "Lead_status"]);
        assert_eq!(options.status_separator, ';');
        assert_eq!(options.n_rows_preview, 5);
    }
}
