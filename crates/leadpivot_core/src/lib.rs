//! `leadpivot_core` v1:
//! Per-agent lead status pivot, from CSV upload to XLSX artifact.
//!
//! - `load`     : ISO-8859-1 CSV into a raw table, required-column check
//! - `reshape`  : status expansion and frequency table
//! - `export`   : styled workbook artifact
//! - `pipeline` : stage composition
//! - `conf`     : constants and default presets
//! - `spec`     : options/records/errors
//! - `report`   : run-time report model
//! - `util`     : shared helper functions

pub mod conf;
pub mod export;
pub mod load;
pub mod pipeline;
pub mod report;
pub mod reshape;
pub mod spec;
mod util;

pub use export::{derive_artifact_file_name, export_frequency_table};
pub use load::{RawTable, load_raw_table, validate_required_columns};
pub use pipeline::{PipelineOutcome, run_pipeline};
pub use report::ReportPivot;
pub use reshape::{FrequencyTable, build_frequency_table, expand_records, expand_row};
pub use spec::{
    EnumPipelineErrorKind, ExpandedRecord, ExportArtifact, PipelineError, SpecPivotOptions,
    SpecTablePreview,
};
