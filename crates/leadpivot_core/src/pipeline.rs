//! Load → reshape → export composition for one uploaded file.

use chrono::NaiveDateTime;
use tracing::info;

use crate::export::export_frequency_table;
use crate::load::load_raw_table;
use crate::report::ReportPivot;
use crate::reshape::{FrequencyTable, build_frequency_table, expand_records};
use crate::spec::{ExportArtifact, PipelineError, SpecPivotOptions, SpecTablePreview};

/// Everything one successful run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// First raw rows of the upload.
    pub preview: SpecTablePreview,
    /// Agent × status counts.
    pub table: FrequencyTable,
    /// Downloadable workbook.
    pub artifact: ExportArtifact,
    /// Run counters.
    pub report: ReportPivot,
}

/// Run the full pipeline over uploaded bytes.
///
/// Any stage failure aborts the run; no artifact exists unless every stage
/// succeeded.
pub fn run_pipeline(
    v_bytes: &[u8],
    captured_at: &NaiveDateTime,
    options: &SpecPivotOptions,
) -> Result<PipelineOutcome, PipelineError> {
    let raw = load_raw_table(v_bytes, options)?;
    let preview = raw.head(options.n_rows_preview)?;

    let l_records = expand_records(&raw, options)?;
    let table = build_frequency_table(&l_records);

    let (artifact, warnings) = export_frequency_table(&table, captured_at, options)?;

    let report = ReportPivot {
        cnt_rows_loaded: raw.height() as u64,
        cnt_records_expanded: l_records.len() as u64,
        cnt_agents: table.agents().len() as u64,
        cnt_statuses: table.statuses().len() as u64,
        warnings,
    };
    info!(file_name = %artifact.file_name, "{report}");

    Ok(PipelineOutcome {
        preview,
        table,
        artifact,
        report,
    })
}
