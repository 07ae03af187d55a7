//! Exporter stage: frequency table into an in-memory XLSX artifact.

use chrono::NaiveDateTime;
use leadpivot_io_xlsx::{C_MIME_XLSX, SpecXlsxWriteOptions, XlsxWriter};
use tracing::{debug, warn};

use crate::reshape::FrequencyTable;
use crate::spec::{ExportArtifact, PipelineError, SpecPivotOptions};

/// `<prefix>_<timestamp>.xlsx` with `captured_at` rendered by `timestamp_format`.
pub fn derive_artifact_file_name(
    prefix: &str,
    captured_at: &NaiveDateTime,
    timestamp_format: &str,
) -> String {
    format!("{prefix}_{}.xlsx", captured_at.format(timestamp_format))
}

/// Render `table` as one styled sheet and return the finished workbook bytes.
///
/// Returns the artifact together with the writer's non-fatal warnings.
pub fn export_frequency_table(
    table: &FrequencyTable,
    captured_at: &NaiveDateTime,
    options: &SpecPivotOptions,
) -> Result<(ExportArtifact, Vec<String>), PipelineError> {
    let df = table.to_dataframe(&options.col_agent)?;

    let mut writer = XlsxWriter::new(
        options.fmt_cell.clone(),
        options.fmt_header.clone(),
        SpecXlsxWriteOptions {
            width_cell: options.width_cell,
        },
    );
    writer
        .write_sheet_from_dataframe(&df, &options.sheet_name)
        .map_err(PipelineError::Unexpected)?;
    let v_bytes = writer.finish().map_err(PipelineError::Unexpected)?;

    let l_warnings: Vec<String> = writer
        .report()
        .map(|report| report.warnings.clone())
        .unwrap_or_default();
    for c_warning in &l_warnings {
        warn!(warning = %c_warning, "xlsx writer warning");
    }

    let artifact = ExportArtifact {
        file_name: derive_artifact_file_name(
            &options.file_name_prefix,
            captured_at,
            &options.timestamp_format,
        ),
        mime_type: C_MIME_XLSX,
        bytes: v_bytes,
    };
    debug!(
        file_name = %artifact.file_name,
        bytes = artifact.bytes.len(),
        "exported frequency table"
    );
    Ok((artifact, l_warnings))
}
