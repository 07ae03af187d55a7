//! Loader stage: ISO-8859-1 CSV bytes into a raw string table.

use csv::{ReaderBuilder, Trim};
use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::conf::N_CSV_DELIMITER;
use crate::spec::{PipelineError, SpecPivotOptions, SpecTablePreview};
use crate::util::{decode_latin1, derive_unique_header_names, is_blank_record};

/// Loaded CSV content; every column is a nullable string column.
#[derive(Debug, Clone)]
pub struct RawTable {
    df: DataFrame,
}

impl RawTable {
    pub fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    /// Column names in file order.
    pub fn columns(&self) -> Vec<String> {
        self.df
            .get_column_names_str()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Number of data rows.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Iterate one column as text; `None` marks an empty field.
    pub fn iter_column(
        &self,
        name: &str,
    ) -> Result<impl Iterator<Item = Option<&str>> + '_, PipelineError> {
        let col = self.df.column(name).map_err(|_| PipelineError::Schema {
            missing: vec![name.to_string()],
        })?;
        let ca = col
            .as_materialized_series()
            .str()
            .map_err(|err| PipelineError::Unexpected(format!("Column {name:?}: {err}")))?;
        Ok(ca.into_iter())
    }

    /// First `n_rows` rows as text, for display.
    pub fn head(&self, n_rows: usize) -> Result<SpecTablePreview, PipelineError> {
        let l_columns = self.columns();
        let n_height = usize::min(n_rows, self.height());

        let mut l_rows: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(l_columns.len()); n_height];
        for c_name in &l_columns {
            for (row, value) in l_rows.iter_mut().zip(self.iter_column(c_name)?) {
                row.push(value.map(str::to_string));
            }
        }

        Ok(SpecTablePreview {
            columns: l_columns,
            rows: l_rows,
        })
    }
}

/// Check that every required column is present; report all missing ones.
pub fn validate_required_columns(
    columns: &[String],
    required: &[&str],
) -> Result<(), PipelineError> {
    let l_missing: Vec<String> = required
        .iter()
        .filter(|c_required| !columns.iter().any(|c_name| c_name == *c_required))
        .map(|c_required| c_required.to_string())
        .collect();

    if l_missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::Schema { missing: l_missing })
    }
}

/// Parse uploaded bytes into a [`RawTable`] and validate the required columns.
///
/// Bytes are read as ISO-8859-1 and tokenized as comma-delimited CSV whose
/// first non-blank line is the header. Blank lines are skipped, short rows
/// are padded with empty fields, and rows longer than the header fail.
pub fn load_raw_table(
    v_bytes: &[u8],
    options: &SpecPivotOptions,
) -> Result<RawTable, PipelineError> {
    let c_text = decode_latin1(v_bytes);
    let c_text = c_text.trim_start_matches(['\r', '\n']);

    let mut reader = ReaderBuilder::new()
        .delimiter(N_CSV_DELIMITER)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(c_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| PipelineError::Parse(format!("Failed to read CSV header: {err}")))?
        .clone();
    if is_blank_record(&headers) {
        return Err(PipelineError::Parse(
            "No columns to parse from file".to_string(),
        ));
    }

    let l_colnames = derive_unique_header_names(headers.iter());
    validate_required_columns(&l_colnames, &options.required_columns())?;

    let n_width = l_colnames.len();
    let mut l_values_by_col: Vec<Vec<Option<String>>> = vec![Vec::new(); n_width];

    for result in reader.records() {
        let record = result
            .map_err(|err| PipelineError::Parse(format!("Failed to parse CSV row: {err}")))?;
        if is_blank_record(&record) {
            continue;
        }
        if record.len() > n_width {
            let n_line = record.position().map_or(0, |pos| pos.line());
            return Err(PipelineError::Parse(format!(
                "Error tokenizing data. Expected {n_width} fields in line {n_line}, saw {}",
                record.len()
            )));
        }

        for (n_idx_col, l_values) in l_values_by_col.iter_mut().enumerate() {
            let value = record
                .get(n_idx_col)
                .filter(|val| !val.is_empty())
                .map(str::to_string);
            l_values.push(value);
        }
    }

    let l_cols: Vec<Column> = l_colnames
        .iter()
        .zip(l_values_by_col)
        .map(|(c_name, l_values)| Column::new(c_name.as_str().into(), l_values))
        .collect();
    let df = DataFrame::new(l_cols)
        .map_err(|err| PipelineError::Unexpected(format!("Failed to build table: {err}")))?;

    debug!(rows = df.height(), columns = df.width(), "loaded raw table");
    Ok(RawTable::from_dataframe(df))
}
