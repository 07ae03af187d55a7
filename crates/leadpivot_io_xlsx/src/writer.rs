//! XLSX writer kernel that renders one DataFrame into an in-memory workbook.

use polars::prelude::{AnyValue, DataFrame};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::spec::{
    EnumCellValue, SpecCellFormat, SpecSheetExtent, SpecXlsxReport, SpecXlsxWriteOptions,
};
use crate::util::{
    cast_col_num, cast_row_num, sanitize_sheet_name, validate_sheet_extent,
    validate_unique_columns,
};

/// Stateful single-sheet workbook writer.
///
/// The sheet is buffered in memory; [`Self::finish`] serializes the workbook
/// and returns the bytes. Nothing touches the filesystem.
pub struct XlsxWriter {
    workbook: Workbook,
    fmt_cell: SpecCellFormat,
    fmt_header: SpecCellFormat,
    write_options: SpecXlsxWriteOptions,
    report: Option<SpecXlsxReport>,
    v_buffer: Option<Vec<u8>>,
}

impl XlsxWriter {
    /// Create writer with body/header format presets and write options.
    pub fn new(
        fmt_cell: SpecCellFormat,
        fmt_header: SpecCellFormat,
        write_options: SpecXlsxWriteOptions,
    ) -> Self {
        Self {
            workbook: Workbook::new(),
            fmt_cell,
            fmt_header,
            write_options,
            report: None,
            v_buffer: None,
        }
    }

    /// Report of the written sheet, if any.
    pub fn report(&self) -> Option<&SpecXlsxReport> {
        self.report.as_ref()
    }

    /// Serialize workbook to bytes. Idempotent.
    pub fn finish(&mut self) -> Result<Vec<u8>, String> {
        if let Some(v_buffer) = &self.v_buffer {
            return Ok(v_buffer.clone());
        }
        if self.report.is_none() {
            return Err("Cannot finish a workbook without a sheet.".to_string());
        }
        let v_buffer = self
            .workbook
            .save_to_buffer()
            .map_err(derive_xlsx_error_text)?;
        self.v_buffer = Some(v_buffer.clone());
        Ok(v_buffer)
    }

    /// Write the workbook's sheet from an in-memory dataframe.
    ///
    /// Row 0 holds the column names in header format; every body cell gets
    /// the body format and every column the configured fixed width.
    pub fn write_sheet_from_dataframe(
        &mut self,
        df_data: &DataFrame,
        sheet_name: &str,
    ) -> Result<(), String> {
        if self.v_buffer.is_some() {
            return Err("Cannot write after finish().".to_string());
        }
        if self.report.is_some() {
            return Err("Workbook already holds its sheet.".to_string());
        }

        let l_colnames_df: Vec<String> = df_data
            .get_column_names_str()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        validate_unique_columns(&l_colnames_df)?;

        let n_width_df = l_colnames_df.len();
        let n_height_df = df_data.height();
        let n_rows_header = 1usize;
        validate_sheet_extent(n_height_df, n_width_df, n_rows_header)?;

        let sheet_name_sanitized = sanitize_sheet_name(sheet_name, "_");
        let mut report = SpecXlsxReport {
            sheet: SpecSheetExtent {
                sheet_name: sheet_name_sanitized.clone(),
                height_header: n_rows_header,
                height_body: n_height_df,
                width: n_width_df,
            },
            warnings: Vec::new(),
        };
        if sheet_name_sanitized != sheet_name {
            report.warn(format!(
                "Sheet name {sheet_name:?} sanitized to {sheet_name_sanitized:?}."
            ));
        }

        let fmt_header = derive_rust_xlsx_format(&self.fmt_header);
        let fmt_body = derive_rust_xlsx_format(&self.fmt_cell);

        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(&sheet_name_sanitized)
            .map_err(derive_xlsx_error_text)?;

        write_header(worksheet, &l_colnames_df, &fmt_header)?;

        for (n_idx_col, col) in df_data.get_columns().iter().enumerate() {
            for n_row_local in 0..n_height_df {
                let value = derive_cell_value_from_any_value(
                    col.get(n_row_local)
                        .map_err(|err| format!("Failed to access cell value: {err}"))?,
                )?;
                write_cell_with_format(
                    worksheet,
                    n_rows_header + n_row_local,
                    n_idx_col,
                    &value,
                    &fmt_body,
                )?;
            }
        }

        for n_idx_col in 0..n_width_df {
            worksheet
                .set_column_width(cast_col_num(n_idx_col)?, self.write_options.width_cell)
                .map_err(derive_xlsx_error_text)?;
        }

        self.report = Some(report);
        Ok(())
    }
}

fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> Result<EnumCellValue, String> {
    match value {
        AnyValue::String(val) => Ok(EnumCellValue::String(val.to_string())),
        AnyValue::StringOwned(val) => Ok(EnumCellValue::String(val.to_string())),
        AnyValue::UInt64(val) => Ok(EnumCellValue::Number(val as f64)),
        AnyValue::Int64(val) => Ok(EnumCellValue::Number(val as f64)),
        AnyValue::Float64(val) => Ok(EnumCellValue::Number(val)),
        other => Err(format!("Unsupported cell value: {other:?}")),
    }
}

fn write_header(
    worksheet: &mut Worksheet,
    header_row: &[String],
    fmt_header: &Format,
) -> Result<(), String> {
    for (col_idx, cell_value) in header_row.iter().enumerate() {
        if cell_value.is_empty() {
            worksheet
                .write_blank(0, cast_col_num(col_idx)?, fmt_header)
                .map_err(derive_xlsx_error_text)?;
        } else {
            worksheet
                .write_string_with_format(0, cast_col_num(col_idx)?, cell_value, fmt_header)
                .map_err(derive_xlsx_error_text)?;
        }
    }
    Ok(())
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), String> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::String(val) => worksheet
            .write_string_with_format(n_row, n_col, val, format)
            .map_err(derive_xlsx_error_text)?,
        EnumCellValue::Number(val) => worksheet
            .write_number_with_format(n_row, n_col, *val, format)
            .map_err(derive_xlsx_error_text)?,
    };
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        5 => FormatBorder::Thick,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    match align.trim().to_ascii_lowercase().as_str() {
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        _ => None,
    }
}

fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
    use polars::prelude::{Column, DataFrame};

    use super::*;
    use crate::conf::{EnumFmtKey, select_default_xlsx_format};

    fn create_writer() -> XlsxWriter {
        XlsxWriter::new(
            select_default_xlsx_format(EnumFmtKey::Cell),
            select_default_xlsx_format(EnumFmtKey::Header),
            SpecXlsxWriteOptions::default(),
        )
    }

    fn create_df() -> DataFrame {
        DataFrame::new(vec![
            Column::new("agent_name".into(), vec!["Ana".to_string(), "Ivo".to_string()]),
            Column::new("Closed".into(), vec![1u64, 1]),
            Column::new("New".into(), vec![2u64, 0]),
        ])
        .expect("dataframe")
    }

    #[test]
    fn write_sheet_reads_back_with_header_and_numbers() {
        let mut writer = create_writer();
        writer
            .write_sheet_from_dataframe(&create_df(), "Statistika")
            .expect("write sheet");
        let v_bytes = writer.finish().expect("finish");

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(v_bytes)).expect("open");
        let range = workbook.worksheet_range("Statistika").expect("sheet");
        let l_rows: Vec<Vec<Data>> = range.rows().map(|row| row.to_vec()).collect();

        assert_eq!(l_rows.len(), 3);
        assert_eq!(
            l_rows[0],
            vec![
                Data::String("agent_name".to_string()),
                Data::String("Closed".to_string()),
                Data::String("New".to_string()),
            ]
        );
        assert_eq!(l_rows[1][0], Data::String("Ana".to_string()));
        assert_eq!(l_rows[1][2], Data::Float(2.0));
        assert_eq!(l_rows[2][2], Data::Float(0.0));
    }

    #[test]
    fn report_describes_the_written_sheet() {
        let mut writer = create_writer();
        assert!(writer.report().is_none());
        writer
            .write_sheet_from_dataframe(&create_df(), "Statistika")
            .expect("write sheet");

        let report = writer.report().expect("report");
        assert_eq!(report.sheet.sheet_name, "Statistika");
        assert_eq!(report.sheet.height_header, 1);
        assert_eq!(report.sheet.height_body, 2);
        assert_eq!(report.sheet.width, 3);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn second_sheet_is_rejected() {
        let mut writer = create_writer();
        writer
            .write_sheet_from_dataframe(&create_df(), "Statistika")
            .expect("first sheet");
        assert!(
            writer
                .write_sheet_from_dataframe(&create_df(), "Other")
                .is_err()
        );
    }

    #[test]
    fn finish_is_idempotent_and_blocks_later_writes() {
        let mut writer = create_writer();
        writer
            .write_sheet_from_dataframe(&create_df(), "a/b")
            .expect("write sheet");
        let report = writer.report().expect("report");
        assert_eq!(report.sheet.sheet_name, "a_b");
        assert_eq!(report.warnings.len(), 1);

        let v_first = writer.finish().expect("finish");
        let v_second = writer.finish().expect("finish again");
        assert_eq!(v_first, v_second);
        assert!(
            writer
                .write_sheet_from_dataframe(&create_df(), "late")
                .is_err()
        );
    }

    #[test]
    fn finish_without_sheet_fails() {
        let mut writer = create_writer();
        assert!(writer.finish().is_err());
    }

    #[test]
    fn unsupported_cell_value_is_rejected() {
        let df = DataFrame::new(vec![Column::new(
            "flag".into(),
            vec![Some(true), None],
        )])
        .expect("dataframe");
        let mut writer = create_writer();
        assert!(
            writer
                .write_sheet_from_dataframe(&df, "Statistika")
                .is_err_and(|err| err.contains("Unsupported cell value"))
        );
    }
}
