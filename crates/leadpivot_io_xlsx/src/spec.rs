//! Shared XLSX specification models.

use crate::conf::N_WIDTH_CELL_DEFAULT;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification; every field is optional so formats can be layered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Bold style.
    pub bold: Option<bool>,
    /// Horizontal alignment.
    pub align: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Background fill color.
    pub bg_color: Option<String>,
}

/// Normalized cell value during the write pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            border: other.border.or(self.border),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Writer-wide layout options.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecXlsxWriteOptions {
    /// Width applied to every written column, in Excel character units.
    pub width_cell: f64,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            width_cell: N_WIDTH_CELL_DEFAULT,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Extent of the sheet emitted to the workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetExtent {
    /// Sheet name as written.
    pub sheet_name: String,
    /// Number of header rows written.
    pub height_header: usize,
    /// Number of body rows written.
    pub height_body: usize,
    /// Number of columns written.
    pub width: usize,
}

/// Write report for the workbook's sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxReport {
    /// The written sheet.
    pub sheet: SpecSheetExtent,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_patch_values_and_keeps_base_elsewhere() {
        let base = SpecCellFormat {
            border: Some(1),
            align: Some("center".to_string()),
            ..Default::default()
        };
        let merged = base.with_(SpecCellFormat {
            bold: Some(true),
            align: Some("left".to_string()),
            ..Default::default()
        });

        assert_eq!(merged.border, Some(1));
        assert_eq!(merged.align.as_deref(), Some("left"));
        assert_eq!(merged.bold, Some(true));
        assert_eq!(merged.bg_color, None);
    }
}
