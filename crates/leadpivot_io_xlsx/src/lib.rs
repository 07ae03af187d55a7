//! `leadpivot_io_xlsx` v1:
//! In-memory single-sheet XLSX writer kernel.
//!
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/options
//! - `util`   : pure helper functions
//! - `writer` : pure-Rust writer kernel
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_MIME_XLSX, EnumFmtKey, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    N_WIDTH_CELL_DEFAULT, TUP_EXCEL_ILLEGAL, derive_default_xlsx_formats,
    select_default_xlsx_format,
};
pub use spec::{
    EnumCellValue, SpecCellFormat, SpecSheetExtent, SpecXlsxReport, SpecXlsxWriteOptions,
};
pub use util::{sanitize_sheet_name, validate_sheet_extent, validate_unique_columns};
pub use writer::XlsxWriter;
