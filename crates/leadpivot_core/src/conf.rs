//! Pivot constants and default preset factories.

use leadpivot_io_xlsx::{EnumFmtKey, N_WIDTH_CELL_DEFAULT, select_default_xlsx_format};

use crate::spec::SpecPivotOptions;

/// Column holding the agent identity.
pub const C_COL_AGENT: &str = "agent_name";
/// Column holding the `;`-joined status list.
pub const C_COL_STATUS: &str = "Lead_status";
/// Separator between statuses inside one status cell.
pub const C_STATUS_SEPARATOR: char = ';';
/// Field delimiter of the uploaded CSV.
pub const N_CSV_DELIMITER: u8 = b',';
/// Output worksheet name.
pub const C_SHEET_NAME: &str = "Statistika";
/// Output file name stem, followed by `_<timestamp>.xlsx`.
pub const C_FILE_NAME_PREFIX: &str = "statistika_po_agentima";
/// `chrono` format of the file name timestamp.
pub const C_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
/// Raw rows shown in the upload preview.
pub const N_ROWS_PREVIEW: usize = 5;

/// Hint shown with a missing-column failure.
pub const C_HINT_SCHEMA: &str = "Provjeri da li CSV sadrži stupce 'agent_name' i 'Lead_status'";
/// Hint shown with a parse failure.
pub const C_HINT_PARSE: &str = "Provjeri format CSV datoteke i encoding (ISO-8859-1)";
/// Hint shown with any other failure.
pub const C_HINT_UNEXPECTED: &str = "Provjeri format CSV datoteke i encoding";

/// Build default pivot options.
pub fn derive_default_pivot_options() -> SpecPivotOptions {
    SpecPivotOptions {
        col_agent: C_COL_AGENT.to_string(),
        col_status: C_COL_STATUS.to_string(),
        status_separator: C_STATUS_SEPARATOR,
        sheet_name: C_SHEET_NAME.to_string(),
        file_name_prefix: C_FILE_NAME_PREFIX.to_string(),
        timestamp_format: C_TIMESTAMP_FORMAT.to_string(),
        n_rows_preview: N_ROWS_PREVIEW,
        width_cell: N_WIDTH_CELL_DEFAULT,
        fmt_cell: select_default_xlsx_format(EnumFmtKey::Cell),
        fmt_header: select_default_xlsx_format(EnumFmtKey::Header),
    }
}
