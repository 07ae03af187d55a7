//! Per-run pivot report model.

use std::collections::BTreeMap;
use std::fmt;

/// Aggregate counters and diagnostics for one `run_pipeline` call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportPivot {
    /// Data rows read from the upload.
    pub cnt_rows_loaded: u64,
    /// `(agent, status)` records after status expansion.
    pub cnt_records_expanded: u64,
    /// Distinct agents (output rows).
    pub cnt_agents: u64,
    /// Distinct statuses (output count columns).
    pub cnt_statuses: u64,
    /// Non-fatal warnings collected during export.
    pub warnings: Vec<String>,
}

impl ReportPivot {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_rows_loaded".to_string(), self.cnt_rows_loaded);
        dict_counts.insert("cnt_records_expanded".to_string(), self.cnt_records_expanded);
        dict_counts.insert("cnt_agents".to_string(), self.cnt_agents);
        dict_counts.insert("cnt_statuses".to_string(), self.cnt_statuses);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} rows={} records={} agents={} statuses={} warnings={}",
            dict_counts["cnt_rows_loaded"],
            dict_counts["cnt_records_expanded"],
            dict_counts["cnt_agents"],
            dict_counts["cnt_statuses"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportPivot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[PIVOT]"))
    }
}
