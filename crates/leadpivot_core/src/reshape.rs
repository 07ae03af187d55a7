//! Reshaper stage: status expansion and the agent × status frequency table.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::load::{RawTable, validate_required_columns};
use crate::spec::{ExpandedRecord, PipelineError, SpecPivotOptions};

/// Sparse pair counts with sorted, duplicate-free axes.
///
/// Combinations never observed are absent from `counts` and read as 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrequencyTable {
    agents: Vec<String>,
    statuses: Vec<String>,
    counts: BTreeMap<(String, String), u64>,
}

impl FrequencyTable {
    /// Row keys, ascending.
    pub fn agents(&self) -> &[String] {
        &self.agents
    }

    /// Column keys, ascending.
    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn count(&self, agent_name: &str, status: &str) -> u64 {
        self.counts
            .get(&(agent_name.to_string(), status.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Sum over all cells; equals the number of expanded records.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Row-major counts over `agents() × statuses()`, zero-filled.
    pub fn dense_grid(&self) -> Vec<Vec<u64>> {
        self.agents
            .iter()
            .map(|agent_name| {
                self.statuses
                    .iter()
                    .map(|status| self.count(agent_name, status))
                    .collect()
            })
            .collect()
    }

    /// Dense grid as a dataframe: `index_name` column of agents, then one
    /// count column per status.
    pub fn to_dataframe(&self, index_name: &str) -> Result<DataFrame, PipelineError> {
        let l_grid = self.dense_grid();

        let mut l_cols = Vec::with_capacity(self.statuses.len() + 1);
        l_cols.push(Column::new(index_name.into(), self.agents.clone()));
        for (n_idx_col, status) in self.statuses.iter().enumerate() {
            let l_values: Vec<u64> = l_grid.iter().map(|row| row[n_idx_col]).collect();
            l_cols.push(Column::new(status.as_str().into(), l_values));
        }

        DataFrame::new(l_cols).map_err(|err| {
            PipelineError::Unexpected(format!("Failed to materialize frequency table: {err}"))
        })
    }
}

/// Split one status cell on `separator` and trim every piece.
///
/// An empty cell yields one empty token; a trailing separator yields a
/// trailing empty token.
pub fn expand_row(agent_name: &str, status_text: &str, separator: char) -> Vec<ExpandedRecord> {
    let c_agent_name = agent_name.trim();
    status_text
        .split(separator)
        .map(|status| ExpandedRecord::new(c_agent_name, status.trim()))
        .collect()
}

/// Expand every raw row into one record per status token.
///
/// An empty status field is read as the empty string. An empty agent field
/// has no text to trim and fails the run.
pub fn expand_records(
    raw: &RawTable,
    options: &SpecPivotOptions,
) -> Result<Vec<ExpandedRecord>, PipelineError> {
    validate_required_columns(&raw.columns(), &options.required_columns())?;

    let iter_agents = raw.iter_column(&options.col_agent)?;
    let iter_statuses = raw.iter_column(&options.col_status)?;

    let mut l_records = Vec::with_capacity(raw.height());
    for (n_idx_row, (agent_name, status_text)) in iter_agents.zip(iter_statuses).enumerate() {
        let Some(agent_name) = agent_name else {
            return Err(PipelineError::Unexpected(format!(
                "Empty {:?} value in data row {}",
                options.col_agent,
                n_idx_row + 1
            )));
        };
        l_records.extend(expand_row(
            agent_name,
            status_text.unwrap_or(""),
            options.status_separator,
        ));
    }

    debug!(
        rows = raw.height(),
        records = l_records.len(),
        "expanded status tokens"
    );
    Ok(l_records)
}

/// Count records per `(agent, status)` and sort both axes.
pub fn build_frequency_table(records: &[ExpandedRecord]) -> FrequencyTable {
    let mut set_agents = BTreeSet::new();
    let mut set_statuses = BTreeSet::new();
    let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();

    for record in records {
        set_agents.insert(record.agent_name.clone());
        set_statuses.insert(record.status.clone());
        *counts
            .entry((record.agent_name.clone(), record.status.clone()))
            .or_insert(0) += 1;
    }

    FrequencyTable {
        agents: set_agents.into_iter().collect(),
        statuses: set_statuses.into_iter().collect(),
        counts,
    }
}
