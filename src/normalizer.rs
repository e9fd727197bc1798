//! Per-group min-max normalization.
//!
//! The transform is a fold over three steps: rows are partitioned by the
//! group key, one [`MinMaxScaler`] is fitted per (group, target column), and
//! the output table is produced in a single pass over the input rows that
//! looks up the scaler of the row's group. The input table is never mutated.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::columns::{normalized_name, output_headers, output_layout, ColumnPlacement, OutputColumn};
use crate::error::{NormalizeError, Result};
use crate::group::{partition, Groups};
use crate::scalers::MinMaxScaler;
use crate::table::Table;

pub const DEFAULT_GROUP_KEY: &str = "Patient";

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOptions {
    pub group_key: String,
    pub targets: Vec<String>,
    pub placement: ColumnPlacement,
}

impl NormalizeOptions {
    pub fn new(group_key: impl Into<String>, targets: Vec<String>) -> Self {
        NormalizeOptions {
            group_key: group_key.into(),
            targets,
            placement: ColumnPlacement::default(),
        }
    }

    pub fn placement(mut self, placement: ColumnPlacement) -> Self {
        self.placement = placement;
        self
    }
}

/// Normalizes `target_columns` within each `group_key` group, appending the
/// normalized columns after all original columns.
pub fn normalize(table: &Table, group_key: &str, target_columns: &[String]) -> Result<Table> {
    normalize_with(table, &NormalizeOptions::new(group_key, target_columns.to_vec()))
}

pub fn normalize_with(table: &Table, options: &NormalizeOptions) -> Result<Table> {
    check_targets(table, &options.targets)?;
    let groups = partition(table, &options.group_key)?;

    let values = options
        .targets
        .iter()
        .map(|column| table.numeric_column(column))
        .collect::<Result<Vec<_>>>()?;

    info!(
        rows = table.row_count(),
        groups = groups.len(),
        targets = options.targets.len(),
        "normalizing by {}",
        options.group_key
    );

    let scalers = fit_groups(&groups, &values);
    let row_group = group_of_rows(&groups, table.row_count());

    let layout = output_layout(table.headers(), &options.targets, options.placement);
    let rows = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let group_scalers = &scalers[row_group[i]];
            layout
                .iter()
                .map(|slot| match *slot {
                    OutputColumn::Original(c) => row[c].clone(),
                    OutputColumn::Normalized(t) => {
                        format_value(group_scalers[t].transform(values[t][i]))
                    }
                })
                .collect()
        })
        .collect();

    Table::new(
        output_headers(table.headers(), &options.targets, options.placement),
        rows,
    )
}

fn check_targets(table: &Table, targets: &[String]) -> Result<()> {
    if targets.is_empty() {
        return Err(NormalizeError::Schema("no target columns given".to_string()));
    }
    let mut seen = HashSet::new();
    for target in targets {
        table.column_index(target)?;
        if !seen.insert(target.as_str()) {
            return Err(NormalizeError::Schema(format!(
                "target column '{}' listed twice",
                target
            )));
        }
        let derived = normalized_name(target);
        if table.has_column(&derived) {
            return Err(NormalizeError::Schema(format!(
                "column '{}' already exists",
                derived
            )));
        }
    }
    Ok(())
}

/// One scaler per target column for every group, indexed by the group's
/// position in `groups`. Groups are independent, so they are fitted in
/// parallel.
fn fit_groups(groups: &Groups, values: &[Vec<f64>]) -> Vec<Vec<MinMaxScaler>> {
    for (key, rows) in groups {
        debug!(group = %key, rows = rows.len(), "fitting group");
    }

    groups
        .values()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|rows| {
            values
                .iter()
                .map(|column| {
                    let data: Vec<f64> = rows.iter().map(|&r| column[r]).collect();
                    MinMaxScaler::new(&data)
                })
                .collect()
        })
        .collect()
}

fn group_of_rows(groups: &Groups, row_count: usize) -> Vec<usize> {
    let mut row_group = vec![0; row_count];
    for (g, rows) in groups.values().enumerate() {
        for &r in rows {
            row_group[r] = g;
        }
    }
    row_group
}

fn format_value(value: f64) -> String {
    format!("{:?}", value)
}
