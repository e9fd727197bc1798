//! Diagnostic summary of a normalization run. Purely observational: it reads
//! the input and output tables and never touches what gets written.

use std::fmt;

use serde::Serialize;

use crate::columns::normalized_name;
use crate::error::Result;
use crate::group::partition;
use crate::table::Table;

/// How original (unnormalized) ranges are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    /// `{:.2e}`, for tiny band powers.
    #[default]
    Scientific,
    /// `{:.2}`, for dB statistics.
    Fixed,
}

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    /// Targets whose whole-table ranges are shown.
    pub preview_columns: usize,
    /// Groups whose per-group ranges are shown.
    pub preview_groups: usize,
    /// Targets shown inside each previewed group.
    pub group_columns: usize,
    pub original_format: NumberFormat,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            preview_columns: 3,
            preview_groups: 1,
            group_columns: 2,
            original_format: NumberFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    fn of(values: &[f64]) -> Option<Range> {
        if values.is_empty() {
            return None;
        }
        Some(Range {
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnRange {
    pub column: String,
    pub original: Option<Range>,
    pub normalized: Option<Range>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: String,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupPreview {
    pub group: String,
    pub columns: Vec<ColumnRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub group_key: String,
    pub original_format: NumberFormat,
    pub rows: usize,
    pub columns: Vec<String>,
    pub groups: Vec<GroupSummary>,
    pub targets: Vec<String>,
    pub column_ranges: Vec<ColumnRange>,
    pub group_previews: Vec<GroupPreview>,
}

impl Report {
    pub fn build(
        input: &Table,
        output: &Table,
        group_key: &str,
        targets: &[String],
        options: &ReportOptions,
    ) -> Result<Report> {
        let groups = partition(input, group_key)?;

        let column_ranges = targets
            .iter()
            .take(options.preview_columns)
            .map(|column| column_range(input, output, column, None))
            .collect::<Result<Vec<_>>>()?;

        let group_previews = groups
            .iter()
            .take(options.preview_groups)
            .map(|(key, rows)| -> Result<GroupPreview> {
                let columns = targets
                    .iter()
                    .take(options.group_columns)
                    .map(|column| column_range(input, output, column, Some(rows)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(GroupPreview {
                    group: key.to_string(),
                    columns,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Report {
            group_key: group_key.to_string(),
            original_format: options.original_format,
            rows: input.row_count(),
            columns: input.headers().to_vec(),
            groups: groups
                .iter()
                .map(|(key, rows)| GroupSummary {
                    group: key.to_string(),
                    rows: rows.len(),
                })
                .collect(),
            targets: targets.to_vec(),
            column_ranges,
            group_previews,
        })
    }
}

fn column_range(
    input: &Table,
    output: &Table,
    column: &str,
    rows: Option<&Vec<usize>>,
) -> Result<ColumnRange> {
    let original = input.numeric_column(column)?;
    let normalized = output.numeric_column(&normalized_name(column))?;
    let pick = |values: Vec<f64>| -> Vec<f64> {
        match rows {
            Some(rows) => rows.iter().map(|&r| values[r]).collect(),
            None => values,
        }
    };
    Ok(ColumnRange {
        column: column.to_string(),
        original: Range::of(&pick(original)),
        normalized: Range::of(&pick(normalized)),
    })
}

struct Shown(Option<Range>, NumberFormat);

impl fmt::Display for Shown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.0, self.1) {
            (Some(r), NumberFormat::Scientific) => write!(f, "[{:.2e}, {:.2e}]", r.min, r.max),
            (Some(r), NumberFormat::Fixed) => write!(f, "[{:.2}, {:.2}]", r.min, r.max),
            (None, _) => write!(f, "[]"),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Loaded data with {} rows and {} columns",
            self.rows,
            self.columns.len()
        )?;
        writeln!(f, "Columns: {:?}", self.columns)?;
        writeln!(f, "Unique {} values: {}", self.group_key, self.groups.len())?;
        writeln!(f, "Found {} target columns", self.targets.len())?;

        writeln!(f, "\nProcessed {} groups individually:", self.groups.len())?;
        for group in &self.groups {
            writeln!(f, "{} {}: {} recordings", self.group_key, group.group, group.rows)?;
        }

        let original = |range: &ColumnRange| Shown(range.original, self.original_format);
        let normalized = |range: &ColumnRange| Shown(range.normalized, NumberFormat::Fixed);

        writeln!(f, "\nNormalization Statistics:")?;
        for range in &self.column_ranges {
            writeln!(f, "{}:", range.column)?;
            writeln!(f, "  Original range: {}", original(range))?;
            writeln!(f, "  Normalized range: {}", normalized(range))?;
        }
        if self.targets.len() > self.column_ranges.len() {
            writeln!(
                f,
                "... and {} more target columns",
                self.targets.len() - self.column_ranges.len()
            )?;
        }

        for preview in &self.group_previews {
            writeln!(f, "\nExample normalization for {} {}:", self.group_key, preview.group)?;
            for range in &preview.columns {
                writeln!(f, "  {}:", range.column)?;
                writeln!(f, "    Original range: {}", original(range))?;
                writeln!(f, "    Normalized range: {}", normalized(range))?;
            }
        }
        Ok(())
    }
}
