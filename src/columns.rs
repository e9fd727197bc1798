use std::path::PathBuf;

use crate::error::{NormalizeError, Result};
use crate::report::NumberFormat;
use crate::table::Table;

pub const NORMALIZED_SUFFIX: &str = " (Normalized)";

pub fn normalized_name(column: &str) -> String {
    format!("{}{}", column, NORMALIZED_SUFFIX)
}

/// Which columns of a table get normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    Explicit(Vec<String>),
    /// Every column whose name starts with the prefix, in header order.
    Prefix(String),
}

impl TargetSelector {
    pub fn resolve(&self, table: &Table) -> Result<Vec<String>> {
        match self {
            TargetSelector::Explicit(columns) => {
                if let Some(missing) = columns.iter().find(|c| !table.has_column(c)) {
                    return Err(NormalizeError::Schema(format!(
                        "target column '{}' not found",
                        missing
                    )));
                }
                Ok(columns.clone())
            }
            TargetSelector::Prefix(prefix) => {
                let columns: Vec<String> = table
                    .headers()
                    .iter()
                    .filter(|h| h.starts_with(prefix.as_str()))
                    .cloned()
                    .collect();
                if columns.is_empty() {
                    return Err(NormalizeError::Schema(format!(
                        "no columns start with '{}'",
                        prefix
                    )));
                }
                Ok(columns)
            }
        }
    }
}

/// Where normalized columns land in the output header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnPlacement {
    /// Original columns, then every normalized column in target order.
    #[default]
    Append,
    /// Each normalized column directly after its source column.
    AfterSource,
}

/// One slot of the output header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputColumn {
    /// Index into the input header.
    Original(usize),
    /// Index into the target list.
    Normalized(usize),
}

/// `targets` must already be resolved against `headers`.
pub fn output_layout(
    headers: &[String],
    targets: &[String],
    placement: ColumnPlacement,
) -> Vec<OutputColumn> {
    let mut layout = Vec::with_capacity(headers.len() + targets.len());
    match placement {
        ColumnPlacement::Append => {
            layout.extend((0..headers.len()).map(OutputColumn::Original));
            layout.extend((0..targets.len()).map(OutputColumn::Normalized));
        }
        ColumnPlacement::AfterSource => {
            for (i, header) in headers.iter().enumerate() {
                layout.push(OutputColumn::Original(i));
                if let Some(t) = targets.iter().position(|t| t == header) {
                    layout.push(OutputColumn::Normalized(t));
                }
            }
        }
    }
    layout
}

pub fn output_headers(
    headers: &[String],
    targets: &[String],
    placement: ColumnPlacement,
) -> Vec<String> {
    output_layout(headers, targets, placement)
        .into_iter()
        .map(|slot| match slot {
            OutputColumn::Original(i) => headers[i].clone(),
            OutputColumn::Normalized(t) => normalized_name(&targets[t]),
        })
        .collect()
}

pub const SNR_MEAN_COLUMN: &str = "SNR Mean (dB)";
pub const SNR_STD_COLUMN: &str = "SNR Std Dev (dB)";
pub const PSD_PREFIX: &str = "PSD_";

/// The two clinical tables this tool was written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Power spectral density bands, one `PSD_*` column per band.
    Psd,
    /// Per-recording signal-to-noise statistics.
    Snr,
}

impl Preset {
    pub fn targets(&self) -> TargetSelector {
        match self {
            Preset::Psd => TargetSelector::Prefix(PSD_PREFIX.to_string()),
            Preset::Snr => TargetSelector::Explicit(vec![
                SNR_MEAN_COLUMN.to_string(),
                SNR_STD_COLUMN.to_string(),
            ]),
        }
    }

    pub fn placement(&self) -> ColumnPlacement {
        match self {
            Preset::Psd => ColumnPlacement::Append,
            Preset::Snr => ColumnPlacement::AfterSource,
        }
    }

    pub fn default_input(&self) -> PathBuf {
        match self {
            Preset::Psd => PathBuf::from("detailed_psd_table.csv"),
            Preset::Snr => PathBuf::from("detailed_snrs_table.csv"),
        }
    }

    pub fn default_output(&self) -> PathBuf {
        match self {
            Preset::Psd => PathBuf::from("detailed_psd_normalized_table.csv"),
            Preset::Snr => PathBuf::from("detailed_snrs_normalized_table.csv"),
        }
    }

    /// How many groups the report previews per-group ranges for.
    pub fn preview_groups(&self) -> usize {
        match self {
            Preset::Psd => 1,
            Preset::Snr => 3,
        }
    }

    /// Band powers are tiny, SNR statistics are plain dB values.
    pub fn original_format(&self) -> NumberFormat {
        match self {
            Preset::Psd => NumberFormat::Scientific,
            Preset::Snr => NumberFormat::Fixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_normalized_name() {
        assert_eq!(normalized_name("PSD_Alpha"), "PSD_Alpha (Normalized)");
        assert_eq!(
            normalized_name(SNR_MEAN_COLUMN),
            "SNR Mean (dB) (Normalized)"
        );
    }

    #[test]
    fn test_append_places_normalized_columns_last() {
        let headers = strings(&["Patient", "A", "Group", "B"]);
        let targets = strings(&["B", "A"]);
        assert_eq!(
            output_headers(&headers, &targets, ColumnPlacement::Append),
            strings(&[
                "Patient",
                "A",
                "Group",
                "B",
                "B (Normalized)",
                "A (Normalized)"
            ])
        );
    }

    #[test]
    fn test_after_source_interleaves() {
        let headers = strings(&["Patient", "A", "Group", "B", "Notes"]);
        let targets = strings(&["A", "B"]);
        assert_eq!(
            output_headers(&headers, &targets, ColumnPlacement::AfterSource),
            strings(&[
                "Patient",
                "A",
                "A (Normalized)",
                "Group",
                "B",
                "B (Normalized)",
                "Notes"
            ])
        );
    }

    #[test]
    fn test_preset_report_formats() {
        assert_eq!(Preset::Psd.original_format(), NumberFormat::Scientific);
        assert_eq!(Preset::Snr.original_format(), NumberFormat::Fixed);
    }

    #[test]
    fn test_prefix_selects_in_header_order() {
        let table = Table::new(
            strings(&["Patient", "PSD_Theta", "Condition", "PSD_Alpha"]),
            vec![],
        )
        .unwrap();
        let targets = TargetSelector::Prefix("PSD_".into()).resolve(&table).unwrap();
        assert_eq!(targets, strings(&["PSD_Theta", "PSD_Alpha"]));
    }

    #[test]
    fn test_prefix_without_match_is_schema_error() {
        let table = Table::new(strings(&["Patient", "X"]), vec![]).unwrap();
        assert!(matches!(
            Preset::Psd.targets().resolve(&table),
            Err(NormalizeError::Schema(_))
        ));
    }

    #[test]
    fn test_explicit_missing_column_is_schema_error() {
        let table = Table::new(strings(&["Patient", SNR_MEAN_COLUMN]), vec![]).unwrap();
        let err = Preset::Snr.targets().resolve(&table).unwrap_err();
        assert!(err.to_string().contains(SNR_STD_COLUMN));
    }
}
