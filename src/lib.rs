//! Per-patient min-max normalization of clinical measurement tables
//! (PSD band powers, SNR statistics).

pub mod columns;
pub mod error;
pub mod group;
pub mod io;
pub mod normalizer;
pub mod report;
pub mod scalers;
pub mod table;

pub use columns::{normalized_name, ColumnPlacement, Preset, TargetSelector};
pub use error::{NormalizeError, Result};
pub use normalizer::{normalize, normalize_with, NormalizeOptions};
pub use table::Table;

use std::path::PathBuf;

use report::{Report, ReportOptions};

/// Everything needed to normalize one file into another.
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub group_key: String,
    pub targets: TargetSelector,
    pub placement: ColumnPlacement,
    pub delimiter: u8,
    pub report: ReportOptions,
}

/// Reads, normalizes and writes. The output file is only created once the
/// whole table has been normalized and summarized.
pub fn run(job: &Job) -> Result<Report> {
    let input = io::read_table(&job.input, job.delimiter)?;
    let targets = job.targets.resolve(&input)?;
    let options = NormalizeOptions::new(job.group_key.clone(), targets).placement(job.placement);

    let output = normalize_with(&input, &options)?;
    let report = Report::build(&input, &output, &job.group_key, &options.targets, &job.report)?;
    io::write_table(&output, &job.output, job.delimiter)?;

    Ok(report)
}
