use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Input file '{}' not found", .0.display())]
    MissingInput(PathBuf),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Non-numeric value {value:?} in column '{column}' at row {row}")]
    NonNumericValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
