use std::path::PathBuf;

use thiserror::Error;

/// Result type for the data layer.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors raised while loading, cleaning, or exporting employee data.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The source file is missing or does not match the employee schema.
    /// Fatal to the view: nothing is rendered until the source is fixed.
    #[error("employee data unavailable at {}: {reason}", path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// A computation needed at least one row and got none.
    #[error("no data in column {column}")]
    EmptyResult { column: &'static str },

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("export failed: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DashboardError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DashboardError::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
