//! Error types for reading the flight archive and validating configuration.

use std::path::PathBuf;

/// Fatal failures while opening or streaming the flight archive.
///
/// Row-level data quality problems (missing fields, impossible dates) are not
/// errors: those rows are excluded from the aggregates instead.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("archive {path}: {reason}")]
    Archive { path: PathBuf, reason: String },
    #[error("missing required column(s): {}", .missing.join(", "))]
    Format { missing: Vec<String> },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    pub(crate) fn archive(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SourceError::Archive {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Rejected report configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("airline_filter must contain at least one airline code")]
    EmptyAirlineFilter,
    #[error("airline code must not be blank")]
    BlankAirline,
    #[error("scale_max must be a positive finite number, got {0}")]
    InvalidScaleMax(f64),
    #[error("delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
