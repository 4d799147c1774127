//! Error types for loading, indexing and assembling scenes.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VisError>;

/// Errors that can occur while turning an ephemeris table into a scene.
///
/// Every variant is terminal for a run: nothing is retried and no partial
/// scene is produced.
#[derive(Debug, Error)]
pub enum VisError {
    /// A required column is absent from the input header
    #[error("Missing column(s): {} (available: {available})", .columns.join(", "))]
    MissingColumn { columns: Vec<String>, available: String },
    
    /// A timestamp or coordinate could not be converted
    #[error("Unparseable value on line {line}, column '{column}': '{value}' ({reason})")]
    UnparseableValue {
        line: u64,
        column: String,
        value: String,
        reason: String,
    },
    
    /// A body's observations do not line up with the shared timestamp axis
    #[error("Misaligned trajectory for '{body}': expected {expected} observations, found {found} ({detail})")]
    MisalignedTrajectory {
        body: String,
        expected: usize,
        found: usize,
        detail: String,
    },
    
    /// The table holds no observations
    #[error("Input table contains no observations")]
    EmptyTable,
    
    /// Frame sampling stride must be at least 1
    #[error("Invalid frame stride: {0} (must be >= 1)")]
    InvalidStride(usize),
    
    /// Reading the input failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    
    /// The CSV reader rejected the input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl VisError {
    /// Creates an unparseable-value error.
    pub fn unparseable(
        line: u64,
        column: &str,
        value: &str,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::UnparseableValue {
            line,
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
    
    /// Creates a misaligned-trajectory error.
    pub fn misaligned(
        body: &str,
        expected: usize,
        found: usize,
        detail: impl Into<String>,
    ) -> Self {
        Self::MisalignedTrajectory {
            body: body.to_string(),
            expected,
            found,
            detail: detail.into(),
        }
    }
}
