use cohort_factor_tree::TreeError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for ingestion
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that can occur while reading study data
#[derive(Error, Debug)]
pub enum IngestError {
    /// The data file could not be opened
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed CSV (including rows whose length differs from the header)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The source has no header row
    #[error("Missing header row")]
    MissingHeader,

    /// The header cannot describe factors followed by subjects
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The requested subject is not one of the outcome columns
    #[error("Subject not found: '{subject}' (available: {})", .available.join(", "))]
    SubjectNotFound {
        subject: String,
        available: Vec<String>,
    },

    /// A subject cell is not a valid score
    #[error("Invalid score {value:?} for '{column}' in data row {row}")]
    InvalidScore {
        row: usize,
        column: String,
        value: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The rows could not be arranged into a factor tree
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
}

impl IngestError {
    /// Create an invalid header error
    pub fn invalid_header(msg: impl Into<String>) -> Self {
        Self::InvalidHeader(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
