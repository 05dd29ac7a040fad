use thiserror::Error;

/// Result type for factor tree operations
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors raised while building or querying a factor tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The entity's factor order disagrees with the tree's branching order
    #[error("Schema violation at factor position {position}: {detail}")]
    SchemaViolation { position: usize, detail: String },

    /// The requested factor is never branched on along some root-to-leaf path
    #[error("Unknown factor: {0}")]
    UnknownFactor(String),

    /// Rollup or slice requested before any entity was inserted
    #[error("Empty index: no entities have been inserted")]
    EmptyIndex,

    /// A score total left the `i64` range
    #[error("Score overflow: total of scores exceeds the i64 range")]
    ScoreOverflow,
}

impl TreeError {
    /// Create a schema violation error
    pub fn schema(position: usize, detail: impl Into<String>) -> Self {
        Self::SchemaViolation {
            position,
            detail: detail.into(),
        }
    }

    /// Create an unknown factor error
    pub fn unknown_factor(label: impl Into<String>) -> Self {
        Self::UnknownFactor(label.into())
    }
}
