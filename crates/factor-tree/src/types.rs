use serde::{Deserialize, Serialize};
use std::fmt;

/// Score carried by entities whose outcome is not known yet
pub const UNKNOWN_SCORE: i64 = -1;

/// A categorical attribute together with its single observed value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Factor {
    /// Attribute name (e.g., "lunch", "test preparation course")
    pub label: String,

    /// Observed value (e.g., "standard", "completed")
    pub value: String,
}

impl Factor {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One subject of the study: its factors, in branching order, and its score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Factors in the population-wide branching order
    pub factors: Vec<Factor>,

    /// Observed score, or [`UNKNOWN_SCORE`]
    pub score: i64,
}

impl Entity {
    pub fn new(factors: Vec<Factor>, score: i64) -> Self {
        Self { factors, score }
    }

    /// Entity whose score is to be predicted
    pub fn unscored(factors: Vec<Factor>) -> Self {
        Self::new(factors, UNKNOWN_SCORE)
    }

    pub fn has_known_score(&self) -> bool {
        self.score > UNKNOWN_SCORE
    }

    /// Value observed for `label`, if the entity carries that factor
    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.factors
            .iter()
            .find(|factor| factor.label == label)
            .map(|factor| factor.value.as_str())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for factor in &self.factors {
            writeln!(f, "{}: {}", factor.label, factor.value)?;
        }
        write!(f, "Score: {}", self.score)
    }
}
