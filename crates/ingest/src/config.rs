use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};

/// How a study table is laid out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Number of leading columns holding factors; the rest are subjects
    pub factor_columns: usize,

    /// Field delimiter (ASCII)
    pub delimiter: char,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            factor_columns: 5,
            delimiter: ',',
        }
    }
}

impl IngestConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.factor_columns == 0 {
            return Err(IngestError::invalid_config("factor_columns must be > 0"));
        }
        if !self.delimiter.is_ascii() {
            return Err(IngestError::invalid_config(format!(
                "delimiter {:?} is not ASCII",
                self.delimiter
            )));
        }
        Ok(())
    }

    pub(crate) fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.delimiter as u8
    }
}
