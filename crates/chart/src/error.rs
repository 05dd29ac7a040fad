use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("Population '{population}' has {scores} scores but {outcomes} outcomes")]
    LengthMismatch {
        population: String,
        scores: usize,
        outcomes: usize,
    },

    #[error("Population '{0}' was added twice")]
    DuplicatePopulation(String),
}
