use crate::error::{Result, TreeError};
use crate::query::{checked_total, round_score};
use crate::tree::FactorTree;
use crate::types::Entity;
use serde::{Deserialize, Serialize};

/// Estimated score together with the evidence behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Estimate rounded to two decimals
    pub score: f64,

    /// Samples averaged; an entity sharing k factor values is counted k times
    pub matched_samples: usize,

    /// True when no factor value was shared and the tree average was used
    pub fallback: bool,
}

/// Predict the score of `entity` from the entities stored in `tree`.
///
/// Every factor of `entity` contributes the scores of all stored entities with
/// the same value for that factor. Contributions are concatenated, not
/// deduplicated, so stored entities that agree on more factors weigh more.
/// When nothing matches, the average of the whole tree is returned.
pub fn predict(tree: &FactorTree, entity: &Entity) -> Result<f64> {
    predict_detailed(tree, entity).map(|prediction| prediction.score)
}

/// Same as [`predict`], also reporting how the estimate was obtained
pub fn predict_detailed(tree: &FactorTree, entity: &Entity) -> Result<Prediction> {
    let mut total: i64 = 0;
    let mut count: usize = 0;

    for factor in &entity.factors {
        let scores = tree.filter_by_outcome(&factor.label, &factor.value);
        log::debug!(
            "Factor '{}' = '{}' matched {} scores",
            factor.label,
            factor.value,
            scores.len()
        );
        total = total
            .checked_add(checked_total(scores.iter().copied())?)
            .ok_or(TreeError::ScoreOverflow)?;
        count += scores.len();
    }

    if count == 0 {
        let average = tree.average()?;
        log::debug!("No shared factor values, falling back to tree average {average:.2}");
        return Ok(Prediction {
            score: average,
            matched_samples: 0,
            fallback: true,
        });
    }

    Ok(Prediction {
        score: round_score(total as f64 / count as f64),
        matched_samples: count,
        fallback: false,
    })
}
