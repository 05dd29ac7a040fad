use cohort_factor_tree::round_score;
use serde::{Deserialize, Serialize};

/// Five-number summary (plus count and mean) of one group of scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

impl BoxStats {
    /// Summarize `scores`; `None` when there is nothing to summarize.
    ///
    /// Quartiles use linear interpolation between closest ranks.
    pub fn from_scores(scores: &[i64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let mut sorted: Vec<f64> = scores.iter().map(|&score| score as f64).collect();
        sorted.sort_by(f64::total_cmp);

        let total: f64 = sorted.iter().sum();
        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
            mean: round_score(total / sorted.len() as f64),
        })
    }
}

fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
