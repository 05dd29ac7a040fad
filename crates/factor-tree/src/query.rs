use crate::error::{Result, TreeError};
use crate::tree::FactorTree;
use serde::{Deserialize, Serialize};

/// Round a score to two decimal places, the precision of every reported average.
///
/// Exact ties go to the even neighbour (`80.125` -> `80.12`).
pub fn round_score(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Parallel `(score, outcome)` observations collected by a factor slice.
///
/// `scores[i]` belongs to an entity whose value for the sliced factor is `outcomes[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceSamples {
    pub scores: Vec<i64>,
    pub outcomes: Vec<String>,
}

impl SliceSamples {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, score: i64, outcome: impl Into<String>) {
        self.scores.push(score);
        self.outcomes.push(outcome.into());
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterate observations as `(score, outcome)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.scores
            .iter()
            .copied()
            .zip(self.outcomes.iter().map(String::as_str))
    }
}

/// Sum of `scores`, or [`TreeError::ScoreOverflow`] when it leaves the `i64` range
pub(crate) fn checked_total(scores: impl IntoIterator<Item = i64>) -> Result<i64> {
    scores.into_iter().try_fold(0i64, |total, score| {
        total.checked_add(score).ok_or(TreeError::ScoreOverflow)
    })
}

impl FactorTree {
    /// Collect one `(score, outcome)` pair per entity for factor `target_label`.
    ///
    /// Fails with [`TreeError::UnknownFactor`] when some leaf is reached without
    /// passing a branch on `target_label`.
    pub fn slice_by_factor(&self, target_label: &str) -> Result<SliceSamples> {
        if self.is_empty() {
            return Err(TreeError::EmptyIndex);
        }
        self.slice_with_outcome(target_label, None)
    }

    /// Slice below this node, with `inherited` as the outcome already decided by
    /// the nearest ancestor branch on `target_label` (if any).
    pub fn slice_with_outcome(
        &self,
        target_label: &str,
        inherited: Option<&str>,
    ) -> Result<SliceSamples> {
        let mut samples = SliceSamples::new();
        self.collect_slice(target_label, inherited, &mut samples)?;
        Ok(samples)
    }

    fn collect_slice(
        &self,
        target_label: &str,
        inherited: Option<&str>,
        out: &mut SliceSamples,
    ) -> Result<()> {
        match self {
            Self::Empty => Ok(()),
            Self::Leaf { entities } => {
                let outcome = inherited.ok_or_else(|| TreeError::unknown_factor(target_label))?;
                for entity in entities {
                    out.push(entity.score, outcome);
                }
                Ok(())
            }
            Self::Branch { label, children } => {
                let decides = label == target_label;
                for (value, child) in children {
                    let outcome = if decides { Some(value.as_str()) } else { inherited };
                    child.collect_slice(target_label, outcome, out)?;
                }
                Ok(())
            }
        }
    }

    /// Scores of every entity whose `target_label` factor equals `target_value`
    pub fn filter_by_outcome(&self, target_label: &str, target_value: &str) -> Vec<i64> {
        let mut scores = Vec::new();
        self.collect_filtered(target_label, target_value, &mut scores);
        scores
    }

    fn collect_filtered(&self, target_label: &str, target_value: &str, out: &mut Vec<i64>) {
        match self {
            Self::Empty => {}
            // The path to this leaf already fixed the target factor, or never branched on it
            Self::Leaf { entities } => out.extend(entities.iter().map(|entity| entity.score)),
            Self::Branch { label, children } if label == target_label => {
                if let Some(child) = children.get(target_value) {
                    child.collect_filtered(target_label, target_value, out);
                }
            }
            Self::Branch { children, .. } => {
                for child in children.values() {
                    child.collect_filtered(target_label, target_value, out);
                }
            }
        }
    }

    /// Total score and number of entities in the tree.
    ///
    /// Fails with [`TreeError::ScoreOverflow`] when the total does not fit in `i64`.
    pub fn sum_and_count(&self) -> Result<(i64, usize)> {
        if self.is_empty() {
            return Err(TreeError::EmptyIndex);
        }
        self.rollup()
    }

    fn rollup(&self) -> Result<(i64, usize)> {
        match self {
            Self::Empty => Ok((0, 0)),
            Self::Leaf { entities } => Ok((
                checked_total(entities.iter().map(|entity| entity.score))?,
                entities.len(),
            )),
            Self::Branch { children, .. } => {
                children
                    .values()
                    .try_fold((0i64, 0usize), |(total, count), child| -> Result<_> {
                        let (sub_total, sub_count) = child.rollup()?;
                        let total = total
                            .checked_add(sub_total)
                            .ok_or(TreeError::ScoreOverflow)?;
                        Ok((total, count + sub_count))
                    })
            }
        }
    }

    /// Mean score of every entity, rounded to two decimals
    pub fn average(&self) -> Result<f64> {
        let (total, count) = self.sum_and_count()?;
        Ok(round_score(total as f64 / count as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Entity, Factor};
    use pretty_assertions::assert_eq;

    fn single_factor_tree() -> FactorTree {
        FactorTree::from_entities([
            Entity::new(vec![Factor::new("some_factor", "result 1")], 80),
            Entity::new(vec![Factor::new("some_factor", "result 1")], 70),
            Entity::new(vec![Factor::new("some_factor", "result 2")], 90),
        ])
        .unwrap()
    }

    fn two_factor_tree() -> FactorTree {
        let rows = [
            ("male", "standard", 60),
            ("female", "free", 75),
            ("male", "free", 50),
            ("female", "standard", 85),
            ("male", "standard", 64),
        ];
        FactorTree::from_entities(rows.iter().map(|(gender, lunch, score)| {
            Entity::new(
                vec![Factor::new("gender", *gender), Factor::new("lunch", *lunch)],
                *score,
            )
        }))
        .unwrap()
    }

    #[test]
    fn slice_pairs_scores_with_outcomes() {
        let slice = single_factor_tree().slice_by_factor("some_factor").unwrap();
        assert_eq!(slice.scores, vec![80, 70, 90]);
        assert_eq!(slice.outcomes, vec!["result 1", "result 1", "result 2"]);
    }

    #[test]
    fn slice_on_inner_factor_passes_outcome_down() {
        let slice = two_factor_tree().slice_by_factor("lunch").unwrap();
        assert_eq!(slice.scores, vec![60, 64, 50, 75, 85]);
        assert_eq!(
            slice.outcomes,
            vec!["standard", "standard", "free", "free", "standard"]
        );
    }

    #[test]
    fn slice_on_outer_factor_ignores_inner_branches() {
        let slice = two_factor_tree().slice_by_factor("gender").unwrap();
        let pairs: Vec<(i64, &str)> = slice.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (60, "male"),
                (64, "male"),
                (50, "male"),
                (75, "female"),
                (85, "female")
            ]
        );
    }

    #[test]
    fn inherited_outcome_is_overridden_by_matching_branch() {
        let slice = single_factor_tree()
            .slice_with_outcome("some_factor", Some("stale"))
            .unwrap();
        assert!(slice.outcomes.iter().all(|outcome| outcome != "stale"));
    }

    #[test]
    fn inherited_outcome_labels_unbranched_leaves() {
        let slice = single_factor_tree()
            .slice_with_outcome("elsewhere", Some("given"))
            .unwrap();
        assert_eq!(slice.len(), 3);
        assert!(slice.outcomes.iter().all(|outcome| outcome == "given"));
    }

    #[test]
    fn slice_on_unknown_factor_fails() {
        let err = two_factor_tree().slice_by_factor("parental level").unwrap_err();
        assert_eq!(err, TreeError::UnknownFactor("parental level".to_string()));
    }

    #[test]
    fn slice_on_empty_tree_fails() {
        assert_eq!(
            FactorTree::new().slice_by_factor("gender").unwrap_err(),
            TreeError::EmptyIndex
        );
    }

    #[test]
    fn filter_returns_matching_scores() {
        let tree = single_factor_tree();
        assert_eq!(tree.filter_by_outcome("some_factor", "result 1"), vec![80, 70]);
        assert!(tree.filter_by_outcome("some_factor", "result 3").is_empty());
    }

    #[test]
    fn filter_on_inner_factor_searches_every_outer_branch() {
        let tree = two_factor_tree();
        assert_eq!(tree.filter_by_outcome("lunch", "standard"), vec![60, 64, 85]);
        assert_eq!(tree.filter_by_outcome("gender", "female"), vec![75, 85]);
    }

    #[test]
    fn filter_on_unbranched_factor_returns_everything() {
        let tree = two_factor_tree();
        assert_eq!(tree.filter_by_outcome("race", "group A").len(), 5);
        assert!(FactorTree::new().filter_by_outcome("race", "group A").is_empty());
    }

    #[test]
    fn rollup_sums_every_leaf() {
        assert_eq!(single_factor_tree().sum_and_count().unwrap(), (240, 3));
        assert_eq!(two_factor_tree().sum_and_count().unwrap(), (334, 5));
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        assert_eq!(single_factor_tree().average().unwrap(), 80.0);
        assert_eq!(two_factor_tree().average().unwrap(), 66.8);

        let thirds = FactorTree::from_entities([
            Entity::new(vec![Factor::new("f", "a")], 1),
            Entity::new(vec![Factor::new("f", "a")], 1),
            Entity::new(vec![Factor::new("f", "b")], 0),
        ])
        .unwrap();
        assert_eq!(thirds.average().unwrap(), 0.67);
    }

    #[test]
    fn rollup_on_empty_tree_fails() {
        let tree = FactorTree::new();
        assert_eq!(tree.sum_and_count().unwrap_err(), TreeError::EmptyIndex);
        assert_eq!(tree.average().unwrap_err(), TreeError::EmptyIndex);
    }

    #[test]
    fn round_score_keeps_two_decimals() {
        assert_eq!(round_score(75.0), 75.0);
        assert_eq!(round_score(2.0 / 3.0), 0.67);
        assert_eq!(round_score(81.234), 81.23);
    }

    #[test]
    fn round_score_sends_exact_ties_to_even() {
        assert_eq!(round_score(80.125), 80.12);
        assert_eq!(round_score(80.375), 80.38);
        assert_eq!(round_score(66.125), 66.12);
    }

    #[test]
    fn average_of_exact_tie_rounds_to_even() {
        // 7 * 80 + 81 = 641; 641 / 8 = 80.125
        let mut entities: Vec<Entity> = (0..7)
            .map(|_| Entity::new(vec![Factor::new("f", "a")], 80))
            .collect();
        entities.push(Entity::new(vec![Factor::new("f", "b")], 81));
        let tree = FactorTree::from_entities(entities).unwrap();

        assert_eq!(tree.sum_and_count().unwrap(), (641, 8));
        assert_eq!(tree.average().unwrap(), 80.12);
    }

    #[test]
    fn rollup_past_i64_range_is_an_error() {
        let tree = FactorTree::from_entities([
            Entity::new(vec![Factor::new("f", "a")], i64::MAX),
            Entity::new(vec![Factor::new("f", "b")], i64::MAX),
        ])
        .unwrap();
        assert_eq!(tree.sum_and_count().unwrap_err(), TreeError::ScoreOverflow);
        assert_eq!(tree.average().unwrap_err(), TreeError::ScoreOverflow);

        let same_leaf = FactorTree::from_entities([
            Entity::new(vec![Factor::new("f", "a")], i64::MAX),
            Entity::new(vec![Factor::new("f", "a")], 1),
        ])
        .unwrap();
        assert_eq!(same_leaf.average().unwrap_err(), TreeError::ScoreOverflow);
    }
}
