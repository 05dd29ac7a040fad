use crate::error::{ChartError, Result};
use crate::summary::BoxStats;
use cohort_factor_tree::SliceSamples;
use serde::{Deserialize, Serialize};

/// One observation in long format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRow {
    pub population: String,
    pub score: i64,
    pub outcome: String,
}

/// Distribution of one outcome within one population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeGroup {
    pub outcome: String,
    pub stats: BoxStats,
}

/// All outcome groups of one population, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationGroups {
    pub population: String,
    pub groups: Vec<OutcomeGroup>,
}

/// Serializable description of a chart for an external plotting tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub factor: String,
    pub category_order: Vec<String>,
    pub populations: Vec<PopulationGroups>,
    pub rows: Vec<ChartRow>,
}

/// Scores of several populations against the outcomes of one factor
#[derive(Debug, Clone)]
pub struct CorrelationChart {
    title: String,
    factor: String,
    order: Vec<String>,
    populations: Vec<String>,
    rows: Vec<ChartRow>,
}

impl CorrelationChart {
    pub fn new(title: impl Into<String>, factor: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            factor: factor.into(),
            order: Vec::new(),
            populations: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Preferred display order of outcome values
    pub fn with_order(mut self, order: Vec<String>) -> Self {
        self.order = order;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn factor(&self) -> &str {
        &self.factor
    }

    pub fn populations(&self) -> &[String] {
        &self.populations
    }

    pub fn rows(&self) -> &[ChartRow] {
        &self.rows
    }

    /// Add the slice of one population
    pub fn add_population(&mut self, name: impl Into<String>, samples: &SliceSamples) -> Result<()> {
        let name = name.into();
        if samples.scores.len() != samples.outcomes.len() {
            return Err(ChartError::LengthMismatch {
                population: name,
                scores: samples.scores.len(),
                outcomes: samples.outcomes.len(),
            });
        }
        if self.populations.contains(&name) {
            return Err(ChartError::DuplicatePopulation(name));
        }

        log::debug!(
            "Chart '{}': population '{}' adds {} samples",
            self.title,
            name,
            samples.len()
        );
        self.rows.extend(samples.iter().map(|(score, outcome)| ChartRow {
            population: name.clone(),
            score,
            outcome: outcome.to_string(),
        }));
        self.populations.push(name);
        Ok(())
    }

    /// Preferred order first, then observed outcomes missing from it in first-seen order
    pub fn display_order(&self) -> Vec<String> {
        let mut order = self.order.clone();
        for row in &self.rows {
            if !order.contains(&row.outcome) {
                order.push(row.outcome.clone());
            }
        }
        order
    }

    /// Box summaries per population and outcome; empty groups are omitted
    pub fn groups(&self) -> Vec<PopulationGroups> {
        let order = self.display_order();
        self.populations
            .iter()
            .map(|population| {
                let groups = order
                    .iter()
                    .filter_map(|outcome| {
                        let scores: Vec<i64> = self
                            .rows
                            .iter()
                            .filter(|row| row.population == *population && row.outcome == *outcome)
                            .map(|row| row.score)
                            .collect();
                        BoxStats::from_scores(&scores).map(|stats| OutcomeGroup {
                            outcome: outcome.clone(),
                            stats,
                        })
                    })
                    .collect();
                PopulationGroups {
                    population: population.clone(),
                    groups,
                }
            })
            .collect()
    }

    pub fn spec(&self) -> ChartSpec {
        ChartSpec {
            title: self.title.clone(),
            factor: self.factor.clone(),
            category_order: self.display_order(),
            populations: self.groups(),
            rows: self.rows.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.spec())
    }
}
