use cohort_factor_tree::{predict_detailed, round_score, Entity, FactorTree, Result};
use serde::Serialize;

/// Prediction for one entity of the evaluation set
#[derive(Debug, Clone, Serialize)]
pub struct PredictionCase {
    pub entity: Entity,
    pub predicted: f64,
    pub matched_samples: usize,
    pub fallback: bool,
    /// `100 * |predicted - score| / score`; `None` when the score cannot be compared
    pub absolute_percentage_error: Option<f64>,
}

/// Predictions for an evaluation set and their aggregate error
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub subject: String,
    pub cases: Vec<PredictionCase>,
    /// Cases contributing to the error (known, non-zero score)
    pub evaluated: usize,
    pub skipped: usize,
    /// Mean absolute percentage error over evaluated cases, rounded to two decimals
    pub mean_absolute_percentage_error: Option<f64>,
}

/// Predict every entity against `tree` and measure the error against its recorded score
pub fn evaluate(tree: &FactorTree, subject: &str, entities: &[Entity]) -> Result<PredictionReport> {
    let mut cases = Vec::with_capacity(entities.len());
    let mut error_total = 0.0;
    let mut evaluated = 0usize;

    for entity in entities {
        let prediction = predict_detailed(tree, entity)?;
        let error = if entity.has_known_score() && entity.score != 0 {
            Some(100.0 * (prediction.score - entity.score as f64).abs() / entity.score as f64)
        } else {
            log::warn!(
                "Skipping error for entity with score {}: not comparable",
                entity.score
            );
            None
        };
        if let Some(error) = error {
            error_total += error;
            evaluated += 1;
        }
        cases.push(PredictionCase {
            entity: entity.clone(),
            predicted: prediction.score,
            matched_samples: prediction.matched_samples,
            fallback: prediction.fallback,
            absolute_percentage_error: error,
        });
    }

    let mean = (evaluated > 0).then(|| round_score(error_total / evaluated as f64));
    log::info!(
        "Evaluated {} of {} entities for '{}'",
        evaluated,
        entities.len(),
        subject
    );

    Ok(PredictionReport {
        subject: subject.to_string(),
        skipped: cases.len() - evaluated,
        cases,
        evaluated,
        mean_absolute_percentage_error: mean,
    })
}

/// Plain-text listing: each entity, its prediction, then the aggregate error
pub fn render_text(report: &PredictionReport) -> String {
    let mut out = String::new();
    for case in &report.cases {
        out.push_str(&format!("{}\n", case.entity));
        out.push_str(&format!(
            "Predicted Score: {}\n\n",
            format_decimal(case.predicted)
        ));
    }
    match report.mean_absolute_percentage_error {
        Some(mean) => out.push_str(&format!(
            "Average absolute error: {}%\n",
            format_decimal(mean)
        )),
        None => out.push_str("Average absolute error: n/a\n"),
    }
    out
}

/// Shortest decimal form, keeping `.0` on whole numbers (`75.0`, `70.67`)
fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
