//! Combining per-year results into a single report

use crate::error::{PredictorError, Result};
use crate::types::{PredictionRecord, YearScore};
use serde::{Deserialize, Serialize};

/// Outcome of one evaluation year
#[derive(Debug, Clone, PartialEq)]
pub struct YearResult {
    pub year: i32,
    pub score: f64,
    /// Ranked table, in predicted-rank order
    pub predictions: Vec<PredictionRecord>,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Mean score, per-year scores and the combined prediction table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub mean_score: f64,
    pub year_scores: Vec<YearScore>,
    pub predictions: Vec<PredictionRecord>,
}

impl BacktestReport {
    /// Per-year scores in evaluation order
    pub fn scores(&self) -> Vec<f64> {
        self.year_scores.iter().map(|s| s.score).collect()
    }

    /// Rows of one evaluation year, in predicted-rank order
    pub fn predictions_for(&self, year: i32) -> impl Iterator<Item = &PredictionRecord> + '_ {
        self.predictions.iter().filter(move |p| p.year == year)
    }
}

/// Arithmetic mean, refusing to divide by zero
pub fn mean_score(scores: &[f64]) -> Result<f64> {
    if scores.is_empty() {
        return Err(PredictorError::Configuration(
            "no evaluation years to average".into(),
        ));
    }
    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Fold ordered year results into a report
pub fn aggregate(results: Vec<YearResult>) -> Result<BacktestReport> {
    let year_scores: Vec<YearScore> = results
        .iter()
        .map(|r| YearScore {
            year: r.year,
            score: r.score,
        })
        .collect();
    let scores: Vec<f64> = year_scores.iter().map(|s| s.score).collect();
    let mean_score = mean_score(&scores)?;

    let predictions = results.into_iter().flat_map(|r| r.predictions).collect();

    Ok(BacktestReport {
        mean_score,
        year_scores,
        predictions,
    })
}
