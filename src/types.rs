//! Core types shared by the dataset, the regressors and the backtester

use crate::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};

/// One player-season row of the input dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub player: String,
    pub year: i32,
    /// Fraction of the MVP voting points received (0 if none)
    pub share: f64,
    /// Feature values, aligned with the dataset's feature columns
    pub features: Vec<f64>,
}

/// Dense row-major feature table handed to regressors
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            return Err(PredictorError::DataContract(format!(
                "row {} has {} values, expected {}",
                i,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Ranked prediction for one player in one evaluation year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub year: i32,
    pub player: String,
    #[serde(rename = "Share")]
    pub share: f64,
    pub predicted_score: f64,
    /// 1 = highest actual Share that year
    pub actual_rank: usize,
    /// 1 = highest predicted score that year
    pub predicted_rank: usize,
    /// actual_rank - predicted_rank; positive means the model ranked the player too low
    pub rank_difference: i64,
}

/// Score of a single evaluation year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearScore {
    pub year: i32,
    pub score: f64,
}
