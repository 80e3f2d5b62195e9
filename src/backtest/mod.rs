//! Walk-forward backtesting
//!
//! For every evaluation year the regressor is refitted on all earlier seasons,
//! asked to score that year's players, and judged by how early the actual top
//! vote-getters show up in its ranking.
//!
//! ```text
//! years: y0 y1 y2 y3 y4 | y5  y6  y7 ...
//!        ---- warm-up ---  eval eval eval
//! y5: train < y5, test == y5
//! y6: train < y6, test == y6   (train window keeps growing)
//! ```
//!
//! ```rust,ignore
//! let backtester = Backtester::new(&dataset, BacktestConfig::default());
//! let report = backtester.run(&years, &mut RidgeRegressor::new(1.0))?;
//! println!("{:.3}", report.mean_score);
//! ```

mod aggregate;
mod ranking;

pub use aggregate::{aggregate, mean_score, BacktestReport, YearResult};
pub use ranking::{cumulative_hit_precision, rank_year, RawPrediction};

use crate::config::BacktestConfig;
use crate::data::Dataset;
use crate::error::{PredictorError, Result};
use crate::model::Regressor;
use std::slice;

/// Walk-forward evaluator over one dataset
#[derive(Debug, Clone)]
pub struct Backtester<'a> {
    dataset: &'a Dataset,
    config: BacktestConfig,
}

impl<'a> Backtester<'a> {
    pub fn new(dataset: &'a Dataset, config: BacktestConfig) -> Self {
        Self { dataset, config }
    }

    /// Years that get scored: everything after the warm-up prefix
    pub fn evaluation_years<'y>(&self, years: &'y [i32]) -> Result<&'y [i32]> {
        if let Some(pair) = years.windows(2).find(|w| w[0] >= w[1]) {
            return Err(PredictorError::Configuration(format!(
                "years must be strictly increasing, found {} before {}",
                pair[0], pair[1]
            )));
        }
        if years.len() <= self.config.warmup_years {
            return Err(PredictorError::Configuration(format!(
                "need at least {} years ({} warm-up + 1 evaluation), got {}",
                self.config.warmup_years + 1,
                self.config.warmup_years,
                years.len()
            )));
        }
        Ok(&years[self.config.warmup_years..])
    }

    /// Fit on every season before `year`, predict and score `year`
    pub fn evaluate_year<R>(&self, year: i32, regressor: &mut R) -> Result<YearResult>
    where
        R: Regressor + ?Sized,
    {
        let split = self.dataset.split(year);
        if split.test.is_empty() {
            return Err(PredictorError::Configuration(format!(
                "evaluation year {} has no player-seasons",
                year
            )));
        }
        if split.train.is_empty() {
            return Err(PredictorError::Configuration(format!(
                "evaluation year {} has no earlier seasons to train on",
                year
            )));
        }

        let train_x = self.dataset.matrix(&split.train)?;
        let train_y = self.dataset.targets(&split.train);
        tracing::debug!(
            "{}: fitting {} on {} rows, testing {} rows",
            year,
            regressor.name(),
            split.train.len(),
            split.test.len()
        );
        regressor.fit(&train_x, &train_y)?;

        let test_x = self.dataset.matrix(&split.test)?;
        let scores = regressor.predict(&test_x)?;
        if scores.len() != split.test.len() {
            return Err(PredictorError::Model(format!(
                "{} returned {} predictions for {} rows",
                regressor.name(),
                scores.len(),
                split.test.len()
            )));
        }
        if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
            return Err(PredictorError::Model(format!(
                "{} returned a non-finite prediction ({}) for {}",
                regressor.name(),
                bad,
                year
            )));
        }

        let raw = self
            .dataset
            .records_at(&split.test)?
            .into_iter()
            .zip(scores)
            .map(|(r, predicted_score)| RawPrediction {
                player: r.player.clone(),
                share: r.share,
                predicted_score,
            })
            .collect();
        let predictions = rank_year(year, raw);
        let score = cumulative_hit_precision(&predictions, self.config.top_k)?;

        tracing::info!(
            "{}: precision {:.3} over {} players (trained on {})",
            year,
            score,
            predictions.len(),
            split.train.len()
        );

        Ok(YearResult {
            year,
            score,
            predictions,
            train_rows: split.train.len(),
            test_rows: split.test.len(),
        })
    }

    /// Lazily evaluate each evaluation year in order
    ///
    /// Dropping the iterator early simply stops the backtest. After the first
    /// error the iterator is exhausted.
    pub fn walk<'r, R>(&'r self, years: &'r [i32], regressor: &'r mut R) -> Result<WalkForward<'r, R>>
    where
        R: Regressor + ?Sized,
    {
        let eval_years = self.evaluation_years(years)?;
        Ok(WalkForward {
            backtester: self,
            years: eval_years.iter(),
            regressor,
            failed: false,
        })
    }

    /// Evaluate every year and aggregate
    pub fn run<R>(&self, years: &[i32], regressor: &mut R) -> Result<BacktestReport>
    where
        R: Regressor + ?Sized,
    {
        tracing::info!(
            "Backtesting {} over {} years ({} warm-up)",
            regressor.name(),
            years.len(),
            self.config.warmup_years
        );
        let results = self.walk(years, regressor)?.collect::<Result<Vec<_>>>()?;
        let report = aggregate(results)?;
        tracing::info!(
            "Mean precision {:.3} across {} evaluation years",
            report.mean_score,
            report.year_scores.len()
        );
        Ok(report)
    }
}

/// Year-by-year iterator returned by [`Backtester::walk`]
pub struct WalkForward<'r, R: Regressor + ?Sized> {
    backtester: &'r Backtester<'r>,
    years: slice::Iter<'r, i32>,
    regressor: &'r mut R,
    failed: bool,
}

impl<R: Regressor + ?Sized> Iterator for WalkForward<'_, R> {
    type Item = Result<YearResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let &year = self.years.next()?;
        let result = self.backtester.evaluate_year(year, &mut *self.regressor);
        self.failed = result.is_err();
        Some(result)
    }
}

/// Backtest every year in `start_year..=end_year` with the default warm-up and top-5 cutoff
pub fn backtest<R>(dataset: &Dataset, start_year: i32, end_year: i32, regressor: &mut R) -> Result<BacktestReport>
where
    R: Regressor + ?Sized,
{
    if start_year > end_year {
        return Err(PredictorError::Configuration(format!(
            "start year {} is after end year {}",
            start_year, end_year
        )));
    }
    let years: Vec<i32> = (start_year..=end_year).collect();
    Backtester::new(dataset, BacktestConfig::default()).run(&years, regressor)
}
