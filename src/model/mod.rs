//! Regression models for vote-share prediction
//!
//! The backtester only sees the [`Regressor`] trait, so any model that can be
//! fitted on a feature matrix and produce one score per row can be plugged in.

mod forest;
mod ridge;
#[cfg(test)]
mod tests;

pub use forest::RandomForestRegressor;
pub use ridge::RidgeRegressor;

use crate::config::{ModelConfig, ModelKind};
use crate::error::Result;
use crate::types::FeatureMatrix;

/// Trait for vote-share regressors
#[cfg_attr(test, mockall::automock)]
pub trait Regressor {
    /// Train on `features` against `target` (one value per row), replacing any previous fit
    fn fit(&mut self, features: &FeatureMatrix, target: &[f64]) -> Result<()>;

    /// One score per row of `features`, in row order
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>>;

    /// Model name for logging
    fn name(&self) -> &str;
}

/// Instantiate the configured regressor
pub fn build_regressor(config: &ModelConfig) -> Box<dyn Regressor> {
    match config.kind {
        ModelKind::Ridge => Box::new(RidgeRegressor::new(config.ridge.alpha)),
        ModelKind::RandomForest => Box::new(RandomForestRegressor::from_config(&config.forest)),
    }
}

impl<R: Regressor + ?Sized> Regressor for Box<R> {
    fn fit(&mut self, features: &FeatureMatrix, target: &[f64]) -> Result<()> {
        (**self).fit(features, target)
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        (**self).predict(features)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
