//! Configuration loading
//!
//! Settings are layered: defaults, then an optional TOML file, then
//! `MVP__SECTION__KEY` environment variables (a `.env` file is honoured).

use crate::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub backtest: BacktestConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from `path` (missing file is fine) and the environment
    pub fn load(path: &str) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("MVP")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("dataset.excluded_columns")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the backtester cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.backtest.warmup_years == 0 {
            return Err(PredictorError::Configuration(
                "backtest.warmup_years must be at least 1".into(),
            ));
        }
        if self.backtest.top_k == 0 {
            return Err(PredictorError::Configuration(
                "backtest.top_k must be at least 1".into(),
            ));
        }
        if !self.model.ridge.alpha.is_finite() || self.model.ridge.alpha < 0.0 {
            return Err(PredictorError::Configuration(format!(
                "model.ridge.alpha must be a non-negative number, got {}",
                self.model.ridge.alpha
            )));
        }
        if self.model.forest.n_estimators == 0 {
            return Err(PredictorError::Configuration(
                "model.forest.n_estimators must be at least 1".into(),
            ));
        }
        if self.model.forest.min_samples_split < 2 {
            return Err(PredictorError::Configuration(format!(
                "model.forest.min_samples_split must be at least 2, got {}",
                self.model.forest.min_samples_split
            )));
        }
        Ok(())
    }
}

/// Where the cleaned player-season table lives and how its columns are named
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: String,
    #[serde(default = "default_player_column")]
    pub player_column: String,
    #[serde(default = "default_year_column")]
    pub year_column: String,
    #[serde(default = "default_target_column")]
    pub target_column: String,
    /// Columns that leak the voting result; the target column is always excluded too
    #[serde(default = "default_excluded_columns")]
    pub excluded_columns: Vec<String>,
}

fn default_dataset_path() -> String {
    "csvFiles/mvp-pg-team (clean).csv".to_string()
}

fn default_player_column() -> String {
    "Player".to_string()
}

fn default_year_column() -> String {
    "year".to_string()
}

fn default_target_column() -> String {
    "Share".to_string()
}

fn default_excluded_columns() -> Vec<String> {
    vec!["First".into(), "Pts Won".into(), "Pts Max".into()]
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            player_column: default_player_column(),
            year_column: default_year_column(),
            target_column: default_target_column(),
            excluded_columns: default_excluded_columns(),
        }
    }
}

impl DatasetConfig {
    /// Dataset path with `~` and `$VARS` expanded
    pub fn resolved_path(&self) -> PathBuf {
        match shellexpand::full(&self.path) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(_) => PathBuf::from(&self.path),
        }
    }

    /// Every column that must never reach a regressor
    pub fn leaking_columns(&self) -> Vec<String> {
        let mut cols = self.excluded_columns.clone();
        if !cols.contains(&self.target_column) {
            cols.push(self.target_column.clone());
        }
        cols
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Leading years used only as training history
    #[serde(default = "default_warmup_years")]
    pub warmup_years: usize,
    /// Size of the actual top set the precision score looks for
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_warmup_years() -> usize {
    5
}

fn default_top_k() -> usize {
    5
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            warmup_years: default_warmup_years(),
            top_k: default_top_k(),
        }
    }
}

/// Which regressor to fit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    Ridge,
    RandomForest,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub kind: ModelKind,
    #[serde(default)]
    pub ridge: RidgeConfig,
    #[serde(default)]
    pub forest: ForestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgeConfig {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl Default for RidgeConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Unlimited when absent
    #[serde(default)]
    pub max_depth: Option<usize>,
}

fn default_n_estimators() -> usize {
    50
}

fn default_min_samples_split() -> usize {
    5
}

fn default_seed() -> u64 {
    1
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: default_n_estimators(),
            min_samples_split: default_min_samples_split(),
            seed: default_seed(),
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write the combined prediction table here when set
    #[serde(default)]
    pub predictions_path: Option<String>,
    /// Predicted players listed per year in the summary
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    5
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            predictions_path: None,
            top_n: default_top_n(),
        }
    }
}
