//! Error types for the MVP backtester

use thiserror::Error;

/// Crate-wide error
#[derive(Error, Debug)]
pub enum PredictorError {
    /// Year range, backtest setup or config values that cannot produce a result
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Dataset does not satisfy the columns/keys the backtester relies on
    #[error("Data contract violation: {0}")]
    DataContract(String),

    /// Raised by a regressor during fit or predict
    #[error("Model error: {0}")]
    Model(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PredictorError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, PredictorError::Configuration(_))
    }

    pub fn is_data_contract(&self) -> bool {
        matches!(self, PredictorError::DataContract(_))
    }

    pub fn is_model(&self) -> bool {
        matches!(self, PredictorError::Model(_))
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;
