//! NBA MVP Vote-Share Backtester
//!
//! Ranks players by predicted MVP vote share and measures, season by season,
//! how early the real top vote-getters appear in that ranking.
//!
//! ## Architecture
//!
//! ```text
//! Dataset (CSV) → Backtester (walk-forward split) → Regressor (fit/predict)
//!                        ↓
//!              Ranking & Scoring (per year) → Aggregate → Report
//! ```

pub mod backtest;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod report;
pub mod types;
pub mod utils;

#[cfg(test)]
mod types_tests;
#[cfg(test)]
mod error_tests;
