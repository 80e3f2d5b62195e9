//! Year-range input handling
//!
//! Parses the start/end years given on the command line and checks them
//! against the seasons the dataset actually holds.

use crate::error::{PredictorError, Result};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Shorthand accepted in place of the current year
pub const PRESENT_MARKER: &str = "P";

/// Inclusive span of seasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Every year in the range, ascending
    pub fn years(&self) -> Vec<i32> {
        (self.start..=self.end).collect()
    }

    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Parse a year argument; `P` means `current_year`
pub fn parse_year(input: &str, current_year: i32) -> Result<i32> {
    let input = input.trim();
    if input.eq_ignore_ascii_case(PRESENT_MARKER) {
        return Ok(current_year);
    }
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(PredictorError::Configuration(format!(
            "'{}' is not a year (use digits, or '{}' for the current year)",
            input, PRESENT_MARKER
        )));
    }
    input
        .parse::<i32>()
        .map_err(|e| PredictorError::Configuration(format!("'{}' is not a year: {}", input, e)))
}

/// Check a requested training range against the available seasons
///
/// The end year must leave at least `warmup_years` seasons of history before
/// the first evaluated year.
pub fn validate_year_range(
    start: i32,
    end: i32,
    available_first: i32,
    available_last: i32,
    warmup_years: usize,
) -> Result<YearRange> {
    if !(available_first..=available_last).contains(&start) {
        return Err(PredictorError::Configuration(format!(
            "start year {} is outside the available years {}-{}",
            start, available_first, available_last
        )));
    }
    if !(available_first..=available_last).contains(&end) {
        return Err(PredictorError::Configuration(format!(
            "end year {} is outside the available years {}-{}",
            end, available_first, available_last
        )));
    }
    if start > end {
        return Err(PredictorError::Configuration(format!(
            "start year {} is after end year {}",
            start, end
        )));
    }

    let min_end = start as i64 + warmup_years as i64;
    if (end as i64) < min_end {
        return Err(PredictorError::Configuration(format!(
            "end year {} must be at least {} years after the start year {} (from {} onwards)",
            end, warmup_years, start, min_end
        )));
    }

    Ok(YearRange { start, end })
}
