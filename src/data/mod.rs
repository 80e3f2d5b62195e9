//! Player-season dataset
//!
//! Loads the cleaned MVP / per-game / team table and exposes the pieces the
//! backtester needs:
//! - Candidate feature selection (numeric columns minus leaking ones)
//! - Per-year train/test splits
//! - Dense feature matrices for regressors


use crate::config::DatasetConfig;
use crate::error::{PredictorError, Result};
use crate::types::{FeatureMatrix, SeasonRecord};
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Row indices for one evaluation year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSplit {
    pub year: i32,
    /// Every row with an earlier year
    pub train: Vec<usize>,
    /// Every row of `year`, in dataset order
    pub test: Vec<usize>,
}

/// Immutable player-season table
#[derive(Debug, Clone)]
pub struct Dataset {
    feature_columns: Vec<String>,
    records: Vec<SeasonRecord>,
}

impl Dataset {
    /// Build a dataset from in-memory records
    pub fn from_records(feature_columns: Vec<String>, records: Vec<SeasonRecord>) -> Result<Self> {
        if feature_columns.is_empty() {
            return Err(PredictorError::DataContract(
                "dataset has no candidate feature columns".into(),
            ));
        }

        let mut keys = HashSet::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if record.features.len() != feature_columns.len() {
                return Err(PredictorError::DataContract(format!(
                    "row {} ({} {}) has {} feature values, expected {}",
                    i,
                    record.player,
                    record.year,
                    record.features.len(),
                    feature_columns.len()
                )));
            }
            if !record.share.is_finite() || record.share < 0.0 {
                return Err(PredictorError::DataContract(format!(
                    "{} {} has invalid Share {}",
                    record.player, record.year, record.share
                )));
            }
            if !keys.insert((record.player.as_str(), record.year)) {
                return Err(PredictorError::DataContract(format!(
                    "duplicate player-season: {} {}",
                    record.player, record.year
                )));
            }
        }

        Ok(Self {
            feature_columns,
            records,
        })
    }

    /// Load a CSV file
    pub fn load(path: impl AsRef<Path>, config: &DatasetConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::from_reader(file, config)?;
        tracing::info!(
            "Loaded {} player-seasons with {} features from {}",
            dataset.len(),
            dataset.feature_columns.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse CSV from any reader
    pub fn from_reader<R: Read>(rdr: R, config: &DatasetConfig) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut seen = HashSet::with_capacity(headers.len());
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(PredictorError::DataContract(format!("duplicate column '{}'", header)));
            }
        }

        let player_idx = column_index(&headers, &config.player_column)?;
        let year_idx = column_index(&headers, &config.year_column)?;
        let target_idx = column_index(&headers, &config.target_column)?;

        let mut rows = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let row = result?;
            if row.len() != headers.len() {
                return Err(PredictorError::DataContract(format!(
                    "line {} has {} fields, header has {}",
                    i + 2,
                    row.len(),
                    headers.len()
                )));
            }
            rows.push(row);
        }

        let numeric: Vec<bool> = (0..headers.len())
            .map(|j| is_numeric_column(rows.iter().map(|r| &r[j])))
            .collect();

        let feature_columns = select_feature_columns(
            &headers,
            &numeric,
            &config.leaking_columns(),
            &config.player_column,
        );
        let feature_idx: Vec<usize> = feature_columns
            .iter()
            .filter_map(|c| headers.iter().position(|h| h == c))
            .collect();

        let dropped: Vec<&str> = headers
            .iter()
            .zip(&numeric)
            .filter(|(h, n)| !**n && **h != config.player_column)
            .map(|(h, _)| h.as_str())
            .collect();
        if !dropped.is_empty() {
            tracing::debug!("Ignoring non-numeric columns: {}", dropped.join(", "));
        }

        let mut records = Vec::with_capacity(rows.len());
        let mut blank_cells = 0usize;
        for (i, row) in rows.iter().enumerate() {
            let line = i + 2;
            let year = parse_year_cell(&row[year_idx]).ok_or_else(|| {
                PredictorError::DataContract(format!(
                    "line {}: invalid {} value '{}'",
                    line, config.year_column, &row[year_idx]
                ))
            })?;
            let share = parse_numeric_cell(&row[target_idx]).ok_or_else(|| {
                PredictorError::DataContract(format!(
                    "line {}: invalid {} value '{}'",
                    line, config.target_column, &row[target_idx]
                ))
            })?;
            blank_cells += feature_idx.iter().filter(|&&j| row[j].trim().is_empty()).count();
            let features = feature_idx
                .iter()
                .map(|&j| {
                    parse_numeric_cell(&row[j]).ok_or_else(|| {
                        PredictorError::DataContract(format!(
                            "line {}: invalid {} value '{}'",
                            line, headers[j], &row[j]
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            records.push(SeasonRecord {
                player: row[player_idx].trim().to_string(),
                year,
                share,
                features,
            });
        }

        if blank_cells > 0 {
            tracing::warn!("{} empty feature cells read as 0", blank_cells);
        }

        Self::from_records(feature_columns, records)
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn records(&self) -> &[SeasonRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&SeasonRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years, ascending
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// First and last year present
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let first = self.records.iter().map(|r| r.year).min()?;
        let last = self.records.iter().map(|r| r.year).max()?;
        Some((first, last))
    }

    /// Train rows (year < `year`) and test rows (year == `year`)
    pub fn split(&self, year: i32) -> YearSplit {
        let mut train = Vec::new();
        let mut test = Vec::new();
        for (i, record) in self.records.iter().enumerate() {
            if record.year < year {
                train.push(i);
            } else if record.year == year {
                test.push(i);
            }
        }
        YearSplit { year, train, test }
    }

    /// Records at the given indices, in the given order
    pub fn records_at(&self, indices: &[usize]) -> Result<Vec<&SeasonRecord>> {
        indices
            .iter()
            .map(|&i| {
                self.records
                    .get(i)
                    .ok_or_else(|| PredictorError::DataContract(format!("row {} out of range", i)))
            })
            .collect()
    }

    /// Feature matrix for the given rows, in the given order
    pub fn matrix(&self, indices: &[usize]) -> Result<FeatureMatrix> {
        let rows = self
            .records_at(indices)?
            .into_iter()
            .map(|r| r.features.clone())
            .collect();
        FeatureMatrix::new(self.feature_columns.clone(), rows)
    }

    /// Share values for the given rows
    pub fn targets(&self, indices: &[usize]) -> Vec<f64> {
        indices
            .iter()
            .filter_map(|&i| self.records.get(i))
            .map(|r| r.share)
            .collect()
    }
}

/// Numeric columns that may be used as predictors
///
/// Drops the player column, every leaking column and anything non-numeric.
/// Order follows the header.
pub fn select_feature_columns(
    headers: &[String],
    numeric: &[bool],
    leaking: &[String],
    player_column: &str,
) -> Vec<String> {
    headers
        .iter()
        .zip(numeric)
        .filter(|(h, is_num)| **is_num && h.as_str() != player_column && !leaking.contains(*h))
        .map(|(h, _)| h.clone())
        .collect()
}

fn column_index(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| PredictorError::DataContract(format!("missing required column '{}'", name)))
}

/// True when at least one cell is filled and every filled cell parses as a number
fn is_numeric_column<'a>(cells: impl Iterator<Item = &'a str>) -> bool {
    let mut seen_value = false;
    for cell in cells {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        if cell.parse::<f64>().is_err() {
            return false;
        }
        seen_value = true;
    }
    seen_value
}

/// Empty cells read as zero, matching the zero-filled cleaned table.
/// `NaN` and infinities are rejected.
fn parse_numeric_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(0.0);
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Accepts "2015" as well as "2015.0"
fn parse_year_cell(cell: &str) -> Option<i32> {
    let cell = cell.trim();
    if let Ok(year) = cell.parse::<i32>() {
        return Some(year);
    }
    let value = cell.parse::<f64>().ok()?;
    if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}
