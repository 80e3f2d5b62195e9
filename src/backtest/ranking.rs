//! Rank reconciliation and the cumulative hit precision score

use crate::error::{PredictorError, Result};
use crate::types::PredictionRecord;
use std::cmp::Ordering;

/// Model output for one test row, before ranking
#[derive(Debug, Clone, PartialEq)]
pub struct RawPrediction {
    pub player: String,
    pub share: f64,
    pub predicted_score: f64,
}

/// Attach actual and predicted ranks to one year's predictions
///
/// Both rankings are stable descending sorts, so equal values keep their input
/// order. The returned table is in predicted-rank order.
pub fn rank_year(year: i32, raw: Vec<RawPrediction>) -> Vec<PredictionRecord> {
    let actual_order = descending_order(&raw, |r| r.share);
    let mut actual_rank = vec![0usize; raw.len()];
    for (pos, &i) in actual_order.iter().enumerate() {
        actual_rank[i] = pos + 1;
    }

    let predicted_order = descending_order(&raw, |r| r.predicted_score);
    let mut slots: Vec<Option<RawPrediction>> = raw.into_iter().map(Some).collect();

    predicted_order
        .iter()
        .enumerate()
        .filter_map(|(pos, &i)| {
            let row = slots[i].take()?;
            let predicted_rank = pos + 1;
            Some(PredictionRecord {
                year,
                player: row.player,
                share: row.share,
                predicted_score: row.predicted_score,
                actual_rank: actual_rank[i],
                predicted_rank,
                rank_difference: actual_rank[i] as i64 - predicted_rank as i64,
            })
        })
        .collect()
}

fn descending_order(rows: &[RawPrediction], key: impl Fn(&RawPrediction) -> f64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| {
        key(&rows[b])
            .partial_cmp(&key(&rows[a]))
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Cumulative hit precision of one year's ranked table
///
/// Walks the rows by predicted rank. Every time a player from the actual
/// top `top_k` turns up, the running precision `found / seen` (with `seen`
/// counted from 1) is recorded; the score is the mean of those values.
pub fn cumulative_hit_precision(records: &[PredictionRecord], top_k: usize) -> Result<f64> {
    if records.is_empty() {
        return Err(PredictorError::Configuration(
            "cannot score a year with no player-seasons".into(),
        ));
    }

    let cutoff = top_k.min(records.len());
    let mut walk: Vec<&PredictionRecord> = records.iter().collect();
    walk.sort_by_key(|r| r.predicted_rank);

    let mut found = 0usize;
    let mut precisions = Vec::with_capacity(cutoff);
    for (pos, record) in walk.iter().enumerate() {
        let seen = pos + 1;
        if record.actual_rank <= cutoff {
            found += 1;
            precisions.push(found as f64 / seen as f64);
        }
    }

    if precisions.is_empty() {
        return Err(PredictorError::Configuration(format!(
            "no actual top-{} players found among {} rows",
            top_k,
            records.len()
        )));
    }

    Ok(precisions.iter().sum::<f64>() / precisions.len() as f64)
}
