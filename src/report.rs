//! Backtest output: the combined prediction table as CSV and a text summary

use crate::backtest::BacktestReport;
use crate::error::Result;
use crate::types::PredictionRecord;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Write prediction rows (with header) to any writer
pub fn write_predictions_csv<W: Write>(writer: W, records: &[PredictionRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the combined prediction table, creating parent directories
pub fn save_predictions(path: impl AsRef<Path>, records: &[PredictionRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_predictions_csv(File::create(path)?, records)?;
    tracing::info!("Saved {} predictions to {}", records.len(), path.display());
    Ok(())
}

/// Human-readable summary: per-year precision, the model's top picks, and the mean
pub fn format_summary(report: &BacktestReport, top_n: usize) -> String {
    let mut out = String::new();

    for year_score in &report.year_scores {
        let _ = writeln!(out, "{}  precision {:.3}", year_score.year, year_score.score);
        for p in report.predictions_for(year_score.year).take(top_n) {
            let _ = writeln!(
                out,
                "  #{:<2} {:<28} predicted {:>7.3}  actual share {:.3} (rank {}, diff {:+})",
                p.predicted_rank, p.player, p.predicted_score, p.share, p.actual_rank, p.rank_difference
            );
        }
    }

    let _ = writeln!(out, "\nMean Average Precision: {:.4}", report.mean_score);
    out
}
