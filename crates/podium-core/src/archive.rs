//! Scoring a directory of dated transcripts into a historical trend.

use std::fs;
use std::path::Path;

use crate::error::ArchiveError;
use crate::market::MarketQuotes;
use crate::score::Scorer;
use crate::stats::{self, Correlation};
use crate::transcript;
use crate::types::TrendPoint;

/// Score every dated `.txt` transcript under `dir`, ordered by date.
/// Files without an eight-digit date in their name are ignored, and
/// unreadable files are skipped with a note on stderr.
pub fn analyze_directory(scorer: &Scorer, dir: &Path) -> Result<Vec<TrendPoint>, ArchiveError> {
    let mut points = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date) = transcript::date_from_filename(name) else {
            continue;
        };
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                eprintln!("skipping {name}: {err}");
                continue;
            }
        };
        let compound = scorer.score(&transcript::clean(&raw)).compound;
        points.push(TrendPoint {
            date,
            compound,
            market_change: None,
            filename: name.to_string(),
        });
    }
    points.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.filename.cmp(&b.filename)));
    Ok(points)
}

/// Fill `market_change` on each point from the quote provider. Points whose
/// lookup fails stay without market data.
pub fn attach_market_changes(points: &mut [TrendPoint], quotes: &dyn MarketQuotes) {
    for point in points {
        match quotes.daily_change(point.date) {
            Ok(change) => point.market_change = change,
            Err(err) => eprintln!("no market data for {}: {err}", point.date),
        }
    }
}

/// Correlation between transcript tone and same-day market change, over
/// the points that carry market data.
pub fn market_correlation(points: &[TrendPoint]) -> Correlation {
    let pairs: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| p.market_change.map(|m| (p.compound, m)))
        .collect();
    let compounds: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let changes: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    stats::pearson(&compounds, &changes)
}
