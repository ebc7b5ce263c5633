//! Rank/frequency series and Zipf's law fits.

use std::ops::RangeBounds;

use serde::Serialize;

use crate::error::{Result, TextmineError};
use crate::scoring::{TermCount, group_by_document};

/// A term's rank within its document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankRecord {
    pub document: String,
    pub term: String,
    pub n: u64,
    pub total: u64,
    pub tf: f64,
    /// 1-based rank by descending count
    pub rank: usize,
}

/// Rank terms within each document by descending count.
///
/// Ties keep first-encountered order. Documents appear in first-appearance
/// order, each with its terms in rank order. Empty input yields no records.
pub fn rank_terms(counts: &[TermCount]) -> Result<Vec<RankRecord>> {
    let mut records = Vec::with_capacity(counts.len());
    for mut doc in group_by_document(counts)? {
        doc.terms.sort_by(|a, b| b.1.cmp(&a.1));
        let total = doc.total;
        records.extend(doc.terms.into_iter().enumerate().map(|(i, (term, n))| RankRecord {
            document: doc.document.clone(),
            term,
            n,
            total,
            tf: n as f64 / total as f64,
            rank: i + 1,
        }));
    }
    Ok(records)
}

/// `log10(tf) = intercept + slope * log10(rank)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PowerLaw {
    pub intercept: f64,
    pub slope: f64,
}

impl PowerLaw {
    /// Predicted term frequency at a rank.
    pub fn predict(&self, rank: usize) -> f64 {
        10f64.powf(self.intercept + self.slope * (rank as f64).log10())
    }
}

/// Least-squares fit of `log10(tf)` against `log10(rank)` over the records
/// whose rank falls in `ranks`, pooled across documents.
///
/// Fails with `InvalidInput` when the window holds fewer than two distinct
/// ranks.
pub fn fit_power_law<R: RangeBounds<usize>>(records: &[RankRecord], ranks: R) -> Result<PowerLaw> {
    let points: Vec<(f64, f64)> = records
        .iter()
        .filter(|r| ranks.contains(&r.rank) && r.tf > 0.0)
        .map(|r| ((r.rank as f64).log10(), r.tf.log10()))
        .collect();

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    let sxy: f64 = points.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum();

    if points.len() < 2 || sxx == 0.0 {
        return Err(TextmineError::invalid_input(
            "power law fit needs at least two distinct ranks",
        ));
    }

    let slope = sxy / sxx;
    Ok(PowerLaw {
        intercept: mean_y - slope * mean_x,
        slope,
    })
}
