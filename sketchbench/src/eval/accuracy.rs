//! Accuracy evaluation of a sketch snapshot against a ground-truth snapshot
//!
//! The evaluator walks every key of the truth mapping, so it must be given
//! consistent snapshots: a deep copy of the sketch and a plain copy of the
//! truth taken between updates. It holds no state between calls.

use std::collections::HashMap;

use crate::common::FrequencySketch;

/// How many worst offenders to keep per direction
const TOP_ERRORS: usize = 20;

/// Error percentiles at the 50th/90th/95th/100th marks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Percentiles {
    /// Median error
    pub p50: f64,
    /// 90th percentile error
    pub p90: f64,
    /// 95th percentile error
    pub p95: f64,
    /// Maximum error
    pub p100: f64,
}

impl Percentiles {
    /// Percentiles of a non-empty sample, or `None` for an empty one
    fn from_sample(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        Some(Percentiles {
            p50: percentile(&values, 50.0),
            p90: percentile(&values, 90.0),
            p95: percentile(&values, 95.0),
            p100: percentile(&values, 100.0),
        })
    }
}

/// Linearly interpolated percentile over sorted values (inclusive quantile
/// definition)
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = rank - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

/// One accuracy measurement of a sketch snapshot
///
/// Errors are signed: `estimate - true_count`. Percentile groups for empty
/// categories are `None`; the top-error lists may hold fewer than 20 entries
/// when fewer items err in that direction.
#[derive(Clone, Debug)]
pub struct AccuracyReport {
    /// Mean absolute error across all truth keys
    pub avg_error: f64,
    /// Mean of per-item `100 * |error| / true_count`
    pub avg_error_percentage: f64,
    /// Largest per-item `100 * |error| / true_count`
    pub max_error_percentage: f64,
    /// Share of items estimated exactly, in percent
    pub exact_match_percentage: f64,
    /// Share of items overestimated, in percent
    pub overestimation_percentage: f64,
    /// Share of items underestimated, in percent
    pub underestimation_percentage: f64,
    /// Percentiles of the positive errors
    pub overestimation_percentiles: Option<Percentiles>,
    /// Percentiles of the magnitudes of negative errors
    pub underestimation_percentiles: Option<Percentiles>,
    /// Percentiles of `|error|` across all non-exact items
    pub combined_percentiles: Option<Percentiles>,
    /// Up to 20 items with the largest positive error, descending
    pub top_20_overestimations: Vec<(String, i64)>,
    /// Up to 20 items with the most negative error, ascending
    pub top_20_underestimations: Vec<(String, i64)>,
}

/// Scores a sketch snapshot against a ground-truth snapshot
///
/// Returns `None` when the truth holds no items: there is nothing to
/// evaluate and the caller should skip the measurement rather than fail.
pub fn evaluate_accuracy<S: FrequencySketch>(
    sketch: &S,
    ground_truth: &HashMap<String, u64>,
) -> Option<AccuracyReport> {
    if ground_truth.is_empty() {
        return None;
    }

    let item_count = ground_truth.len() as f64;
    let mut abs_error_sum = 0.0;
    let mut error_pct_sum = 0.0;
    let mut max_error_pct = 0.0f64;
    let mut exact = 0usize;
    let mut overestimations: Vec<(String, i64)> = Vec::new();
    let mut underestimations: Vec<(String, i64)> = Vec::new();

    for (item, &true_count) in ground_truth {
        let error = sketch.query(item) - true_count as i64;
        let abs_error = error.unsigned_abs() as f64;
        abs_error_sum += abs_error;
        let error_pct = abs_error / true_count as f64 * 100.0;
        error_pct_sum += error_pct;
        max_error_pct = max_error_pct.max(error_pct);

        if error == 0 {
            exact += 1;
        } else if error > 0 {
            overestimations.push((item.clone(), error));
        } else {
            underestimations.push((item.clone(), error));
        }
    }

    let over_errors: Vec<f64> = overestimations.iter().map(|(_, e)| *e as f64).collect();
    let under_errors: Vec<f64> = underestimations
        .iter()
        .map(|(_, e)| e.unsigned_abs() as f64)
        .collect();
    let combined: Vec<f64> = over_errors
        .iter()
        .chain(under_errors.iter())
        .copied()
        .collect();

    let overestimation_percentage = overestimations.len() as f64 / item_count * 100.0;
    let underestimation_percentage = underestimations.len() as f64 / item_count * 100.0;

    overestimations.sort_by(|a, b| b.1.cmp(&a.1));
    overestimations.truncate(TOP_ERRORS);
    underestimations.sort_by(|a, b| a.1.cmp(&b.1));
    underestimations.truncate(TOP_ERRORS);

    Some(AccuracyReport {
        avg_error: abs_error_sum / item_count,
        avg_error_percentage: error_pct_sum / item_count,
        max_error_percentage: max_error_pct,
        exact_match_percentage: exact as f64 / item_count * 100.0,
        overestimation_percentage,
        underestimation_percentage,
        overestimation_percentiles: Percentiles::from_sample(over_errors),
        underestimation_percentiles: Percentiles::from_sample(under_errors),
        combined_percentiles: Percentiles::from_sample(combined),
        top_20_overestimations: overestimations,
        top_20_underestimations: underestimations,
    })
}
