//! Result records and the append-only results log

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::common::SimulationError;
use crate::eval::{AccuracyReport, Percentiles};

/// One percentile group as it appears in the results file
///
/// Categories with no errors serialize as all-zero maps, which keeps the
/// record schema fixed for downstream readers.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PercentileMap {
    /// Median error
    #[serde(rename = "50th")]
    pub p50: f64,
    /// 90th percentile error
    #[serde(rename = "90th")]
    pub p90: f64,
    /// 95th percentile error
    #[serde(rename = "95th")]
    pub p95: f64,
    /// Maximum error
    #[serde(rename = "100th")]
    pub p100: f64,
}

impl From<Option<Percentiles>> for PercentileMap {
    fn from(percentiles: Option<Percentiles>) -> Self {
        percentiles.map_or_else(PercentileMap::default, |p| PercentileMap {
            p50: p.p50,
            p90: p.p90,
            p95: p.p95,
            p100: p.p100,
        })
    }
}

/// The three percentile groups of one record
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordPercentiles {
    /// Positive errors
    pub overestimation: PercentileMap,
    /// Magnitudes of negative errors
    pub underestimation: PercentileMap,
    /// Absolute errors across all non-exact items
    pub combined: PercentileMap,
}

/// One evaluation snapshot as appended to the results log
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Updates applied when the snapshot was taken; authoritative counter
    pub processed_items: u64,
    /// Mean absolute error
    pub avg_error: f64,
    /// Mean relative error, percent
    pub avg_error_percentage: f64,
    /// Largest relative error, percent
    pub max_error_percentage: f64,
    /// Share of overestimated items, percent
    pub overestimation_percentage: f64,
    /// Share of underestimated items, percent
    pub underestimation_percentage: f64,
    /// Share of exactly estimated items, percent
    pub exact_match_percentage: f64,
    /// Average seconds per query
    pub avg_query_time: f64,
    /// Byte footprint of the sketch's counter arrays
    pub memory_usage: f64,
    /// Fraction of non-zero cells in the fullest row
    pub load_factor: f64,
    /// Error percentile groups
    pub percentiles: RecordPercentiles,
}

impl ResultRecord {
    /// Assembles a record from one snapshot's measurements
    pub fn new(
        processed_items: u64,
        accuracy: &AccuracyReport,
        avg_query_time: f64,
        memory_usage: f64,
        load_factor: f64,
    ) -> Self {
        ResultRecord {
            processed_items,
            avg_error: accuracy.avg_error,
            avg_error_percentage: accuracy.avg_error_percentage,
            max_error_percentage: accuracy.max_error_percentage,
            overestimation_percentage: accuracy.overestimation_percentage,
            underestimation_percentage: accuracy.underestimation_percentage,
            exact_match_percentage: accuracy.exact_match_percentage,
            avg_query_time,
            memory_usage,
            load_factor,
            percentiles: RecordPercentiles {
                overestimation: accuracy.overestimation_percentiles.into(),
                underestimation: accuracy.underestimation_percentiles.into(),
                combined: accuracy.combined_percentiles.into(),
            },
        }
    }
}

/// Append-only JSON-array log of evaluation records
///
/// Single writer per driver. Each append rewrites the array through a
/// temp-file-and-rename cycle, so a reader never observes a torn file and a
/// killed driver leaves the last successfully written array intact.
#[derive(Clone, Debug)]
pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    /// Creates a log handle for the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ResultsLog { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record, rewriting the array atomically
    ///
    /// A missing or unparseable existing file is treated as empty: the log
    /// must tolerate a reader's torn view or a fresh run directory without
    /// losing the new record.
    ///
    /// # Errors
    /// Propagates file I/O and serialization failures.
    pub fn append(&self, record: &ResultRecord) -> Result<(), SimulationError> {
        let mut records = match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str::<Vec<ResultRecord>>(&contents) {
                Ok(records) => records,
                Err(err) => {
                    warn!(path = %self.path.display(), %err, "results log unreadable, starting fresh");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        records.push(record.clone());

        let serialized = serde_json::to_string_pretty(&records)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Reads every record currently in the log
    ///
    /// # Errors
    /// Propagates file I/O failures and malformed JSON.
    pub fn read_all(&self) -> Result<Vec<ResultRecord>, SimulationError> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_map_from_none_is_zero() {
        let map: PercentileMap = None.into();
        assert_eq!(map, PercentileMap::default());
    }

    #[test]
    fn test_percentile_map_serializes_ordinal_keys() {
        let map = PercentileMap {
            p50: 1.0,
            p90: 2.0,
            p95: 3.0,
            p100: 4.0,
        };
        let json = serde_json::to_string(&map).unwrap();
        assert!(json.contains("\"50th\":1.0"));
        assert!(json.contains("\"100th\":4.0"));
    }
}
