//! The streaming simulation driver
//!
//! Pulls items from a stream source, mirrors each into one sketch and one
//! ground-truth counter, and on a fixed update cadence snapshots both to
//! compute accuracy, query-time, memory, and load-factor measurements. Each
//! measurement is appended to the results log as one record; the `n`-th
//! record reflects the state after exactly `n * eval_interval` updates.

use std::collections::HashMap;
use std::io;

use tracing::{debug, info, warn};

use crate::common::{FrequencySketch, Result, SimulationError};
use crate::eval::{evaluate_accuracy, evaluate_avg_query_time, DEFAULT_SAMPLE_THRESHOLD};
use crate::sim::{Algorithm, AnySketch, ResultRecord, ResultsLog};
use crate::truth::{DecayingTruth, Truth};

/// Ground truth matched to the sketch's semantics
///
/// The sliding sketch is validated against a window-bounded truth of the
/// same window size; every other variant counts the whole stream.
#[derive(Clone, Debug)]
pub enum TruthCounter {
    /// Whole-stream exact counts
    Exact(Truth),
    /// Counts over the last `window_size` arrivals
    Decaying(DecayingTruth),
}

impl TruthCounter {
    /// Picks the truth flavor for an algorithm and sketch dimensions
    pub fn for_algorithm(algorithm: Algorithm, width: usize, depth: usize) -> Self {
        if algorithm.is_sliding() {
            TruthCounter::Decaying(DecayingTruth::new(width * depth))
        } else {
            TruthCounter::Exact(Truth::new())
        }
    }

    /// Records one occurrence of `item`
    pub fn add(&mut self, item: &str) {
        match self {
            TruthCounter::Exact(truth) => truth.add(item),
            TruthCounter::Decaying(truth) => truth.add(item),
        }
    }

    /// Snapshot of the tracked counts
    pub fn get_all(&self) -> HashMap<String, u64> {
        match self {
            TruthCounter::Exact(truth) => truth.get_all(),
            TruthCounter::Decaying(truth) => truth.get_all(),
        }
    }
}

/// One sketch-versus-truth run over a stream
pub struct Simulation {
    sketch: AnySketch,
    truth: TruthCounter,
    eval_interval: u64,
    log: ResultsLog,
    query_time_threshold: usize,
    /// Update count of the most recent record, if any; guards against a
    /// duplicate final record when the stream length divides the interval
    last_recorded: Option<u64>,
}

impl Simulation {
    /// Builds a simulation for the chosen algorithm and dimensions
    ///
    /// # Errors
    /// Returns `InvalidParameter` for out-of-range dimensions.
    pub fn new(
        algorithm: Algorithm,
        width: usize,
        depth: usize,
        eval_interval: u64,
        log: ResultsLog,
    ) -> Result<Self> {
        let sketch = AnySketch::for_algorithm(algorithm, width, depth)?;
        let truth = TruthCounter::for_algorithm(algorithm, width, depth);
        Ok(Simulation {
            sketch,
            truth,
            eval_interval: eval_interval.max(1),
            log,
            query_time_threshold: DEFAULT_SAMPLE_THRESHOLD,
            last_recorded: None,
        })
    }

    /// Consumes the stream, recording a snapshot every `eval_interval`
    /// updates and once more at exhaustion; returns the total update count
    ///
    /// # Errors
    /// Stream I/O errors, sketch invariant violations, and results-log
    /// failures all terminate the run.
    pub fn run<I>(&mut self, stream: I) -> std::result::Result<u64, SimulationError>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        for item in stream {
            let item = item?;
            self.sketch.add(&item, 1)?;
            self.truth.add(&item);

            if self.sketch.total_count() % self.eval_interval == 0 {
                self.snapshot_and_record()?;
            }
        }
        // Final measurement, unless the last interval boundary already
        // produced it.
        if self.last_recorded != Some(self.sketch.total_count()) {
            self.snapshot_and_record()?;
        }
        info!(
            processed = self.sketch.total_count(),
            "stream exhausted, simulation complete"
        );
        Ok(self.sketch.total_count())
    }

    /// Snapshot the sketch and truth, evaluate, and append one record
    ///
    /// The sketch is deep-copied and the truth reduced to a plain map so the
    /// evaluation sees a consistent view even though it touches every key.
    fn snapshot_and_record(&mut self) -> std::result::Result<(), SimulationError> {
        let processed = self.sketch.total_count();
        let snapshot = self.sketch.clone();
        let truth = self.truth.get_all();

        let Some(accuracy) = evaluate_accuracy(&snapshot, &truth) else {
            warn!(processed, "no items to evaluate, skipping record");
            return Ok(());
        };
        let avg_query_time =
            evaluate_avg_query_time(&snapshot, &truth, self.query_time_threshold);

        let record = ResultRecord::new(
            processed,
            &accuracy,
            avg_query_time,
            snapshot.memory_usage() as f64,
            snapshot.load_factor(),
        );
        self.log.append(&record)?;
        self.last_recorded = Some(processed);

        info!(
            processed,
            avg_error = accuracy.avg_error,
            exact_match_pct = accuracy.exact_match_percentage,
            load_factor = record.load_factor,
            "recorded evaluation snapshot"
        );
        debug!(
            avg_query_time,
            memory_usage = record.memory_usage,
            "snapshot detail"
        );
        Ok(())
    }

    /// The sketch under test
    pub fn sketch(&self) -> &AnySketch {
        &self.sketch
    }

    /// The results log this run appends to
    pub fn log(&self) -> &ResultsLog {
        &self.log
    }
}
