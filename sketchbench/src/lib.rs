//! sketchbench: probabilistic frequency estimation over unbounded streams
//!
//! A family of count-min style sketches — classic, conservative-update,
//! count-mean-min, signed count sketch, and two sliding-window variants —
//! behind one capability trait, plus the harness that drives a sketch
//! alongside an exact ground truth and records periodic accuracy,
//! performance, and memory measurements.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod common;
pub mod eval;
pub mod frequency;
pub mod sim;
pub mod stream;
pub mod streaming;
pub mod truth;

// Re-export core types for convenience
pub use common::{FrequencySketch, Result, SimulationError, SketchError};

/// Error types and result aliases for sketch operations
pub mod error {
    pub use crate::common::{Result, SimulationError, SketchError};
}

// Re-export the sketch family and harness entry points
pub use eval::{evaluate_accuracy, evaluate_avg_query_time, AccuracyReport, Percentiles};
pub use frequency::{ConservativeCountMin, CountMeanMin, CountMinSketch, CountSketch};
pub use sim::{Algorithm, AnySketch, Config, ResultRecord, ResultsLog, Simulation};
pub use stream::{FileTokenStream, ZipfStream};
pub use streaming::{ExpCountMin, SlidingCountMin};
pub use truth::{DecayingTruth, Truth};
