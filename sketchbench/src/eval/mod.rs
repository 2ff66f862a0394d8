//! Accuracy, latency, and memory evaluation of sketch snapshots

mod accuracy;
mod query_time;

pub use accuracy::{evaluate_accuracy, AccuracyReport, Percentiles};
pub use query_time::{evaluate_avg_query_time, DEFAULT_SAMPLE_THRESHOLD};
