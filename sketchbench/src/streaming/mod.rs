//! Sliding-window frequency sketches
//!
//! Time-decaying variants of the count-min family where only the most
//! recent arrivals contribute to a query.
//!
//! - [`SlidingCountMin`]: paired-counter rotation, window fixed at
//!   `width * depth` insertions
//! - [`ExpCountMin`]: per-cell exponential histograms with a configurable
//!   window

mod exp_count_min;
mod sliding_count_min;

pub use exp_count_min::ExpCountMin;
pub use sliding_count_min::SlidingCountMin;
