//! Frequency estimation sketches over unbounded streams

mod conservative_count_min;
mod count_mean_min;
mod count_min;
mod count_sketch;

pub use conservative_count_min::ConservativeCountMin;
pub use count_mean_min::CountMeanMin;
pub use count_min::CountMinSketch;
pub use count_sketch::CountSketch;
