//! Count Sketch (fast-AGMS) for unbiased frequency estimation
//!
//! Count Sketch (Charikar, Chen, Farach-Colton, 2002) is a linear sketch
//! whose estimator is **unbiased**: each row adds `sign(x) * count` to one
//! cell, and the query returns the median of the sign-adjusted cells. Unlike
//! the count-min family it accepts signed updates, stores signed counters,
//! and may return a negative estimate; consumers clamp if they need
//! non-negativity.
//!
//! # References
//! - Charikar, M., Chen, K., & Farach-Colton, M. (2002).
//!   "Finding Frequent Items in Data Streams"

use crate::common::hash::RowHasher;
use crate::common::{validation, FrequencySketch, Result};

/// Count Sketch for unbiased frequency estimation
///
/// `total_count` accumulates the magnitude `|count|` of every update, so it
/// still measures stream volume when deletions are mixed in.
///
/// # Examples
/// ```
/// use sketchbench::frequency::CountSketch;
/// use sketchbench::FrequencySketch;
///
/// let mut cs = CountSketch::new(1024, 5).unwrap();
/// cs.add("apple", 5).unwrap();
/// cs.add("apple", -2).unwrap();
/// assert_eq!(cs.query("apple"), 3);
/// ```
#[derive(Clone, Debug)]
pub struct CountSketch {
    width: usize,
    depth: usize,
    /// Flat table of signed counters: depth x width, row-major
    table: Vec<i64>,
    hasher: RowHasher,
    total_count: u64,
}

impl CountSketch {
    /// Creates a sketch with the given dimensions
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `width` or `depth` is zero or exceeds
    /// the dimension cap.
    pub fn new(width: usize, depth: usize) -> Result<Self> {
        validation::validate_width_depth(width, depth)?;
        Ok(CountSketch {
            width,
            depth,
            table: vec![0i64; depth * width],
            hasher: RowHasher::new(width, depth),
            total_count: 0,
        })
    }
}

/// Median of signed row estimates, truncated toward zero for even depths
fn integer_median(values: &mut [i64]) -> i64 {
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        ((values[mid - 1] + values[mid]) as f64 / 2.0) as i64
    }
}

impl FrequencySketch for CountSketch {
    fn add(&mut self, item: &str, count: i64) -> Result<()> {
        self.total_count += count.unsigned_abs();
        for (row, col) in self.hasher.indices(item).enumerate() {
            let sign = self.hasher.sign(item, row);
            self.table[row * self.width + col] += sign * count;
        }
        Ok(())
    }

    fn query(&self, item: &str) -> i64 {
        let mut estimates: Vec<i64> = self
            .hasher
            .indices(item)
            .enumerate()
            .map(|(row, col)| self.hasher.sign(item, row) * self.table[row * self.width + col])
            .collect();
        if estimates.is_empty() {
            return 0;
        }
        integer_median(&mut estimates)
    }

    fn reset(&mut self) {
        self.table.fill(0);
        self.total_count = 0;
    }

    fn load_factor(&self) -> f64 {
        let max_nonzero = self
            .table
            .chunks_exact(self.width)
            .map(|row| row.iter().filter(|&&cell| cell != 0).count())
            .max()
            .unwrap_or(0);
        max_nonzero as f64 / self.width as f64
    }

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn memory_usage(&self) -> usize {
        self.depth * self.width * std::mem::size_of::<i64>()
    }

    fn width(&self) -> usize {
        self.width
    }

    fn depth(&self) -> usize {
        self.depth
    }
}
