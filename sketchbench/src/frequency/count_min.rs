//! Count-Min Sketch implementation for frequency estimation
//!
//! Count-Min Sketch (Cormode & Muthukrishnan, 2003) is the standard algorithm
//! for point query frequency estimation. It provides probabilistic guarantees:
//! - Never underestimates (only overestimates)
//! - Error bounded by N/width per row, minimized across `depth` rows
//!
//! # References
//! - Cormode, G., & Muthukrishnan, S. (2003). "An improved data stream summary:
//!   the count-min sketch and its applications"

use crate::common::hash::RowHasher;
use crate::common::{validation, FrequencySketch, Result};

/// Count-Min Sketch for frequency estimation
///
/// A space-efficient probabilistic data structure for estimating item
/// frequencies in a data stream. The estimate is the minimum counter across
/// all rows, so it never falls below the true count.
///
/// # Examples
/// ```
/// use sketchbench::frequency::CountMinSketch;
/// use sketchbench::FrequencySketch;
///
/// let mut cms = CountMinSketch::new(1000, 5).unwrap();
/// cms.add("apple", 2).unwrap();
/// cms.add("banana", 1).unwrap();
///
/// assert!(cms.query("apple") >= 2);
/// assert!(cms.query("banana") >= 1);
/// assert_eq!(cms.total_count(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct CountMinSketch {
    /// Number of counters per row
    width: usize,
    /// Number of rows (independent hash functions)
    depth: usize,
    /// Flat table of counters: depth x width, row-major
    table: Vec<u64>,
    /// Per-row hash family
    hasher: RowHasher,
    /// Sum of all update counts
    total_count: u64,
}

impl CountMinSketch {
    /// Creates a sketch with the given dimensions
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `width` or `depth` is zero or exceeds
    /// the dimension cap.
    pub fn new(width: usize, depth: usize) -> Result<Self> {
        validation::validate_width_depth(width, depth)?;
        Ok(CountMinSketch {
            width,
            depth,
            table: vec![0u64; depth * width],
            hasher: RowHasher::new(width, depth),
            total_count: 0,
        })
    }
}

impl FrequencySketch for CountMinSketch {
    fn add(&mut self, item: &str, count: i64) -> Result<()> {
        let count = validation::validate_unsigned_count(count)?;
        self.total_count += count;
        for (row, col) in self.hasher.indices(item).enumerate() {
            let cell = &mut self.table[row * self.width + col];
            *cell = cell.saturating_add(count);
        }
        Ok(())
    }

    fn query(&self, item: &str) -> i64 {
        self.hasher
            .indices(item)
            .enumerate()
            .map(|(row, col)| self.table[row * self.width + col])
            .min()
            .unwrap_or(0) as i64
    }

    fn reset(&mut self) {
        self.table.fill(0);
        self.total_count = 0;
    }

    fn load_factor(&self) -> f64 {
        let max_nonzero = self
            .table
            .chunks_exact(self.width)
            .map(|row| row.iter().filter(|&&cell| cell > 0).count())
            .max()
            .unwrap_or(0);
        max_nonzero as f64 / self.width as f64
    }

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn memory_usage(&self) -> usize {
        self.depth * self.width * std::mem::size_of::<u64>()
    }

    fn width(&self) -> usize {
        self.width
    }

    fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions() {
        assert!(CountMinSketch::new(0, 5).is_err());
        assert!(CountMinSketch::new(1000, 0).is_err());
    }

    #[test]
    fn test_update_and_query() {
        let mut cms = CountMinSketch::new(1000, 4).unwrap();
        cms.add("test", 1).unwrap();
        assert_eq!(cms.query("test"), 1);
        assert_eq!(cms.query("unseen"), 0);
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut cms = CountMinSketch::new(100, 3).unwrap();
        assert!(cms.add("x", -1).is_err());
        assert_eq!(cms.total_count(), 0);
    }

    #[test]
    fn test_zero_count_is_noop() {
        let mut cms = CountMinSketch::new(100, 3).unwrap();
        cms.add("x", 0).unwrap();
        assert_eq!(cms.query("x"), 0);
        assert_eq!(cms.total_count(), 0);
        assert_eq!(cms.load_factor(), 0.0);
    }

    #[test]
    fn test_memory_usage() {
        let cms = CountMinSketch::new(256, 4).unwrap();
        assert_eq!(cms.memory_usage(), 256 * 4 * 8);
    }
}
