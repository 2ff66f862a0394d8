//! Conservative Update Count-Min Sketch (Estan & Varghese 2002)
//!
//! A modification of Count-Min Sketch that improves accuracy by only raising
//! counters to the minimum value consistent with the update.
//!
//! # Algorithm
//!
//! Standard CM sketch increments all `depth` hashed positions by `count`.
//! Conservative update sets each hashed cell to
//! `max(current_value, row_minimum + count)`, so cells already inflated by
//! collisions are left alone.
//!
//! The cell rule matches the canonical conservative update exactly for unit
//! increments; callers should prefer `count == 1`.
//!
//! # Trade-offs
//!
//! | Aspect | Standard CM | Conservative CM |
//! |--------|-------------|-----------------|
//! | Accuracy | Baseline | Less overestimation |
//! | Deletions | Not supported | Not supported |
//! | Upper bound | Preserved | Preserved |
//!
//! # References
//!
//! - Estan & Varghese "New Directions in Traffic Measurement and Accounting"
//!   (SIGCOMM 2002)

use crate::common::hash::RowHasher;
use crate::common::{validation, FrequencySketch, Result};

/// Conservative Update Count-Min Sketch
///
/// Provides improved accuracy over standard Count-Min Sketch while keeping
/// the no-underestimation guarantee: for the same stream and dimensions, no
/// cell ever exceeds what the classic sketch would hold.
///
/// # Examples
/// ```
/// use sketchbench::frequency::ConservativeCountMin;
/// use sketchbench::FrequencySketch;
///
/// let mut cms = ConservativeCountMin::new(1000, 5).unwrap();
/// cms.add("hello", 1).unwrap();
/// assert!(cms.query("hello") >= 1);
/// ```
#[derive(Clone, Debug)]
pub struct ConservativeCountMin {
    width: usize,
    depth: usize,
    /// Flat table of counters: depth x width, row-major
    table: Vec<u64>,
    hasher: RowHasher,
    total_count: u64,
}

impl ConservativeCountMin {
    /// Creates a sketch with the given dimensions
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `width` or `depth` is zero or exceeds
    /// the dimension cap.
    pub fn new(width: usize, depth: usize) -> Result<Self> {
        validation::validate_width_depth(width, depth)?;
        Ok(ConservativeCountMin {
            width,
            depth,
            table: vec![0u64; depth * width],
            hasher: RowHasher::new(width, depth),
            total_count: 0,
        })
    }
}

impl FrequencySketch for ConservativeCountMin {
    fn add(&mut self, item: &str, count: i64) -> Result<()> {
        let count = validation::validate_unsigned_count(count)?;
        self.total_count += count;

        // First pass: current minimum across the hashed cells.
        let indices: Vec<usize> = self.hasher.indices(item).collect();
        let current_min = indices
            .iter()
            .enumerate()
            .map(|(row, &col)| self.table[row * self.width + col])
            .min()
            .unwrap_or(0);

        // Second pass: raise each cell to at least min + count.
        let new_value = current_min.saturating_add(count);
        for (row, &col) in indices.iter().enumerate() {
            let cell = &mut self.table[row * self.width + col];
            if *cell < new_value {
                *cell = new_value;
            }
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
    fn test_update_and_query() {
        let mut cms = ConservativeCountMin::new(100, 4).unwrap();
        cms.add("apple", 1).unwrap();
        cms.add("apple", 1).unwrap();
        cms.add("banana", 1).unwrap();

        assert!(cms.query("apple") >= 2);
        assert!(cms.query("banana") >= 1);
        assert_eq!(cms.query("cherry"), 0);
        assert_eq!(cms.total_count(), 3);
    }

    #[test]
    fn test_bulk_count() {
        let mut cms = ConservativeCountMin::new(100, 4).unwrap();
        cms.add("apple", 5).unwrap();
        assert!(cms.query("apple") >= 5);
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut cms = ConservativeCountMin::new(100, 4).unwrap();
        assert!(cms.add("apple", -3).is_err());
    }

    #[test]
    fn test_conservative_keeps_estimates_low() {
        let mut cms = ConservativeCountMin::new(100, 5).unwrap();
        for _ in 0..100 {
            cms.add("frequent", 1).unwrap();
        }
        for i in 0..1000 {
            cms.add(&format!("item_{}", i), 1).unwrap();
        }

        let estimate = cms.query("frequent");
        assert!(estimate >= 100, "estimate {} should be >= 100", estimate);
        assert!(
            estimate < 200,
            "estimate {} should stay below 200 with conservative updates",
            estimate
        );
    }
}
