//! Exponential-bucket Count-Min Sketch for sliding-window estimation
//!
//! Each cell of the counter table holds a small exponential histogram
//! (Datar et al. 2002) over the logical clock `t = total_count`: a list of
//! buckets with power-of-two weights, newest first. Inserting appends an
//! exponent-0 bucket and cascades merges of adjacent equal-exponent buckets,
//! so the list behaves like a binary counter; expiry drops buckets whose
//! span has left the window. A cell's estimate counts every bucket fully
//! except the oldest, which straddles the window boundary and contributes
//! half its weight.
//!
//! The merge rule is derived from the exponential-histogram invariant
//! directly rather than tracking bucket indices, which keeps the cascade a
//! single forward walk over the list.
//!
//! # References
//! - Datar, Gionis, Indyk, Motwani. "Maintaining Stream Statistics over
//!   Sliding Windows" (SODA 2002)

use crate::common::hash::RowHasher;
use crate::common::{validation, FrequencySketch, Result, SketchError};

/// Maximum buckets a cell may hold; the oldest bucket is dropped on overflow
const BUCKET_CAPACITY: usize = 100;

/// One power-of-two bucket: `2^exponent` arrivals spanning `(start, end]`
#[derive(Clone, Debug, PartialEq, Eq)]
struct Bucket {
    exponent: u32,
    start: u64,
    end: u64,
}

/// Exponential histogram for a single cell; buckets ordered newest first
#[derive(Clone, Debug, Default)]
struct Cell {
    buckets: Vec<Bucket>,
}

impl Cell {
    /// Drops buckets that ended at or before `t - window`
    fn expire(&mut self, t: u64, window: u64) {
        let Some(cutoff) = t.checked_sub(window) else {
            return;
        };
        while let Some(oldest) = self.buckets.last() {
            if oldest.end <= cutoff {
                self.buckets.pop();
            } else {
                break;
            }
        }
    }

    /// Records one arrival at time `t` and restores the histogram invariant
    fn insert(&mut self, t: u64) {
        let start = self.buckets.first().map_or(t, |newest| newest.end);
        self.buckets.insert(
            0,
            Bucket {
                exponent: 0,
                start,
                end: t,
            },
        );

        // Cascade: two adjacent buckets of equal exponent merge into one of
        // the next exponent, spanning both. Walking forward from the newest
        // end suffices because only the just-merged pair can re-violate.
        let mut i = 0;
        while i + 1 < self.buckets.len() {
            if self.buckets[i].exponent == self.buckets[i + 1].exponent {
                let newer = self.buckets.remove(i);
                let older = &mut self.buckets[i];
                older.exponent += 1;
                older.end = newer.end;
            } else {
                i += 1;
            }
        }

        if self.buckets.len() > BUCKET_CAPACITY {
            self.buckets.pop();
        }
    }

    /// Window estimate over buckets still alive at `t`: all but the oldest
    /// in full, plus half the oldest
    fn estimate(&self, t: u64, window: u64) -> u64 {
        let cutoff = t.checked_sub(window);
        let live = self
            .buckets
            .iter()
            .filter(|bucket| cutoff.map_or(true, |c| bucket.end > c))
            .collect::<Vec<_>>();
        let Some((oldest, newer)) = live.split_last() else {
            return 0;
        };
        let full: u64 = newer.iter().map(|b| 1u64 << b.exponent.min(63)).sum();
        full + (1u64 << oldest.exponent.min(63)) / 2
    }
}

/// Count-Min Sketch whose cells are exponential histograms
///
/// Estimates item frequency within the last `window_size` arrivals using
/// the sketch's own insertion counter as the clock. Only unit increments
/// are supported.
///
/// # Examples
/// ```
/// use sketchbench::streaming::ExpCountMin;
/// use sketchbench::FrequencySketch;
///
/// let mut ecm = ExpCountMin::new(64, 4, 1000).unwrap();
/// for _ in 0..10 {
///     ecm.add("apple", 1).unwrap();
/// }
/// let estimate = ecm.query("apple");
/// assert!(estimate >= 5 && estimate <= 10);
/// ```
#[derive(Clone, Debug)]
pub struct ExpCountMin {
    width: usize,
    depth: usize,
    window_size: u64,
    /// Cell grid: depth x width, row-major
    cells: Vec<Cell>,
    hasher: RowHasher,
    total_count: u64,
}

impl ExpCountMin {
    /// Creates a sketch with the given dimensions and window length
    ///
    /// # Errors
    /// Returns `InvalidParameter` if a dimension is out of range or the
    /// window is zero.
    pub fn new(width: usize, depth: usize, window_size: u64) -> Result<Self> {
        validation::validate_width_depth(width, depth)?;
        if window_size == 0 {
            return Err(SketchError::InvalidParameter {
                param: "window_size".to_string(),
                value: window_size.to_string(),
                constraint: "must be greater than 0".to_string(),
            });
        }
        Ok(ExpCountMin {
            width,
            depth,
            window_size,
            cells: vec![Cell::default(); depth * width],
            hasher: RowHasher::new(width, depth),
            total_count: 0,
        })
    }

    /// Number of most-recent arrivals a query covers
    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    /// Queries at an explicit logical time, physically removing expired
    /// buckets from the touched cells
    pub fn query_at(&mut self, item: &str, t: u64) -> u64 {
        let mut min_estimate = u64::MAX;
        for (row, col) in self.hasher.indices(item).enumerate() {
            let cell = &mut self.cells[row * self.width + col];
            cell.expire(t, self.window_size);
            min_estimate = min_estimate.min(cell.estimate(t, self.window_size));
        }
        if min_estimate == u64::MAX {
            0
        } else {
            min_estimate
        }
    }
}

impl FrequencySketch for ExpCountMin {
    fn add(&mut self, item: &str, count: i64) -> Result<()> {
        if count != 1 {
            return Err(SketchError::UnsupportedOperation {
                operation: "add".to_string(),
                reason: format!(
                    "exponential-bucket sketch only accepts count=1, got {}",
                    count
                ),
            });
        }
        let t = self.total_count;
        for (row, col) in self.hasher.indices(item).enumerate() {
            let cell = &mut self.cells[row * self.width + col];
            cell.expire(t, self.window_size);
            cell.insert(t);
        }
        self.total_count += 1;
        Ok(())
    }

    fn query(&self, item: &str) -> i64 {
        let t = self.total_count;
        self.hasher
            .indices(item)
            .enumerate()
            .map(|(row, col)| self.cells[row * self.width + col].estimate(t, self.window_size))
            .min()
            .unwrap_or(0) as i64
    }

    fn reset(&mut self) {
        self.cells = vec![Cell::default(); self.depth * self.width];
        self.total_count = 0;
    }

    fn load_factor(&self) -> f64 {
        let max_nonzero = (0..self.depth)
            .map(|row| {
                (0..self.width)
                    .filter(|col| !self.cells[row * self.width + col].buckets.is_empty())
                    .count()
            })
            .max()
            .unwrap_or(0);
        max_nonzero as f64 / self.width as f64
    }

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn memory_usage(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| cell.buckets.len() * std::mem::size_of::<Bucket>())
            .sum()
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

    fn exponents(cell: &Cell) -> Vec<u32> {
        cell.buckets.iter().map(|b| b.exponent).collect()
    }

    #[test]
    fn test_cell_behaves_like_binary_counter() {
        let mut cell = Cell::default();
        for t in 0..50 {
            cell.insert(t);
        }
        // 50 = 0b110010: one bucket per set bit, exponents increasing
        // toward the oldest end.
        assert_eq!(exponents(&cell), vec![1, 4, 5]);
    }

    #[test]
    fn test_cell_estimate_halves_oldest() {
        let mut cell = Cell::default();
        for t in 0..50 {
            cell.insert(t);
        }
        // 2 + 16 in full, plus 32/2 for the straddling bucket.
        assert_eq!(cell.estimate(50, 1000), 34);
    }

    #[test]
    fn test_cell_expiry_drops_old_buckets() {
        let mut cell = Cell::default();
        for t in 0..8 {
            cell.insert(t);
        }
        // One exponent-3 bucket ending at t=7; it expires once the window
        // has moved past it.
        cell.expire(100, 10);
        assert!(cell.buckets.is_empty());
        assert_eq!(cell.estimate(100, 10), 0);
    }

    #[test]
    fn test_bulk_count_unsupported() {
        let mut ecm = ExpCountMin::new(16, 2, 100).unwrap();
        let err = ecm.add("x", 2).unwrap_err();
        assert!(matches!(err, SketchError::UnsupportedOperation { .. }));
        assert!(ecm.add("x", 0).is_err());
    }

    #[test]
    fn test_single_item_estimate_within_factor_two() {
        let mut ecm = ExpCountMin::new(64, 4, 1_000).unwrap();
        for _ in 0..50 {
            ecm.add("hot", 1).unwrap();
        }
        let estimate = ecm.query("hot");
        assert!(estimate >= 25, "estimate {} below half the count", estimate);
        assert!(estimate <= 50, "estimate {} above the true count", estimate);
    }

    #[test]
    fn test_estimate_bounded_by_window() {
        let mut ecm = ExpCountMin::new(16, 2, 8).unwrap();
        for _ in 0..200 {
            ecm.add("hot", 1).unwrap();
        }
        // Live buckets cover at most the window plus the straddling bucket;
        // with window 8 the estimate cannot stay near 200.
        assert!(ecm.query("hot") <= 16);
        assert_eq!(ecm.total_count(), 200);
    }

    #[test]
    fn test_unseen_item_zero() {
        let mut ecm = ExpCountMin::new(1024, 4, 100).unwrap();
        ecm.add("present", 1).unwrap();
        assert_eq!(ecm.query("absent"), 0);
        assert_eq!(ecm.query_at("absent", 50), 0);
    }
}
