//! Sliding-window Count-Min Sketch with paired counters
//!
//! Every cell carries an `(active, backup)` pair. A flat scan pointer walks
//! the table one cell per insertion; sweeping a cell demotes its active
//! counter to backup and zeroes the active field. Since the table holds
//! `width * depth` cells and the pointer advances once per insertion, each
//! cell is swept exactly once per `width * depth` insertions, so
//! `active + backup` covers the last `window_size = width * depth` arrivals
//! with amortized expiry and no timestamps.
//!
//! # References
//! - Zhou et al. "Persistent Sketches for Sliding-Window Frequency
//!   Estimation" — the two-field rotation scheme

use crate::common::hash::RowHasher;
use crate::common::{validation, FrequencySketch, Result};

/// Cells swept per arrival
const SCAN_STEP: usize = 1;

/// Sliding-window Count-Min Sketch
///
/// The window size equals the slot count `width * depth`; only the most
/// recent `window_size` insertions contribute to a query.
///
/// # Examples
/// ```
/// use sketchbench::streaming::SlidingCountMin;
/// use sketchbench::FrequencySketch;
///
/// let mut sliding = SlidingCountMin::new(10, 2).unwrap();
/// assert_eq!(sliding.window_size(), 20);
/// sliding.add("apple", 1).unwrap();
/// assert!(sliding.query("apple") >= 1);
/// ```
#[derive(Clone, Debug)]
pub struct SlidingCountMin {
    width: usize,
    depth: usize,
    /// Live counters: depth x width, row-major
    active: Vec<u64>,
    /// Previous sweep's counters, same layout
    backup: Vec<u64>,
    /// Flat position of the next cell to sweep, in `[0, width * depth)`
    scan_pointer: usize,
    hasher: RowHasher,
    total_count: u64,
}

impl SlidingCountMin {
    /// Creates a sketch with the given dimensions; the window size is
    /// `width * depth`
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `width` or `depth` is zero or exceeds
    /// the dimension cap.
    pub fn new(width: usize, depth: usize) -> Result<Self> {
        validation::validate_width_depth(width, depth)?;
        Ok(SlidingCountMin {
            width,
            depth,
            active: vec![0u64; depth * width],
            backup: vec![0u64; depth * width],
            scan_pointer: 0,
            hasher: RowHasher::new(width, depth),
            total_count: 0,
        })
    }

    /// Number of most-recent insertions a query covers
    pub fn window_size(&self) -> usize {
        self.width * self.depth
    }

    /// Demote the next `SCAN_STEP` cells and advance the pointer
    fn scan_step(&mut self) {
        let total_slots = self.window_size();
        for _ in 0..SCAN_STEP {
            let slot = self.scan_pointer;
            self.backup[slot] = self.active[slot];
            self.active[slot] = 0;
            self.scan_pointer = (slot + 1) % total_slots;
        }
    }
}

impl FrequencySketch for SlidingCountMin {
    fn add(&mut self, item: &str, count: i64) -> Result<()> {
        let count = validation::validate_unsigned_count(count)?;
        for _ in 0..count {
            // The sweep runs before the increment so a cell never expires
            // the insertion that is being recorded.
            self.scan_step();
            for (row, col) in self.hasher.indices(item).enumerate() {
                let cell = &mut self.active[row * self.width + col];
                *cell = cell.saturating_add(1);
            }
            self.total_count += 1;
        }
        Ok(())
    }

    fn query(&self, item: &str) -> i64 {
        self.hasher
            .indices(item)
            .enumerate()
            .map(|(row, col)| {
                let slot = row * self.width + col;
                self.active[slot] + self.backup[slot]
            })
            .min()
            .unwrap_or(0) as i64
    }

    fn reset(&mut self) {
        self.active.fill(0);
        self.backup.fill(0);
        self.scan_pointer = 0;
        self.total_count = 0;
    }

    fn load_factor(&self) -> f64 {
        let max_nonzero = (0..self.depth)
            .map(|row| {
                (0..self.width)
                    .filter(|col| {
                        let slot = row * self.width + col;
                        self.active[slot] != 0 || self.backup[slot] != 0
                    })
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
        // Two u64 fields per cell.
        self.depth * self.width * 2 * std::mem::size_of::<u64>()
    }

    fn width(&self) -> usize {
        self.width
    }

    fn depth(&self) -> usize {
        self.depth
    }
}
