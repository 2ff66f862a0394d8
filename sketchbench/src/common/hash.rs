//! Row hashing for the sketch family
//!
//! Every sketch variant needs `depth` hash functions that map an item to a
//! column in `[0, width)`, and the count sketch additionally needs a per-row
//! sign in `{-1, +1}`. Items are hashed through their canonical text form;
//! row independence comes from appending a per-row tag to the item bytes
//! before digesting, so all rows share one digest function (`XxHash64`) and a
//! single sketch stays self-consistent.

use std::hash::Hasher;
use twox_hash::XxHash64;

/// Fixed digest seed; hashing must be stable across a process run.
const DIGEST_SEED: u64 = 0;

/// Per-sketch family of row hash functions
///
/// Constructed once per sketch with the sketch's dimensions. Row tags are
/// precomputed so the hot path only writes item bytes plus a short suffix.
///
/// # Examples
/// ```
/// use sketchbench::common::hash::RowHasher;
///
/// let hasher = RowHasher::new(1000, 5);
/// let cols: Vec<usize> = hasher.indices("apple").collect();
/// assert_eq!(cols.len(), 5);
/// assert!(cols.iter().all(|&c| c < 1000));
/// ```
#[derive(Clone, Debug)]
pub struct RowHasher {
    width: usize,
    index_tags: Vec<String>,
    sign_tags: Vec<String>,
}

impl RowHasher {
    /// Creates a hash family for a `depth x width` counter table
    pub fn new(width: usize, depth: usize) -> Self {
        let index_tags = (0..depth).map(|row| row.to_string()).collect();
        let sign_tags = (0..depth).map(|row| format!("_sign{}", row)).collect();
        RowHasher {
            width,
            index_tags,
            sign_tags,
        }
    }

    fn digest(item: &str, tag: &str) -> u64 {
        let mut hasher = XxHash64::with_seed(DIGEST_SEED);
        hasher.write(item.as_bytes());
        hasher.write(tag.as_bytes());
        hasher.finish()
    }

    /// Column for `item` in the given row, in `[0, width)`
    #[inline]
    pub fn index(&self, item: &str, row: usize) -> usize {
        (Self::digest(item, &self.index_tags[row]) % self.width as u64) as usize
    }

    /// Sign for `item` in the given row: low digest bit 0 maps to +1, 1 to -1
    #[inline]
    pub fn sign(&self, item: &str, row: usize) -> i64 {
        if Self::digest(item, &self.sign_tags[row]) & 1 == 0 {
            1
        } else {
            -1
        }
    }

    /// Per-row columns for `item`, one per row
    pub fn indices<'a>(&'a self, item: &'a str) -> impl Iterator<Item = usize> + 'a {
        (0..self.depth()).map(move |row| self.index(item, row))
    }

    /// Per-row signs for `item`, one per row
    pub fn signs<'a>(&'a self, item: &'a str) -> impl Iterator<Item = i64> + 'a {
        (0..self.depth()).map(move |row| self.sign(item, row))
    }

    /// Number of counters per row
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn depth(&self) -> usize {
        self.index_tags.len()
    }
}
