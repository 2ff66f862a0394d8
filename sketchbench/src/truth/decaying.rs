//! Sliding-window frequency oracle for evaluation

use std::collections::{HashMap, VecDeque};

/// Exact item counts within the last `window_size` arrivals
///
/// An insertion-ordered queue remembers the arrivals; on overflow the oldest
/// item is evicted and its count decremented. Keys whose count reaches zero
/// are removed from the map entirely, so snapshots never report stale zeros.
/// Mirrors the semantics of the sliding-window sketch it validates.
///
/// # Examples
/// ```
/// use sketchbench::truth::DecayingTruth;
///
/// let mut truth = DecayingTruth::new(2);
/// truth.add("a");
/// truth.add("b");
/// truth.add("c"); // evicts "a"
/// assert_eq!(truth.query("a"), 0);
/// assert_eq!(truth.query("c"), 1);
/// ```
#[derive(Clone, Debug)]
pub struct DecayingTruth {
    window_size: usize,
    arrivals: VecDeque<String>,
    counts: HashMap<String, u64>,
}

impl DecayingTruth {
    /// Creates a counter covering the last `window_size` arrivals
    pub fn new(window_size: usize) -> Self {
        DecayingTruth {
            window_size,
            arrivals: VecDeque::with_capacity(window_size),
            counts: HashMap::new(),
        }
    }

    /// Records one occurrence of `item`, evicting the oldest arrival when
    /// the window overflows
    pub fn add(&mut self, item: &str) {
        self.arrivals.push_back(item.to_string());
        *self.counts.entry(item.to_string()).or_insert(0) += 1;

        if self.arrivals.len() > self.window_size {
            if let Some(evicted) = self.arrivals.pop_front() {
                if let Some(count) = self.counts.get_mut(&evicted) {
                    *count -= 1;
                    if *count == 0 {
                        self.counts.remove(&evicted);
                    }
                }
            }
        }
    }

    /// In-window count of `item`; 0 for unknown keys
    pub fn query(&self, item: &str) -> u64 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    /// Snapshot of every in-window count
    pub fn get_all(&self) -> HashMap<String, u64> {
        self.counts.clone()
    }

    /// The `k` most frequent in-window items, descending
    pub fn top_k(&self, k: usize) -> Vec<(String, u64)> {
        let mut items: Vec<(String, u64)> = self
            .counts
            .iter()
            .map(|(item, &count)| (item.clone(), count))
            .collect();
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        items.truncate(k);
        items
    }

    /// Window capacity in arrivals
    pub fn window_size(&self) -> usize {
        self.window_size
    }
}
