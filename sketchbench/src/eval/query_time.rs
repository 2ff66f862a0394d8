//! Wall-clock benchmark of a sketch's query path

use std::collections::HashMap;
use std::time::Instant;

use rand::seq::index;

use crate::common::FrequencySketch;

/// Working-set size above which keys are sampled instead of enumerated
pub const DEFAULT_SAMPLE_THRESHOLD: usize = 100_000;

/// Average seconds per `query` over the ground-truth keys
///
/// Large working sets are sampled uniformly without replacement at
/// `threshold` keys so the benchmark's own cost stays bounded. Returns 0.0
/// when the truth is empty.
pub fn evaluate_avg_query_time<S: FrequencySketch>(
    sketch: &S,
    ground_truth: &HashMap<String, u64>,
    threshold: usize,
) -> f64 {
    if ground_truth.is_empty() {
        return 0.0;
    }

    let keys: Vec<&String> = ground_truth.keys().collect();
    let sample: Vec<&String> = if keys.len() > threshold {
        let mut rng = rand::rng();
        index::sample(&mut rng, keys.len(), threshold)
            .iter()
            .map(|i| keys[i])
            .collect()
    } else {
        keys
    };

    let start = Instant::now();
    for item in &sample {
        std::hint::black_box(sketch.query(item));
    }
    start.elapsed().as_secs_f64() / sample.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::CountMinSketch;

    #[test]
    fn test_empty_truth_yields_zero() {
        let cms = CountMinSketch::new(64, 3).unwrap();
        assert_eq!(evaluate_avg_query_time(&cms, &HashMap::new(), 100), 0.0);
    }

    #[test]
    fn test_nonzero_for_populated_truth() {
        let mut cms = CountMinSketch::new(64, 3).unwrap();
        let mut truth = HashMap::new();
        for i in 0..50 {
            let item = i.to_string();
            cms.add(&item, 1).unwrap();
            truth.insert(item, 1);
        }
        let avg = evaluate_avg_query_time(&cms, &truth, 100);
        assert!(avg >= 0.0);
        assert!(avg < 1.0, "implausible per-query time {}", avg);
    }

    #[test]
    fn test_sampling_path() {
        let cms = CountMinSketch::new(64, 3).unwrap();
        let truth: HashMap<String, u64> = (0..200).map(|i| (i.to_string(), 1)).collect();
        // Threshold below the key count exercises the sampled branch.
        let avg = evaluate_avg_query_time(&cms, &truth, 10);
        assert!(avg >= 0.0);
    }
}
