//! Tests for the Count-Mean-Min Sketch
//!
//! Updates match the classic sketch; queries subtract the expected row noise
//! and are clamped into `[0, classic_minimum]`, so the debiasing tightens
//! but never breaks the classic bound.

use proptest::prelude::*;
use sketchbench::frequency::{CountMeanMin, CountMinSketch};
use sketchbench::{FrequencySketch, SketchError};

#[test]
fn test_collision_free_stream_is_exact() {
    let mut cmm = CountMeanMin::new(2000, 4).unwrap();
    for _ in 0..10 {
        cmm.add("apple", 1).unwrap();
    }
    for _ in 0..20 {
        cmm.add("banana", 1).unwrap();
    }
    // Two distinct items in a wide table: the noise term is tiny and the
    // truncated estimate stays within one of the truth.
    let apple = cmm.query("apple");
    assert!((9..=10).contains(&apple), "apple estimate {}", apple);
    let banana = cmm.query("banana");
    assert!((19..=20).contains(&banana), "banana estimate {}", banana);
}

#[test]
fn test_negative_count_rejected() {
    let mut cmm = CountMeanMin::new(100, 3).unwrap();
    assert!(matches!(
        cmm.add("x", -2),
        Err(SketchError::InvalidParameter { .. })
    ));
}

#[test]
fn test_total_count_law() {
    let mut cmm = CountMeanMin::new(100, 3).unwrap();
    for _ in 0..25 {
        cmm.add("a", 1).unwrap();
    }
    assert_eq!(cmm.total_count(), 25);
}

#[test]
fn test_reset_idempotence() {
    let mut cmm = CountMeanMin::new(100, 3).unwrap();
    cmm.add("a", 9).unwrap();
    cmm.reset();
    assert_eq!(cmm.total_count(), 0);
    assert_eq!(cmm.load_factor(), 0.0);
    assert_eq!(cmm.query("a"), 0);
}

proptest! {
    /// The debiased estimate never leaves `[0, classic_estimate]` when both
    /// sketches see the same stream with the same dimensions.
    #[test]
    fn prop_clamped_by_classic_and_zero(
        items in prop::collection::vec(0u32..80, 1..400),
    ) {
        let mut classic = CountMinSketch::new(64, 5).unwrap();
        let mut cmm = CountMeanMin::new(64, 5).unwrap();

        for item in &items {
            let key = item.to_string();
            classic.add(&key, 1).unwrap();
            cmm.add(&key, 1).unwrap();
        }

        for item in &items {
            let key = item.to_string();
            let debiased = cmm.query(&key);
            prop_assert!(debiased >= 0, "item {} went negative: {}", key, debiased);
            prop_assert!(
                debiased <= classic.query(&key),
                "item {}: debiased {} above classic {}",
                key, debiased, classic.query(&key)
            );
        }
    }

    /// Debiasing reduces (or at worst matches) the classic overestimate on
    /// average over a colliding stream.
    #[test]
    fn prop_no_extra_bias(
        items in prop::collection::vec(0u32..40, 50..300),
    ) {
        let mut classic = CountMinSketch::new(16, 4).unwrap();
        let mut cmm = CountMeanMin::new(16, 4).unwrap();

        for item in &items {
            let key = item.to_string();
            classic.add(&key, 1).unwrap();
            cmm.add(&key, 1).unwrap();
        }

        let classic_sum: i64 = items.iter().map(|i| classic.query(&i.to_string())).sum();
        let cmm_sum: i64 = items.iter().map(|i| cmm.query(&i.to_string())).sum();
        prop_assert!(cmm_sum <= classic_sum);
    }
}
