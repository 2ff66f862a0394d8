//! Tests for the signed Count Sketch
//!
//! The count sketch is the one unbiased member of the family: per-row signs
//! make collisions cancel in expectation, updates may be negative, and the
//! estimate itself may go negative.

use proptest::prelude::*;
use sketchbench::frequency::CountSketch;
use sketchbench::FrequencySketch;

#[test]
fn test_single_item_recovered_exactly() {
    let mut cs = CountSketch::new(512, 5).unwrap();
    for _ in 0..42 {
        cs.add("solo", 1).unwrap();
    }
    // With nothing else in the table every row holds sign * 42; the
    // sign-adjusted median is exact.
    assert_eq!(cs.query("solo"), 42);
}

#[test]
fn test_heavy_hitter_in_noise() {
    let mut cs = CountSketch::new(4096, 5).unwrap();
    for _ in 0..100 {
        cs.add("x", 1).unwrap();
    }
    for i in 0..10_000 {
        cs.add(&format!("noise_{}", i), 1).unwrap();
    }

    // L2 noise mass per row is sqrt(10000)/sqrt(4096) < 2; the median over
    // five rows stays far inside this slack.
    let estimate = cs.query("x");
    assert!(
        (estimate - 100).abs() <= 50,
        "estimate {} strays too far from 100",
        estimate
    );
}

#[test]
fn test_deletions_supported() {
    let mut cs = CountSketch::new(256, 5).unwrap();
    cs.add("x", 10).unwrap();
    cs.add("x", -4).unwrap();
    assert_eq!(cs.query("x"), 6);
}

#[test]
fn test_estimate_may_be_negative() {
    let mut cs = CountSketch::new(256, 5).unwrap();
    cs.add("x", -9).unwrap();
    assert_eq!(cs.query("x"), -9);
}

#[test]
fn test_total_count_accumulates_magnitudes() {
    let mut cs = CountSketch::new(64, 3).unwrap();
    cs.add("a", 7).unwrap();
    cs.add("b", -5).unwrap();
    cs.add("c", 0).unwrap();
    assert_eq!(cs.total_count(), 12);
}

#[test]
fn test_reset_idempotence() {
    let mut cs = CountSketch::new(64, 3).unwrap();
    cs.add("a", 3).unwrap();
    cs.reset();
    assert_eq!(cs.total_count(), 0);
    assert_eq!(cs.load_factor(), 0.0);
    assert_eq!(cs.query("a"), 0);
}

proptest! {
    /// Adding then fully removing an item restores a zero estimate.
    #[test]
    fn prop_add_remove_cancels(count in 1i64..1000) {
        let mut cs = CountSketch::new(128, 5).unwrap();
        cs.add("item", count).unwrap();
        cs.add("item", -count).unwrap();
        prop_assert_eq!(cs.query("item"), 0);
    }

    /// A lone item is always recovered exactly, whatever its count.
    #[test]
    fn prop_lone_item_exact(count in -1000i64..1000) {
        let mut cs = CountSketch::new(128, 5).unwrap();
        cs.add("item", count).unwrap();
        prop_assert_eq!(cs.query("item"), count);
    }

    #[test]
    fn prop_load_factor_bounded(
        items in prop::collection::vec(0u32..100, 1..200),
    ) {
        let mut cs = CountSketch::new(32, 3).unwrap();
        for item in &items {
            cs.add(&item.to_string(), 1).unwrap();
        }
        let lf = cs.load_factor();
        prop_assert!((0.0..=1.0).contains(&lf));
    }
}
