//! Synthetic Zipf-distributed item stream

use std::io;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Zipf};

use crate::common::{Result, SketchError};

/// Default number of items the synthetic stream produces
pub const DEFAULT_STREAM_SIZE: usize = 500_000;
/// Default Zipf exponent
pub const DEFAULT_EXPONENT: f64 = 1.3;
/// Universe the ranks are drawn from; stands in for the unbounded support
/// of a pure Zipf law
const UNIVERSE: f64 = 1_000_000.0;

/// Finite stream of Zipf-distributed integer tokens
///
/// Models a skewed real-time feed: a handful of heavy hitters and a long
/// tail, yielded one item at a time with an optional inter-item delay.
/// Items are rendered to their decimal text form, the canonical shape the
/// sketches hash.
///
/// # Examples
/// ```
/// use sketchbench::stream::ZipfStream;
/// use std::time::Duration;
///
/// let stream = ZipfStream::with_seed(100, 1.3, Duration::ZERO, 42).unwrap();
/// let items: Vec<String> = stream.map(|item| item.unwrap()).collect();
/// assert_eq!(items.len(), 100);
/// ```
#[derive(Debug)]
pub struct ZipfStream {
    remaining: usize,
    sleep_time: Duration,
    dist: Zipf<f64>,
    rng: StdRng,
}

impl ZipfStream {
    /// Creates a stream of `stream_size` items with the given exponent
    ///
    /// # Errors
    /// Returns `InvalidParameter` when the exponent is not a positive finite
    /// number.
    pub fn new(stream_size: usize, exponent: f64, sleep_time: Duration) -> Result<Self> {
        Self::build(stream_size, exponent, sleep_time, StdRng::from_os_rng())
    }

    /// Deterministic variant for tests and reproducible runs
    pub fn with_seed(
        stream_size: usize,
        exponent: f64,
        sleep_time: Duration,
        seed: u64,
    ) -> Result<Self> {
        Self::build(stream_size, exponent, sleep_time, StdRng::seed_from_u64(seed))
    }

    fn build(
        stream_size: usize,
        exponent: f64,
        sleep_time: Duration,
        rng: StdRng,
    ) -> Result<Self> {
        let dist = Zipf::new(UNIVERSE, exponent).map_err(|_| SketchError::InvalidParameter {
            param: "exponent".to_string(),
            value: exponent.to_string(),
            constraint: "must be a positive finite Zipf exponent".to_string(),
        })?;
        Ok(ZipfStream {
            remaining: stream_size,
            sleep_time,
            dist,
            rng,
        })
    }
}

impl Iterator for ZipfStream {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        if !self.sleep_time.is_zero() {
            thread::sleep(self.sleep_time);
        }
        let rank = self.dist.sample(&mut self.rng) as u64;
        Some(Ok(rank.to_string()))
    }
}
