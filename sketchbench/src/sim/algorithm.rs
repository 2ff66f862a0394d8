//! Algorithm selection and tagged-variant dispatch

use std::fmt;
use std::str::FromStr;

use crate::common::{FrequencySketch, Result, SketchError};
use crate::frequency::{ConservativeCountMin, CountMeanMin, CountMinSketch, CountSketch};
use crate::streaming::SlidingCountMin;

/// Sketch variants the driver can run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// Classic Count-Min Sketch
    CountMinSketch,
    /// Count-Min with conservative updates
    ConservativeCountMinSketch,
    /// Count-Min with noise-corrected queries
    CountMeanMinSketch,
    /// Signed count sketch (fast-AGMS)
    CountSketch,
    /// Sliding-window Count-Min with paired counters
    SlidingCountMinSketch,
}

impl Algorithm {
    /// Every runnable variant, in presentation order
    pub const ALL: [Algorithm; 5] = [
        Algorithm::CountMinSketch,
        Algorithm::ConservativeCountMinSketch,
        Algorithm::CountMeanMinSketch,
        Algorithm::CountSketch,
        Algorithm::SlidingCountMinSketch,
    ];

    /// Public name used on the CLI and in output paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::CountMinSketch => "CountMinSketch",
            Algorithm::ConservativeCountMinSketch => "ConservativeCountMinSketch",
            Algorithm::CountMeanMinSketch => "CountMeanMinSketch",
            Algorithm::CountSketch => "CountSketch",
            Algorithm::SlidingCountMinSketch => "SlidingCountMinSketch",
        }
    }

    /// True when the variant estimates a sliding window rather than the
    /// whole stream; decides which ground truth mirrors it
    pub fn is_sliding(&self) -> bool {
        matches!(self, Algorithm::SlidingCountMinSketch)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = SketchError;

    fn from_str(name: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == name)
            .ok_or_else(|| SketchError::InvalidParameter {
                param: "algorithm".to_string(),
                value: name.to_string(),
                constraint: format!(
                    "must be one of: {}",
                    Algorithm::ALL.map(|a| a.as_str()).join(", ")
                ),
            })
    }
}

/// Tagged union over the runnable sketch variants
///
/// The driver holds one of these and dispatches the shared capability set
/// by matching on the tag; `Clone` is the deep copy used for snapshots.
#[derive(Clone, Debug)]
pub enum AnySketch {
    /// Classic Count-Min Sketch
    CountMin(CountMinSketch),
    /// Conservative-update Count-Min
    Conservative(ConservativeCountMin),
    /// Count-Mean-Min
    CountMeanMin(CountMeanMin),
    /// Signed count sketch
    CountSketch(CountSketch),
    /// Sliding-window Count-Min
    Sliding(SlidingCountMin),
}

impl AnySketch {
    /// Constructs the variant selected by `algorithm` with the given
    /// dimensions
    ///
    /// # Errors
    /// Returns `InvalidParameter` for out-of-range dimensions.
    pub fn for_algorithm(algorithm: Algorithm, width: usize, depth: usize) -> Result<Self> {
        Ok(match algorithm {
            Algorithm::CountMinSketch => AnySketch::CountMin(CountMinSketch::new(width, depth)?),
            Algorithm::ConservativeCountMinSketch => {
                AnySketch::Conservative(ConservativeCountMin::new(width, depth)?)
            }
            Algorithm::CountMeanMinSketch => {
                AnySketch::CountMeanMin(CountMeanMin::new(width, depth)?)
            }
            Algorithm::CountSketch => AnySketch::CountSketch(CountSketch::new(width, depth)?),
            Algorithm::SlidingCountMinSketch => {
                AnySketch::Sliding(SlidingCountMin::new(width, depth)?)
            }
        })
    }

    fn inner(&self) -> &dyn FrequencySketch {
        match self {
            AnySketch::CountMin(sketch) => sketch,
            AnySketch::Conservative(sketch) => sketch,
            AnySketch::CountMeanMin(sketch) => sketch,
            AnySketch::CountSketch(sketch) => sketch,
            AnySketch::Sliding(sketch) => sketch,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn FrequencySketch {
        match self {
            AnySketch::CountMin(sketch) => sketch,
            AnySketch::Conservative(sketch) => sketch,
            AnySketch::CountMeanMin(sketch) => sketch,
            AnySketch::CountSketch(sketch) => sketch,
            AnySketch::Sliding(sketch) => sketch,
        }
    }
}

impl FrequencySketch for AnySketch {
    fn add(&mut self, item: &str, count: i64) -> Result<()> {
        self.inner_mut().add(item, count)
    }

    fn query(&self, item: &str) -> i64 {
        self.inner().query(item)
    }

    fn reset(&mut self) {
        self.inner_mut().reset();
    }

    fn load_factor(&self) -> f64 {
        self.inner().load_factor()
    }

    fn total_count(&self) -> u64 {
        self.inner().total_count()
    }

    fn memory_usage(&self) -> usize {
        self.inner().memory_usage()
    }

    fn width(&self) -> usize {
        self.inner().width()
    }

    fn depth(&self) -> usize {
        self.inner().depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.as_str().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = "BloomFilter".parse::<Algorithm>().unwrap_err();
        assert!(matches!(err, SketchError::InvalidParameter { .. }));
    }

    #[test]
    fn test_construction_dispatch() {
        for algorithm in Algorithm::ALL {
            let mut sketch = AnySketch::for_algorithm(algorithm, 64, 4).unwrap();
            sketch.add("item", 1).unwrap();
            assert!(sketch.query("item") >= 1);
            assert_eq!(sketch.total_count(), 1);
            assert_eq!(sketch.width(), 64);
            assert_eq!(sketch.depth(), 4);
        }
    }

    #[test]
    fn test_only_sliding_is_sliding() {
        assert!(Algorithm::SlidingCountMinSketch.is_sliding());
        assert!(!Algorithm::CountMinSketch.is_sliding());
    }
}
