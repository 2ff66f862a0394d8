//! Driver configuration file

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::SimulationError;

fn default_width() -> usize {
    1000
}

fn default_depth() -> usize {
    5
}

fn default_eval_interval() -> u64 {
    10_000
}

fn default_vis_interval() -> u64 {
    50_000
}

fn default_dataset_name() -> String {
    "synthetic".to_string()
}

fn default_sleep_time() -> f64 {
    0.0
}

/// Run parameters loaded from a JSON config file
///
/// Every key is optional; missing keys fall back to the defaults below so a
/// partial config stays valid. CLI flags override the loaded values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Counters per sketch row
    #[serde(default = "default_width")]
    pub width: usize,
    /// Sketch rows
    #[serde(default = "default_depth")]
    pub depth: usize,
    /// Updates between evaluation snapshots
    #[serde(default = "default_eval_interval")]
    pub eval_interval: u64,
    /// Updates between visualization checkpoints; consumed by the external
    /// plot generator, not by the driver itself
    #[serde(default = "default_vis_interval")]
    pub vis_interval: u64,
    /// Stream to run: `synthetic` or a dataset file name
    #[serde(default = "default_dataset_name")]
    pub dataset_name: String,
    /// CSV column to stream; only used by file-backed datasets
    #[serde(default)]
    pub field: Option<String>,
    /// Inter-item delay in seconds
    #[serde(default = "default_sleep_time")]
    pub sleep_time: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: default_width(),
            depth: default_depth(),
            eval_interval: default_eval_interval(),
            vis_interval: default_vis_interval(),
            dataset_name: default_dataset_name(),
            field: None,
            sleep_time: default_sleep_time(),
        }
    }
}

impl Config {
    /// Loads a config from a JSON file
    ///
    /// # Errors
    /// Propagates file I/O failures and malformed JSON.
    pub fn load(path: &Path) -> Result<Self, SimulationError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.width, 1000);
        assert_eq!(config.depth, 5);
        assert_eq!(config.dataset_name, "synthetic");
        assert!(config.field.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"width": 64}"#).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.depth, 5);
        assert_eq!(config.eval_interval, 10_000);
    }

    #[test]
    fn test_full_json() {
        let config: Config = serde_json::from_str(
            r#"{
                "width": 128,
                "depth": 3,
                "eval_interval": 500,
                "vis_interval": 1000,
                "dataset_name": "reviews.csv",
                "field": "text",
                "sleep_time": 0.01
            }"#,
        )
        .unwrap();
        assert_eq!(config.dataset_name, "reviews.csv");
        assert_eq!(config.field.as_deref(), Some("text"));
        assert_eq!(config.sleep_time, 0.01);
    }
}
