//! Simulation driver: composition of sketch, truth, evaluator, and log

mod algorithm;
mod config;
mod driver;
mod record;

pub use algorithm::{Algorithm, AnySketch};
pub use config::Config;
pub use driver::{Simulation, TruthCounter};
pub use record::{PercentileMap, RecordPercentiles, ResultRecord, ResultsLog};
