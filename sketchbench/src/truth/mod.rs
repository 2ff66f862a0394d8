//! Exact ground-truth counters mirrored alongside the sketches

mod decaying;
mod exact;

pub use decaying::DecayingTruth;
pub use exact::Truth;
