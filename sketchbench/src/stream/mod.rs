//! Stream sources feeding the simulation driver
//!
//! A stream is any `Iterator<Item = io::Result<String>>`; the driver pulls
//! items lazily and terminates on the first error. Producers push back
//! pressure by blocking in `next` or by ending the sequence.

mod dataset;
mod zipf;

pub use dataset::FileTokenStream;
pub use zipf::{ZipfStream, DEFAULT_EXPONENT, DEFAULT_STREAM_SIZE};
