//! Observed-data acquisition: remote download with a local cache, plus a
//! deterministic synthetic sample generator for offline runs.

pub mod fetch;
pub mod sample;

pub use fetch::*;
pub use sample::*;
