//! Formatted terminal output.

pub mod format;

pub use format::*;
