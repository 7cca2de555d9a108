//! Chart rendering.
//!
//! Each chart family is rendered twice from the same series description:
//! once to PNG (raster) and once to SVG (vector).

pub mod charts;

pub use charts::*;
