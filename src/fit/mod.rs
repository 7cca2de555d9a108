//! SIR parameter fitting.
//!
//! Responsibilities:
//!
//! - map a candidate parameter vector and a day offset to a scalar loss
//! - minimize that loss per offset with Nelder-Mead
//! - scan integer offsets and keep the best fit (parallel, order independent)

pub mod delay;
pub mod loss;

pub use delay::*;
pub use loss::*;
