//! Compartmental epidemic model.

pub mod sir;

pub use sir::*;
