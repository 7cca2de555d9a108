//! Numerical building blocks: ODE integration and derivative-free minimization.

pub mod nelder;
pub mod rk4;

pub use nelder::*;
pub use rk4::*;
