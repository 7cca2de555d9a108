//! SIR model integration.
//!
//! The model partitions an effective population `N` into Susceptible,
//! Infected and Recovered compartments:
//!
//! ```text
//! dS/dt = -beta * S * I / N
//! dI/dt =  beta * S * I / N - gamma * I
//! dR/dt =  gamma * I
//! ```
//!
//! Initial condition is a single index case: `I(0)=1, R(0)=0, S(0)=N-1`.
//! The trace is sampled on a fixed grid of one point per day starting at
//! t=0. Inputs are not validated: the fitter is allowed to probe
//! non-physical parameters and gets back whatever the ODE produces.

use serde::{Deserialize, Serialize};

use crate::math::rk4_step;

/// RK4 sub-steps per day. Eight is enough to match a default-tolerance
/// adaptive integrator far below the least-squares noise floor.
const SUBSTEPS: usize = 8;

/// SIR parameter vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SirParams {
    /// Effective susceptible population.
    pub n: f64,
    /// Transmission rate.
    pub beta: f64,
    /// Recovery rate.
    pub gamma: f64,
}

/// Daily-sampled trajectory: `s`, `i`, `r` all have length `days`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SirTrace {
    pub s: Vec<f64>,
    pub i: Vec<f64>,
    pub r: Vec<f64>,
}

impl SirTrace {
    pub fn len(&self) -> usize {
        self.i.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i.is_empty()
    }
}

/// Integrate the SIR system for `days` daily points starting at t=0.
pub fn simulate(params: &SirParams, days: usize) -> SirTrace {
    let mut trace = SirTrace {
        s: Vec::with_capacity(days),
        i: Vec::with_capacity(days),
        r: Vec::with_capacity(days),
    };
    if days == 0 {
        return trace;
    }

    let SirParams { n, beta, gamma } = *params;
    let deriv = |_t: f64, y: &[f64], dy: &mut [f64]| {
        let (s, i) = (y[0], y[1]);
        let infection = beta * s * i / n;
        dy[0] = -infection;
        dy[1] = infection - gamma * y[1];
        dy[2] = gamma * y[1];
    };

    let mut y = [n - 1.0, 1.0, 0.0];
    trace.s.push(y[0]);
    trace.i.push(y[1]);
    trace.r.push(y[2]);

    let dt = 1.0 / SUBSTEPS as f64;
    for day in 0..days - 1 {
        for sub in 0..SUBSTEPS {
            let t = day as f64 + sub as f64 * dt;
            rk4_step(&mut y, t, dt, deriv);
        }
        trace.s.push(y[0]);
        trace.i.push(y[1]);
        trace.r.push(y[2]);
    }

    trace
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: SirParams = SirParams {
        n: 80_000.0,
        beta: 0.35,
        gamma: 0.1,
    };

    #[test]
    fn trace_starts_from_single_index_case() {
        let trace = simulate(&PARAMS, 10);
        assert_eq!(trace.len(), 10);
        assert_eq!(trace.s[0], PARAMS.n - 1.0);
        assert_eq!(trace.i[0], 1.0);
        assert_eq!(trace.r[0], 0.0);
    }

    #[test]
    fn compartments_conserve_population() {
        let trace = simulate(&PARAMS, 160);
        for idx in 0..trace.len() {
            let total = trace.s[idx] + trace.i[idx] + trace.r[idx];
            assert!(
                (total - PARAMS.n).abs() < 1e-6 * PARAMS.n,
                "index {idx}: S+I+R = {total}"
            );
        }
    }

    #[test]
    fn compartments_stay_non_negative() {
        let trace = simulate(&PARAMS, 160);
        for idx in 0..trace.len() {
            assert!(trace.s[idx] >= 0.0);
            assert!(trace.i[idx] >= 0.0);
            assert!(trace.r[idx] >= 0.0);
        }
    }

    #[test]
    fn epidemic_peaks_and_recedes() {
        let trace = simulate(&PARAMS, 365);
        let peak = trace
            .i
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(peak > 1.0);
        assert!(*trace.i.last().unwrap() < peak);
        // Recovered is monotone non-decreasing.
        for w in trace.r.windows(2) {
            assert!(w[1] >= w[0] - 1e-9);
        }
    }

    #[test]
    fn zero_days_gives_empty_trace() {
        let trace = simulate(&PARAMS, 0);
        assert!(trace.is_empty());
    }
}
