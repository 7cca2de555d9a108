//! Delay-parameterized least-squares objective.
//!
//! The simulated trajectory is shifted in time by an integer `delay` before
//! being compared to the observed series. Shifting is realized by padding
//! the simulation with `2*|delay|` extra days and slicing a `days`-long
//! window out of it:
//!
//! - simulate `days + 2*|delay|` days
//! - `lim = |delay| + delay` (0 for non-negative delays, `-2*delay` otherwise)
//! - compare the window `[lim, lim+days)` against the observed series
//!
//! The loss is the sum of squared errors over the infected and recovered
//! compartments, each normalized by the series length. The susceptible
//! compartment is deliberately excluded from the objective; including it
//! would change the fitted parameters.

use crate::model::{SirParams, simulate};

/// Window offset for a given delay: `|delay| + delay`.
pub fn window_offset(delay: i32) -> usize {
    (delay.abs() + delay) as usize
}

/// Loss for a candidate `[N, beta, gamma]` at a fixed integer `delay`.
///
/// Pure: identical inputs always produce the identical loss. No guards
/// against `N` at or below the observed infected count.
pub fn delay_loss(x: &[f64], delay: i32, infected: &[f64], recovered: &[f64]) -> f64 {
    debug_assert_eq!(infected.len(), recovered.len());
    let days = infected.len();
    if days == 0 {
        return 0.0;
    }

    let params = SirParams {
        n: x[0],
        beta: x[1],
        gamma: x[2],
    };
    let trace = simulate(&params, days + 2 * delay.unsigned_abs() as usize);
    let lim = window_offset(delay);

    let sim_i = &trace.i[lim..lim + days];
    let sim_r = &trace.r[lim..lim + days];

    let sse = |sim: &[f64], obs: &[f64]| -> f64 {
        sim.iter()
            .zip(obs.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    };

    sse(sim_i, infected) / days as f64 + sse(sim_r, recovered) / days as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_offset_matches_reference_values() {
        assert_eq!(window_offset(5), 10);
        assert_eq!(window_offset(-5), 0);
        assert_eq!(window_offset(0), 0);
    }

    #[test]
    fn loss_is_deterministic() {
        let infected: Vec<f64> = (0..30).map(|i| (i * i) as f64).collect();
        let recovered: Vec<f64> = (0..30).map(|i| i as f64 * 3.0).collect();
        let x = [80_000.0, 0.4, 0.1];

        let a = delay_loss(&x, 3, &infected, &recovered);
        let b = delay_loss(&x, 3, &infected, &recovered);
        assert_eq!(a, b);
    }

    #[test]
    fn loss_is_zero_on_own_trajectory_at_zero_delay() {
        let params = SirParams {
            n: 50_000.0,
            beta: 0.4,
            gamma: 0.12,
        };
        let trace = simulate(&params, 40);
        let x = [params.n, params.beta, params.gamma];

        let loss = delay_loss(&x, 0, &trace.i, &trace.r);
        assert_eq!(loss, 0.0);
    }

    #[test]
    fn shifted_trajectory_is_recovered_by_matching_delay() {
        // Observed series = model trajectory starting 4 days late.
        let params = SirParams {
            n: 50_000.0,
            beta: 0.4,
            gamma: 0.12,
        };
        let days = 40;
        let shift = 4usize;
        let full = simulate(&params, days + 2 * shift);
        let infected = full.i[2 * shift..2 * shift + days].to_vec();
        let recovered = full.r[2 * shift..2 * shift + days].to_vec();

        let x = [params.n, params.beta, params.gamma];
        let loss_matched = delay_loss(&x, shift as i32, &infected, &recovered);
        let loss_unshifted = delay_loss(&x, 0, &infected, &recovered);
        assert_eq!(loss_matched, 0.0);
        assert!(loss_unshifted > loss_matched);
    }

    #[test]
    fn tolerates_population_below_observed_infected() {
        let infected = vec![1_000.0; 20];
        let recovered = vec![2_000.0; 20];
        let loss = delay_loss(&[500.0, 0.5, 0.1], 0, &infected, &recovered);
        assert!(loss.is_finite());
        assert!(loss > 0.0);
    }
}
