//! Per-delay optimization and the outer delay scan.
//!
//! For a fixed delay the continuous parameters `(N, beta, gamma)` are found
//! by Nelder-Mead from a fixed seed. The outer loop scans integer delays
//! over a closed-open range, keeping the candidate with strictly smaller
//! loss than the running incumbent (which is the delay=0 fit, evaluated
//! first). Candidates are independent, so they are evaluated in parallel;
//! the reduction folds in ascending delay order, which makes the result
//! identical to the sequential scan.

use std::ops::Range;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::fit::loss::delay_loss;
use crate::math::{NelderMeadConfig, nelder_mead};
use crate::model::SirParams;

/// Reference starting point for the continuous search.
pub const DEFAULT_SEED: [f64; 3] = [80_000.0, 1.0, 1.0];

/// Default delay scan range.
pub const DEFAULT_DELAY_RANGE: Range<i32> = -15..15;

/// Best parameters found for one delay (or overall).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub params: SirParams,
    pub delay: i32,
    pub loss: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// One line of the delay scan log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayScanEntry {
    pub delay: i32,
    pub loss: f64,
}

/// Fit `(N, beta, gamma)` for a fixed delay from an explicit seed.
///
/// The search is unbounded; non-physical parameter values may be explored
/// and even returned. Only a non-finite final loss is treated as an error.
pub fn optimize_for_delay(
    infected: &[f64],
    recovered: &[f64],
    delay: i32,
    seed: &[f64; 3],
) -> Result<FitResult, AppError> {
    if infected.is_empty() || infected.len() != recovered.len() {
        return Err(AppError::new(3, "Observed series is empty or misaligned."));
    }

    let objective = |x: &[f64]| delay_loss(x, delay, infected, recovered);
    let result = nelder_mead(objective, seed, &NelderMeadConfig::default());

    if !result.fval.is_finite() {
        return Err(AppError::new(
            5,
            format!("Optimizer produced non-finite loss at delay {delay}."),
        ));
    }

    Ok(FitResult {
        params: SirParams {
            n: result.x[0],
            beta: result.x[1],
            gamma: result.x[2],
        },
        delay,
        loss: result.fval,
        iterations: result.iterations,
        converged: result.converged,
    })
}

/// Fit a single delay from the reference seed.
pub fn fit_for_delay(infected: &[f64], recovered: &[f64], delay: i32) -> Result<FitResult, AppError> {
    optimize_for_delay(infected, recovered, delay, &DEFAULT_SEED)
}

/// Scan the delay range and return the overall best fit plus the scan log.
///
/// Delay 0 is evaluated first as the incumbent; a scanned candidate replaces
/// it only on strictly smaller loss.
pub fn search_best_delay(
    infected: &[f64],
    recovered: &[f64],
    range: Range<i32>,
) -> Result<(FitResult, Vec<DelayScanEntry>), AppError> {
    let mut best = fit_for_delay(infected, recovered, 0)?;

    // Each candidate is a full independent Nelder-Mead run; `collect`
    // preserves the range order, so the fold below sees candidates in
    // ascending delay order exactly like the sequential loop would.
    let candidates: Vec<Result<FitResult, AppError>> = range
        .clone()
        .into_par_iter()
        .map(|delay| fit_for_delay(infected, recovered, delay))
        .collect();

    let mut scan = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let candidate = candidate?;
        scan.push(DelayScanEntry {
            delay: candidate.delay,
            loss: candidate.loss,
        });
        if candidate.loss < best.loss {
            best = candidate;
        }
    }

    Ok((best, scan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::simulate;

    fn clean_series(params: &SirParams, days: usize) -> (Vec<f64>, Vec<f64>) {
        let trace = simulate(params, days);
        (trace.i, trace.r)
    }

    #[test]
    fn single_point_range_returns_that_fit_unchanged() {
        let params = SirParams {
            n: 60_000.0,
            beta: 0.5,
            gamma: 0.2,
        };
        let (infected, recovered) = clean_series(&params, 50);

        let (best, scan) = search_best_delay(&infected, &recovered, 0..1).unwrap();
        let single = fit_for_delay(&infected, &recovered, 0).unwrap();

        assert_eq!(scan.len(), 1);
        assert_eq!(best, single);
    }

    #[test]
    fn optimizer_recovers_known_parameters_from_nearby_seed() {
        let truth = SirParams {
            n: 60_000.0,
            beta: 0.5,
            gamma: 0.2,
        };
        let (infected, recovered) = clean_series(&truth, 80);

        let seed = [55_000.0, 0.45, 0.25];
        let fit = optimize_for_delay(&infected, &recovered, 0, &seed).unwrap();

        // The observed peak is ~14k infected, so the squared-error scale is
        // ~1e6 at the seed; a loss below 1000 means the curves overlap to
        // within a fraction of a percent of the peak.
        let seed_loss = delay_loss(&seed, 0, &infected, &recovered);
        assert!(fit.loss < 1_000.0, "loss = {}", fit.loss);
        assert!(fit.loss < seed_loss / 1_000.0);
        assert!((fit.params.n - truth.n).abs() / truth.n < 0.05);
        assert!((fit.params.beta - truth.beta).abs() < 0.05);
        assert!((fit.params.gamma - truth.gamma).abs() < 0.05);
    }

    #[test]
    fn scan_log_covers_the_whole_range() {
        let params = SirParams {
            n: 40_000.0,
            beta: 0.45,
            gamma: 0.15,
        };
        let (infected, recovered) = clean_series(&params, 40);

        let (_, scan) = search_best_delay(&infected, &recovered, -2..3).unwrap();
        let delays: Vec<i32> = scan.iter().map(|e| e.delay).collect();
        assert_eq!(delays, vec![-2, -1, 0, 1, 2]);
    }

    #[test]
    fn scan_prefers_strictly_smaller_loss() {
        // Observed series generated with a known positive shift; the scan
        // should not end up worse than the zero-delay incumbent.
        let params = SirParams {
            n: 40_000.0,
            beta: 0.45,
            gamma: 0.15,
        };
        let days = 40;
        let shift = 3usize;
        let full = simulate(&params, days + 2 * shift);
        let infected = full.i[2 * shift..2 * shift + days].to_vec();
        let recovered = full.r[2 * shift..2 * shift + days].to_vec();

        let (best, _) = search_best_delay(&infected, &recovered, -5..6).unwrap();
        let incumbent = fit_for_delay(&infected, &recovered, 0).unwrap();
        assert!(best.loss <= incumbent.loss);
    }

    #[test]
    fn empty_series_is_rejected() {
        assert!(fit_for_delay(&[], &[], 0).is_err());
    }
}
