//! Nelder-Mead simplex minimization.
//!
//! The SIR objective is cheap to evaluate but has no useful analytic
//! gradient (it runs an ODE integration per call), so a derivative-free
//! direct search is the right tool. Parameters are deliberately unbounded:
//! the search may wander through non-physical values (negative N, beta,
//! gamma) and that is accepted behavior, not clamped away.
//!
//! Tolerances and the initial-simplex construction follow the common
//! convention (5% perturbation per coordinate, absolute tolerances of 1e-4
//! on both simplex spread and function spread, iteration cap of 200·n).

/// Stopping criteria and iteration cap.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum iterations; defaults to `200 * n` when `None`.
    pub max_iter: Option<usize>,
    /// Absolute tolerance on the simplex coordinate spread.
    pub xatol: f64,
    /// Absolute tolerance on the function value spread.
    pub fatol: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: None,
            xatol: 1e-4,
            fatol: 1e-4,
        }
    }
}

/// Result of one minimization run.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    pub x: Vec<f64>,
    pub fval: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Minimize `f` starting from `x0`.
pub fn nelder_mead<F>(mut f: F, x0: &[f64], config: &NelderMeadConfig) -> NelderMeadResult
where
    F: FnMut(&[f64]) -> f64,
{
    let n = x0.len();
    assert!(n > 0, "empty parameter vector");

    let max_iter = config.max_iter.unwrap_or(200 * n);

    // Standard coefficients: reflection, expansion, contraction, shrink.
    let alpha = 1.0;
    let gamma = 2.0;
    let rho = 0.5;
    let sigma = 0.5;

    // Initial simplex: x0 plus one vertex per coordinate, perturbed by 5%
    // (or a small absolute step when the coordinate is zero).
    let nonzdelt = 0.05;
    let zdelt = 0.00025;

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(x0.to_vec());
    for k in 0..n {
        let mut v = x0.to_vec();
        if v[k] != 0.0 {
            v[k] *= 1.0 + nonzdelt;
        } else {
            v[k] = zdelt;
        }
        simplex.push(v);
    }

    let mut fvals: Vec<f64> = simplex.iter().map(|v| f(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iter {
        sort_simplex(&mut simplex, &mut fvals);

        if spread_within(&simplex, &fvals, config.xatol, config.fatol) {
            converged = true;
            break;
        }
        iterations += 1;

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; n];
        for v in &simplex[..n] {
            for (c, x) in centroid.iter_mut().zip(v.iter()) {
                *c += x;
            }
        }
        for c in centroid.iter_mut() {
            *c /= n as f64;
        }

        let worst = simplex[n].clone();
        let f_best = fvals[0];
        let f_second_worst = fvals[n - 1];
        let f_worst = fvals[n];

        let reflected = affine(&centroid, &worst, -alpha);
        let f_reflected = f(&reflected);

        if f_reflected < f_best {
            // Try to expand past the reflection point.
            let expanded = affine(&centroid, &worst, -alpha * gamma);
            let f_expanded = f(&expanded);
            if f_expanded < f_reflected {
                simplex[n] = expanded;
                fvals[n] = f_expanded;
            } else {
                simplex[n] = reflected;
                fvals[n] = f_reflected;
            }
        } else if f_reflected < f_second_worst {
            simplex[n] = reflected;
            fvals[n] = f_reflected;
        } else if f_reflected < f_worst {
            // Outside contraction.
            let contracted = affine(&centroid, &worst, -alpha * rho);
            let f_contracted = f(&contracted);
            if f_contracted <= f_reflected {
                simplex[n] = contracted;
                fvals[n] = f_contracted;
            } else {
                shrink(&mut simplex, &mut fvals, sigma, &mut f);
            }
        } else {
            // Inside contraction.
            let contracted = affine(&centroid, &worst, rho);
            let f_contracted = f(&contracted);
            if f_contracted < f_worst {
                simplex[n] = contracted;
                fvals[n] = f_contracted;
            } else {
                shrink(&mut simplex, &mut fvals, sigma, &mut f);
            }
        }
    }

    sort_simplex(&mut simplex, &mut fvals);
    NelderMeadResult {
        x: simplex[0].clone(),
        fval: fvals[0],
        iterations,
        converged,
    }
}

/// `centroid + coeff * (worst - centroid)`.
fn affine(centroid: &[f64], worst: &[f64], coeff: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(worst.iter())
        .map(|(c, w)| c + coeff * (w - c))
        .collect()
}

fn shrink<F>(simplex: &mut [Vec<f64>], fvals: &mut [f64], sigma: f64, f: &mut F)
where
    F: FnMut(&[f64]) -> f64,
{
    let best = simplex[0].clone();
    for (v, fv) in simplex.iter_mut().zip(fvals.iter_mut()).skip(1) {
        for (x, b) in v.iter_mut().zip(best.iter()) {
            *x = b + sigma * (*x - b);
        }
        *fv = f(v);
    }
}

fn sort_simplex(simplex: &mut [Vec<f64>], fvals: &mut [f64]) {
    let mut order: Vec<usize> = (0..fvals.len()).collect();
    order.sort_by(|&a, &b| {
        fvals[a]
            .partial_cmp(&fvals[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let sorted_simplex: Vec<Vec<f64>> = order.iter().map(|&i| simplex[i].clone()).collect();
    let sorted_fvals: Vec<f64> = order.iter().map(|&i| fvals[i]).collect();
    simplex.clone_from_slice(&sorted_simplex);
    fvals.copy_from_slice(&sorted_fvals);
}

fn spread_within(simplex: &[Vec<f64>], fvals: &[f64], xatol: f64, fatol: f64) -> bool {
    let best = &simplex[0];
    let x_spread = simplex[1..]
        .iter()
        .flat_map(|v| v.iter().zip(best.iter()).map(|(a, b)| (a - b).abs()))
        .fold(0.0_f64, f64::max);
    let f_spread = fvals[1..]
        .iter()
        .map(|fv| (fv - fvals[0]).abs())
        .fold(0.0_f64, f64::max);
    x_spread <= xatol && f_spread <= fatol
}
