//! Fixed-step RK4 integrator for small ODE systems.
//!
//! The SIR right-hand side is smooth and non-stiff for the parameter ranges
//! we fit, so classic RK4 with a handful of sub-steps per day matches a
//! default-tolerance adaptive integrator to well below the fit noise floor.

/// Advance `y` by one step of size `dt` using classic Runge-Kutta 4.
///
/// `f(t, y, dy)` writes the derivative of `y` at time `t` into `dy`.
pub fn rk4_step<F>(y: &mut [f64], t: f64, dt: f64, mut f: F)
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    let n = y.len();
    let mut k1 = vec![0.0; n];
    let mut k2 = vec![0.0; n];
    let mut k3 = vec![0.0; n];
    let mut k4 = vec![0.0; n];
    let mut ytmp = vec![0.0; n];

    f(t, y, &mut k1);

    for i in 0..n {
        ytmp[i] = y[i] + 0.5 * dt * k1[i];
    }
    f(t + 0.5 * dt, &ytmp, &mut k2);

    for i in 0..n {
        ytmp[i] = y[i] + 0.5 * dt * k2[i];
    }
    f(t + 0.5 * dt, &ytmp, &mut k3);

    for i in 0..n {
        ytmp[i] = y[i] + dt * k3[i];
    }
    f(t + dt, &ytmp, &mut k4);

    for i in 0..n {
        y[i] += (dt / 6.0) * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rk4_matches_exponential_decay() {
        // dy/dt = -y, y(0) = 1 => y(t) = exp(-t).
        let mut y = [1.0];
        let dt = 0.1;
        let steps = 50;
        for i in 0..steps {
            rk4_step(&mut y, i as f64 * dt, dt, |_, y, dy| dy[0] = -y[0]);
        }
        let exact = (-(steps as f64) * dt).exp();
        assert!((y[0] - exact).abs() < 1e-8, "got {}, want {exact}", y[0]);
    }

    #[test]
    fn rk4_handles_coupled_system() {
        // Harmonic oscillator: x'' = -x as a 2d first-order system.
        // Energy x^2 + v^2 should be conserved.
        let mut y = [1.0, 0.0];
        let dt = 0.01;
        for i in 0..1000 {
            rk4_step(&mut y, i as f64 * dt, dt, |_, y, dy| {
                dy[0] = y[1];
                dy[1] = -y[0];
            });
        }
        let energy = y[0] * y[0] + y[1] * y[1];
        assert!((energy - 1.0).abs() < 1e-6);
    }
}
