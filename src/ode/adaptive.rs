use serde::{Deserialize, Serialize};

use super::{OdeError, Solution};

/// Settings for adaptive step-size control.
///
/// The default tolerances (absolute 1e-8, relative 1e-8) are the stated
/// reproducibility tolerances for long integrations; tighten them for
/// cross-machine comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveSettings {
    /// Absolute error tolerance (default: 1e-8).
    pub abs_tol: f64,
    /// Relative error tolerance (default: 1e-8).
    pub rel_tol: f64,
    /// Minimum step-size decrease factor (default: 0.2).
    pub min_factor: f64,
    /// Maximum step-size increase factor (default: 10.0).
    pub max_factor: f64,
    /// Safety factor for the step-size controller (default: 0.9).
    pub safety: f64,
    /// Minimum allowed step size (default: 1e-6).
    pub min_step: f64,
    /// Maximum number of steps before returning
    /// [`OdeError::MaxStepsExceeded`] (default: 100_000).
    pub max_steps: usize,
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        Self {
            abs_tol: 1e-8,
            rel_tol: 1e-8,
            min_factor: 0.2,
            max_factor: 10.0,
            safety: 0.9,
            min_step: 1e-6,
            max_steps: 100_000,
        }
    }
}

/// Trait for adaptive Runge-Kutta solvers over a runtime-sized state.
///
/// Each solver is a zero-size struct that implements this trait with const
/// Butcher tableau coefficients; `STAGES` is the number of stages. The
/// provided [`integrate`](Self::integrate) walks from `t0` to `tf` with an
/// embedded error estimate driving a PID step-size controller based on:
///
/// > G. Söderlind and L. Wang, "Adaptive time-stepping and computational
/// > stability," *J. Comput. Appl. Math.*, vol. 185, no. 2, pp. 225–243,
/// > 2006. <https://doi.org/10.1016/j.cam.2005.03.008>
pub trait RKAdaptive<const STAGES: usize> {
    /// Butcher A matrix (lower triangular).
    const A: [[f64; STAGES]; STAGES];
    /// Weights for the higher-order solution.
    const B: [f64; STAGES];
    /// Error weights: `B[i] - Bhat[i]` for step error estimation.
    const BERR: [f64; STAGES];
    /// Nodes (abscissae).
    const C: [f64; STAGES];
    /// Order of the higher-order method.
    const ORDER: usize;
    /// First Same As Last optimization.
    const FSAL: bool;

    /// Integrate from `t0` to `tf` with initial state `y0`.
    fn integrate(
        t0: f64,
        tf: f64,
        y0: &[f64],
        mut f: impl FnMut(f64, &[f64]) -> Vec<f64>,
        settings: &AdaptiveSettings,
    ) -> Result<Solution, OdeError> {
        let dim = y0.len();
        let mut nevals: usize = 0;
        let mut naccept: usize = 0;
        let mut nreject: usize = 0;
        let mut t = t0;
        let mut y = y0.to_vec();

        let tdir = if tf > t0 { 1.0 } else { -1.0 };

        // PID controller state: two previous error norms
        let mut enorm_prev = 1.0e-4_f64;
        let mut enorm_prev2 = 1.0e-4_f64;

        // Initial step-size guess from the scaled magnitudes of y, y' and
        // an estimated y''. Falls back to a conservative step when the
        // derivative is (near) zero.
        let mut h = {
            let sci: Vec<f64> = y0
                .iter()
                .map(|&v| v.abs() * settings.rel_tol + settings.abs_tol)
                .collect();
            let d0 = scaled_rms(y0, &sci);
            let ydot0 = f(t0, y0);
            let d1 = scaled_rms(&ydot0, &sci);
            nevals += 1;

            if d0 < 1e-5 || d1 < 1e-5 {
                1e-6 * tdir
            } else {
                let h0 = 0.01 * d0 / d1 * tdir;
                let y1: Vec<f64> = y0
                    .iter()
                    .zip(&ydot0)
                    .map(|(&yi, &di)| yi + h0 * di)
                    .collect();
                let ydot1 = f(t0 + h0, &y1);
                nevals += 1;
                let ddiff: Vec<f64> = ydot1
                    .iter()
                    .zip(&ydot0)
                    .map(|(&a, &b)| a - b)
                    .collect();
                let d2 = scaled_rms(&ddiff, &sci) / h0.abs();

                let dmax = d1.max(d2);
                let h1 = if dmax < 1e-15 {
                    (h0.abs() * 1e-3).max(1e-6)
                } else {
                    10.0_f64.powf(-(2.0 + dmax.log10()) / Self::ORDER as f64)
                };
                (100.0 * h0.abs()).min(h1) * tdir
            }
        };

        // For FSAL methods, cache the last k evaluation
        let mut k_last: Option<Vec<f64>> = None;

        loop {
            // Clamp step to not overshoot the end
            if (tdir > 0.0 && t + h >= tf) || (tdir < 0.0 && t + h <= tf) {
                h = tf - t;
            }

            // Compute k-stages
            let mut karr: Vec<Vec<f64>> = Vec::with_capacity(STAGES);
            if Self::FSAL && k_last.is_some() {
                karr.push(k_last.take().unwrap());
            } else {
                karr.push(f(t, &y));
                nevals += 1;
            }

            for k in 1..STAGES {
                let mut ysum = y.clone();
                for j in 0..k {
                    let a_kj = Self::A[k][j];
                    if a_kj != 0.0 {
                        let scale = a_kj * h;
                        for (s, kj) in ysum.iter_mut().zip(&karr[j]) {
                            *s += scale * kj;
                        }
                    }
                }
                karr.push(f(t + Self::C[k] * h, &ysum));
                nevals += 1;
            }

            // Higher-order solution
            let mut ynp1 = y.clone();
            for (idx, ki) in karr.iter().enumerate() {
                let b_idx = Self::B[idx];
                if b_idx != 0.0 {
                    let scale = b_idx * h;
                    for (s, kij) in ynp1.iter_mut().zip(ki) {
                        *s += scale * kij;
                    }
                }
            }

            // Embedded error estimate
            let mut yerr = vec![0.0_f64; dim];
            for (idx, ki) in karr.iter().enumerate() {
                if Self::BERR[idx].abs() > 1.0e-20 {
                    let scale = Self::BERR[idx] * h;
                    for (e, kij) in yerr.iter_mut().zip(ki) {
                        *e += scale * kij;
                    }
                }
            }

            // Normalized error
            let enorm = {
                let ymax: Vec<f64> = y
                    .iter()
                    .zip(&ynp1)
                    .map(|(&a, &b)| a.abs().max(b.abs()) * settings.rel_tol + settings.abs_tol)
                    .collect();
                scaled_rms(&yerr, &ymax)
            };

            if !enorm.is_finite() {
                return Err(OdeError::StepNotFinite);
            }

            // PID step-size controller (Söderlind & Wang 2006, §4):
            //   h_{n+1}/h_n = 1/q,
            //   q = e_n^β₁ / e_{n-1}^β₂ · e_{n-2}^β₃ / safety
            // with β₁ = 0.7/p, β₂ = 0.4/p, β₃ = 0.1/p.
            let order_f = Self::ORDER as f64;
            let beta1 = 0.7 / order_f;
            let beta2 = 0.4 / order_f;
            let beta3 = 0.1 / order_f;
            let q = {
                let raw = enorm.powf(beta1) / enorm_prev.powf(beta2) * enorm_prev2.powf(beta3)
                    / settings.safety;
                raw.clamp(1.0 / settings.max_factor, 1.0 / settings.min_factor)
            };

            if enorm < 1.0 || h.abs() <= settings.min_step {
                // Accept step
                if Self::FSAL {
                    k_last = karr.pop();
                }

                enorm_prev2 = enorm_prev;
                enorm_prev = enorm.max(1.0e-4);
                t += h;
                y = ynp1;
                h /= q;

                naccept += 1;
                if (tdir > 0.0 && t >= tf) || (tdir < 0.0 && t <= tf) {
                    break;
                }
            } else {
                // Reject step — use a more conservative factor
                if Self::FSAL {
                    k_last = None;
                }
                nreject += 1;
                let reject_q = (enorm.powf(beta1) / settings.safety).min(1.0 / settings.min_factor);
                h /= reject_q;
            }

            if naccept + nreject >= settings.max_steps {
                return Err(OdeError::MaxStepsExceeded);
            }
        }

        Ok(Solution {
            t,
            y,
            evals: nevals,
            accepted: naccept,
            rejected: nreject,
        })
    }
}

/// RMS norm of `v` scaled elementwise by `scale`.
fn scaled_rms(v: &[f64], scale: &[f64]) -> f64 {
    let n = v.len();
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = v
        .iter()
        .zip(scale)
        .map(|(&vi, &si)| (vi / si) * (vi / si))
        .sum();
    (sum / n as f64).sqrt()
}
