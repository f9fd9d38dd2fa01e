//! ODE integration over runtime-sized state — fixed-step and adaptive.
//!
//! # Fixed-step
//!
//! [`rk4_step`] and [`rk4`] provide classic 4th-order Runge-Kutta
//! integration over a `&[f64]` state.
//!
//! # Adaptive solvers
//!
//! Adaptive solvers implement the [`RKAdaptive`] trait with Butcher tableau
//! constants. The [`integrate`](RKAdaptive::integrate) method uses a PID
//! step-size controller (Söderlind & Wang 2006) with embedded error
//! estimation and an automatic initial step-size guess.
//!
//! | Solver     | Stages | Order | FSAL |
//! |------------|--------|-------|------|
//! | [`RKDP54`] |      7 | 5(4)  | yes  |
//! | [`RKF45`]  |      6 | 5(4)  | no   |
//!
//! # Example
//!
//! ```
//! use kuramoto::ode::{AdaptiveSettings, RKAdaptive, RKDP54};
//!
//! // Harmonic oscillator: y'' = -y  →  [y, y'] with dy/dt = [y', -y]
//! let tau = 2.0 * std::f64::consts::PI;
//! let settings = AdaptiveSettings::default();
//! let sol = RKDP54::integrate(
//!     0.0, tau, &[1.0, 0.0],
//!     |_t, y| vec![y[1], -y[0]],
//!     &settings,
//! ).unwrap();
//! assert!((sol.y[0] - 1.0).abs() < 1e-6); // cos(2π) ≈ 1
//! assert!(sol.y[1].abs() < 1e-6);         // sin(2π) ≈ 0
//! ```

mod adaptive;
mod rk4;
mod rkdp54;
mod rkf45;


use thiserror::Error;

pub use adaptive::{AdaptiveSettings, RKAdaptive};
pub use rk4::{rk4, rk4_step};
pub use rkdp54::RKDP54;
pub use rkf45::RKF45;

/// Errors from ODE integration.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdeError {
    /// Step error or state became non-finite (NaN / Inf).
    #[error("step error is not finite")]
    StepNotFinite,
    /// Exceeded maximum number of steps (adaptive only).
    #[error("maximum number of steps exceeded")]
    MaxStepsExceeded,
}

/// Result of an adaptive integration.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Final independent variable value.
    pub t: f64,
    /// Final state vector.
    pub y: Vec<f64>,
    /// Total derivative evaluations.
    pub evals: usize,
    /// Accepted steps.
    pub accepted: usize,
    /// Rejected steps.
    pub rejected: usize,
}
