//! Time integration driver: grid construction, the solver loop, and the
//! resulting phase time series.
//!
//! The grid is `t_k = (k + 1) · dt` for `k` in `0..steps` — strictly
//! increasing with the first sample at `dt`, so the first output column is
//! one step past the initial condition. Integration proceeds segment by
//! segment between grid points with an adaptive solver; the solver always
//! sees unwrapped phases (wrapping a phase mid-run would put a spurious
//! derivative discontinuity at the 0/2π boundary), and the optional mod-2π
//! reduction is applied to the stored output only.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KuramotoError, KuramotoResult};
use crate::mat::Mat;
use crate::model::KuramotoModel;
use crate::ode::{AdaptiveSettings, RKAdaptive, RKDP54};

/// Integration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSettings {
    /// Fixed output step size (default: 0.01). Must be positive.
    pub dt: f64,
    /// Number of output samples (default: 2000). Must be positive.
    pub steps: usize,
    /// Reduce stored phases to [0, 2π) (default: true). Output-only; the
    /// solver state is never wrapped.
    pub wrap_phases: bool,
    /// Adaptive solver tolerances and limits.
    pub solver: AdaptiveSettings,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            dt: 0.01,
            steps: 2000,
            wrap_phases: true,
            solver: AdaptiveSettings::default(),
        }
    }
}

impl SimSettings {
    /// Settings covering a total duration: `steps = round(total / dt)`.
    ///
    /// ```
    /// use kuramoto::SimSettings;
    /// let s = SimSettings::with_duration(0.01, 1.0);
    /// assert_eq!(s.steps, 100);
    /// ```
    pub fn with_duration(dt: f64, total: f64) -> Self {
        Self {
            dt,
            steps: (total / dt).round() as usize,
            ..Self::default()
        }
    }
}

/// Simulated phase trajectories: an N×T matrix (row = oscillator,
/// column = timestep) plus the time grid it was sampled on.
///
/// Owned by the caller; independent simulations never share result storage.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    phases: Mat,
    times: Vec<f64>,
}

impl TimeSeries {
    /// Oscillator count N (rows).
    #[inline]
    pub fn oscillators(&self) -> usize {
        self.phases.nrows()
    }

    /// Sample count T (columns).
    #[inline]
    pub fn steps(&self) -> usize {
        self.phases.ncols()
    }

    /// All phases at timestep `k` — a contiguous column slice.
    #[inline]
    pub fn snapshot(&self, k: usize) -> &[f64] {
        self.phases.col(k)
    }

    /// Full trajectory of oscillator `i`.
    pub fn trajectory(&self, i: usize) -> Vec<f64> {
        self.phases.row(i)
    }

    /// Phase of oscillator `i` at timestep `k`.
    #[inline]
    pub fn phase(&self, i: usize, k: usize) -> f64 {
        self.phases[(i, k)]
    }

    /// The time grid, one entry per column.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// The backing N×T matrix.
    #[inline]
    pub fn phases(&self) -> &Mat {
        &self.phases
    }
}

/// Drives the ODE solver over a model, producing a [`TimeSeries`].
///
/// # Examples
///
/// ```
/// use kuramoto::{Graph, KuramotoModel, ModelConfig, SimSettings, Simulation};
///
/// let config = ModelConfig { seed: Some(3), ..ModelConfig::new() };
/// let model = KuramotoModel::from_graph(&Graph::ring(4), config).unwrap();
/// let settings = SimSettings { steps: 50, ..SimSettings::default() };
/// let series = Simulation::new(model, settings).unwrap().run().unwrap();
/// assert_eq!(series.oscillators(), 4);
/// assert_eq!(series.steps(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    model: KuramotoModel,
    settings: SimSettings,
}

impl Simulation {
    /// Validate settings and pair them with a model.
    ///
    /// Fails with [`KuramotoError::Configuration`] for a non-positive `dt`
    /// or a zero step count.
    pub fn new(model: KuramotoModel, settings: SimSettings) -> KuramotoResult<Self> {
        if !(settings.dt > 0.0) {
            return Err(KuramotoError::Configuration(format!(
                "dt must be positive, got {}",
                settings.dt
            )));
        }
        if settings.steps == 0 {
            return Err(KuramotoError::Configuration(
                "step count must be positive".into(),
            ));
        }
        Ok(Self { model, settings })
    }

    /// The model being integrated.
    #[inline]
    pub fn model(&self) -> &KuramotoModel {
        &self.model
    }

    /// The output time grid: `(k + 1) · dt` for `k` in `0..steps`.
    pub fn time_grid(&self) -> Vec<f64> {
        (0..self.settings.steps)
            .map(|k| (k + 1) as f64 * self.settings.dt)
            .collect()
    }

    /// Integrate with the default solver (Dormand-Prince 5(4)).
    pub fn run(&self) -> KuramotoResult<TimeSeries> {
        self.run_with::<7, RKDP54>()
    }

    /// Integrate with an explicit adaptive solver.
    ///
    /// Walks the time grid segment by segment, carrying the unwrapped state
    /// between segments. Solver failure or a non-finite state surfaces as
    /// [`KuramotoError::SolverDiverged`].
    pub fn run_with<const S: usize, M: RKAdaptive<S>>(&self) -> KuramotoResult<TimeSeries> {
        let grid = self.time_grid();
        let n = self.model.node_count();
        let mut phases = Mat::zeros(n, grid.len());

        let mut t = 0.0;
        let mut y = self.model.initial_phases().to_vec();
        let mut evals = 0;
        let mut accepted = 0;
        let mut rejected = 0;

        for (k, &tk) in grid.iter().enumerate() {
            let sol = M::integrate(t, tk, &y, |_t, th| self.model.derivative(th), &self.settings.solver)?;
            if sol.y.iter().any(|v| !v.is_finite()) {
                return Err(KuramotoError::SolverDiverged(
                    crate::ode::OdeError::StepNotFinite,
                ));
            }
            t = sol.t;
            y = sol.y;
            evals += sol.evals;
            accepted += sol.accepted;
            rejected += sol.rejected;

            let col = phases.col_mut(k);
            if self.settings.wrap_phases {
                for (c, &th) in col.iter_mut().zip(&y) {
                    *c = th.rem_euclid(TAU);
                }
            } else {
                col.copy_from_slice(&y);
            }
        }

        debug!(
            oscillators = n,
            samples = grid.len(),
            evals,
            accepted,
            rejected,
            "integration complete"
        );

        Ok(TimeSeries {
            phases,
            times: grid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::model::{Coupling, ModelConfig};

    fn small_model() -> KuramotoModel {
        let config = ModelConfig {
            strength: Some(Coupling::Uniform(1.0)),
            phases: Some(vec![0.0, 1.0, 2.0]),
            frequencies: Some(vec![1.0, 1.0, 1.0]),
            ..ModelConfig::new()
        };
        KuramotoModel::from_graph(&Graph::complete(3), config).unwrap()
    }

    #[test]
    fn time_grid_starts_at_dt() {
        let settings = SimSettings {
            dt: 0.5,
            steps: 4,
            ..SimSettings::default()
        };
        let sim = Simulation::new(small_model(), settings).unwrap();
        assert_eq!(sim.time_grid(), vec![0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn with_duration_derives_steps() {
        let s = SimSettings::with_duration(0.01, 1.0);
        assert_eq!(s.steps, 100);
        assert_eq!(s.dt, 0.01);
    }

    #[test]
    fn non_positive_dt_rejected() {
        for dt in [0.0, -0.5, f64::NAN] {
            let settings = SimSettings {
                dt,
                ..SimSettings::default()
            };
            let err = Simulation::new(small_model(), settings).unwrap_err();
            assert!(matches!(err, KuramotoError::Configuration(_)));
        }
    }

    #[test]
    fn zero_steps_rejected() {
        let settings = SimSettings {
            steps: 0,
            ..SimSettings::default()
        };
        let err = Simulation::new(small_model(), settings).unwrap_err();
        assert!(matches!(err, KuramotoError::Configuration(_)));
    }

    #[test]
    fn output_shape_and_times() {
        let settings = SimSettings {
            dt: 0.01,
            steps: 10,
            ..SimSettings::default()
        };
        let series = Simulation::new(small_model(), settings).unwrap().run().unwrap();
        assert_eq!(series.oscillators(), 3);
        assert_eq!(series.steps(), 10);
        assert_eq!(series.times().len(), 10);
        assert!((series.times()[0] - 0.01).abs() < 1e-15);
        assert!((series.times()[9] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn wrapped_output_in_range() {
        let settings = SimSettings {
            dt: 0.1,
            steps: 200,
            ..SimSettings::default()
        };
        let series = Simulation::new(small_model(), settings).unwrap().run().unwrap();
        for k in 0..series.steps() {
            for &th in series.snapshot(k) {
                assert!((0.0..TAU).contains(&th));
            }
        }
    }

    #[test]
    fn trajectory_matches_snapshots() {
        let settings = SimSettings {
            steps: 5,
            ..SimSettings::default()
        };
        let series = Simulation::new(small_model(), settings).unwrap().run().unwrap();
        let traj = series.trajectory(1);
        for k in 0..5 {
            assert_eq!(traj[k], series.snapshot(k)[1]);
            assert_eq!(traj[k], series.phase(1, k));
        }
    }

    #[test]
    fn max_steps_surfaces_as_diverged() {
        let settings = SimSettings {
            dt: 50.0,
            steps: 1,
            solver: AdaptiveSettings {
                abs_tol: 1e-13,
                rel_tol: 1e-13,
                max_steps: 2,
                ..AdaptiveSettings::default()
            },
            ..SimSettings::default()
        };
        let err = Simulation::new(small_model(), settings).unwrap().run().unwrap_err();
        assert!(matches!(err, KuramotoError::SolverDiverged(_)));
    }

    #[test]
    fn solver_choice_is_consistent() {
        use crate::ode::RKF45;

        let settings = SimSettings {
            dt: 0.05,
            steps: 20,
            wrap_phases: false,
            ..SimSettings::default()
        };
        let sim = Simulation::new(small_model(), settings).unwrap();
        let a = sim.run().unwrap();
        let b = sim.run_with::<6, RKF45>().unwrap();
        for k in 0..a.steps() {
            for i in 0..a.oscillators() {
                assert!((a.phase(i, k) - b.phase(i, k)).abs() < 1e-5);
            }
        }
    }
}
