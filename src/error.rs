use thiserror::Error;

use crate::ode::OdeError;

/// Root error type for model construction and simulation failures.
///
/// Every variant is raised eagerly at the call that detects the invariant
/// violation; nothing is retried or silently defaulted. The only recoverable
/// path in the crate — coercing a weighted graph to unweighted — is a warning,
/// not an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KuramotoError {
    /// Malformed or unsupported input (non-square matrix, bad node index,
    /// non-positive step size, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A supplied vector does not match the oscillator count.
    #[error("{what} length {got} does not match oscillator count {expected}")]
    DataLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Adjacency and time-series dimensions disagree in a derived-metric call.
    #[error("dimension mismatch: model has {expected} oscillators, time series has {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Adjacency matrix fails the symmetry invariant.
    #[error("adjacency matrix is not symmetric: |a[{row},{col}] - a[{col},{row}]| = {delta:.3e}")]
    Asymmetry {
        row: usize,
        col: usize,
        delta: f64,
    },

    /// The numerical solver failed to produce a finite, converged trajectory.
    #[error("solver diverged: {0}")]
    SolverDiverged(#[from] OdeError),
}

pub type KuramotoResult<T> = Result<T, KuramotoError>;
