//! # kuramoto
//!
//! Simulation of the Kuramoto model: a population of coupled phase
//! oscillators with intrinsic natural frequencies, interacting through a
//! symmetric coupling graph, evolved under the first-order ODE
//!
//! ```text
//! dθ_i/dt = ω_i + (κ_i / D_i) · Σ_j A_ij · sin(θ_j − θ_i)
//! ```
//!
//! The engine converts a graph (or raw adjacency matrix) into a dense
//! symmetric coupling matrix, exposes the pure phase derivative, and drives
//! an adaptive Runge-Kutta solver over a fixed time grid to produce an N×T
//! phase time series (row = oscillator, column = timestep).
//!
//! ## Quick start
//!
//! ```
//! use kuramoto::{
//!     phase_coherence, Coupling, Graph, KuramotoModel, ModelConfig, SimSettings, Simulation,
//! };
//!
//! // Three fully-coupled oscillators, identical frequencies
//! let config = ModelConfig {
//!     strength: Some(Coupling::Uniform(2.0)),
//!     phases: Some(vec![0.0, 1.0, 2.0]),
//!     frequencies: Some(vec![1.0, 1.0, 1.0]),
//!     ..ModelConfig::new()
//! };
//! let model = KuramotoModel::from_graph(&Graph::complete(3), config).unwrap();
//!
//! let settings = SimSettings::with_duration(0.01, 10.0);
//! let series = Simulation::new(model, settings).unwrap().run().unwrap();
//!
//! // Strong coupling pulls the phases together over time
//! let r_start = phase_coherence(series.snapshot(0));
//! let r_end = phase_coherence(series.snapshot(series.steps() - 1));
//! assert!(r_end > r_start);
//! assert!(r_end > 0.99);
//! ```
//!
//! ## Modules
//!
//! - [`graph`] — undirected coupling graphs ([`Graph`]) and conversion to a
//!   dense symmetric adjacency matrix, with optional weighted→unweighted
//!   coercion (copy-on-coerce, warns, never mutates the input).
//!
//! - [`mat`] — runtime-sized column-major `f64` matrix ([`Mat`]), the
//!   storage type for adjacency matrices and phase time series.
//!
//! - [`model`] — the oscillator network ([`KuramotoModel`]): validated
//!   immutable configuration, the pure derivative function, the Kuramoto
//!   order parameter ([`order_parameter`] / [`phase_coherence`]), and
//!   time-averaged [`mean frequencies`](KuramotoModel::mean_frequency).
//!
//! - [`ode`] — fixed-step RK4 and adaptive Runge-Kutta solvers (Dormand-
//!   Prince 5(4), Fehlberg 4(5)) with a PID step-size controller.
//!
//! - [`sim`] — the integration driver ([`Simulation`]): time-grid
//!   construction, the segment-by-segment solver loop, and the resulting
//!   [`TimeSeries`].
//!
//! ## Error handling
//!
//! Every invariant violation (length mismatch, asymmetric adjacency,
//! non-square input, non-positive step) is a typed [`KuramotoError`] raised
//! eagerly at construction, before any integration work begins. Solver
//! non-convergence surfaces as [`KuramotoError::SolverDiverged`].

pub mod error;
pub mod graph;
pub mod mat;
pub mod model;
pub mod ode;
pub mod sim;

pub use error::{KuramotoError, KuramotoResult};
pub use graph::Graph;
pub use mat::Mat;
pub use model::{
    order_parameter, phase_coherence, Coupling, KuramotoModel, ModelConfig, Normalization,
};
pub use sim::{SimSettings, Simulation, TimeSeries};
