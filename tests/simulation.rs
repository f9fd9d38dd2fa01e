//! End-to-end simulation scenarios.

use std::f64::consts::{PI, TAU};

use kuramoto::ode::rk4;
use kuramoto::{
    phase_coherence, Coupling, Graph, KuramotoModel, ModelConfig, SimSettings, Simulation,
};

/// N=3, fully connected, unit strengths, known phases and frequencies:
/// output shape is (3, 100) and the first column sits one small step past
/// the initial phases.
#[test]
fn three_oscillator_scenario() {
    let config = ModelConfig {
        strength: Some(Coupling::PerOscillator(vec![1.0, 1.0, 1.0])),
        phases: Some(vec![0.0, PI / 3.0, 2.0 * PI / 3.0]),
        frequencies: Some(vec![1.0, 1.0, 1.0]),
        ..ModelConfig::new()
    };
    let model = KuramotoModel::from_graph(&Graph::complete(3), config).unwrap();
    let settings = SimSettings::with_duration(0.01, 1.0);
    let series = Simulation::new(model, settings).unwrap().run().unwrap();

    assert_eq!(series.oscillators(), 3);
    assert_eq!(series.steps(), 100);

    let first = series.snapshot(0);
    let initial = [0.0, PI / 3.0, 2.0 * PI / 3.0];
    for (a, b) in first.iter().zip(&initial) {
        // One dt of drift at |dθ/dt| ≲ 2
        assert!((a - b).abs() < 0.05, "first column {a} too far from {b}");
    }
}

/// With zero coupling each oscillator rotates freely:
/// θ_i(t) = θ_i(0) + ω_i · t, to solver accuracy.
#[test]
fn zero_coupling_is_pure_rotation() {
    let theta0 = [0.5, 1.5, 2.5, 3.5];
    let omega = [1.0, -2.0, 0.5, 3.0];
    let config = ModelConfig {
        strength: Some(Coupling::Uniform(0.0)),
        phases: Some(theta0.to_vec()),
        frequencies: Some(omega.to_vec()),
        ..ModelConfig::new()
    };
    let model = KuramotoModel::from_graph(&Graph::complete(4), config).unwrap();
    let settings = SimSettings {
        dt: 0.1,
        steps: 50,
        wrap_phases: false,
        ..SimSettings::default()
    };
    let series = Simulation::new(model, settings).unwrap().run().unwrap();

    for (k, &t) in series.times().iter().enumerate() {
        for i in 0..4 {
            let expected = theta0[i] + omega[i] * t;
            assert!(
                (series.phase(i, k) - expected).abs() < 1e-9,
                "oscillator {i} at t={t}"
            );
        }
    }
}

/// Equal phases and zero frequencies form a fixed point: the trajectory is
/// constant.
#[test]
fn synchronized_network_stays_put() {
    let config = ModelConfig {
        strength: Some(Coupling::Uniform(4.0)),
        phases: Some(vec![1.0; 5]),
        frequencies: Some(vec![0.0; 5]),
        ..ModelConfig::new()
    };
    let model = KuramotoModel::from_graph(&Graph::ring(5), config).unwrap();
    let settings = SimSettings {
        dt: 0.05,
        steps: 40,
        wrap_phases: false,
        ..SimSettings::default()
    };
    let series = Simulation::new(model, settings).unwrap().run().unwrap();

    for k in 0..series.steps() {
        for i in 0..5 {
            assert!((series.phase(i, k) - 1.0).abs() < 1e-9);
        }
    }
}

/// Strong coupling on identical frequencies drives the order parameter
/// toward 1.
#[test]
fn strong_coupling_synchronizes() {
    let config = ModelConfig {
        strength: Some(Coupling::Uniform(5.0)),
        phases: Some(vec![0.1, 1.3, 2.6, 3.9, 5.2, 0.7]),
        frequencies: Some(vec![1.0; 6]),
        ..ModelConfig::new()
    };
    let model = KuramotoModel::from_graph(&Graph::complete(6), config).unwrap();
    let settings = SimSettings::with_duration(0.01, 20.0);
    let series = Simulation::new(model, settings).unwrap().run().unwrap();

    let r_end = phase_coherence(series.snapshot(series.steps() - 1));
    assert!(r_end > 0.99, "expected near-full synchrony, got r={r_end}");
}

/// The adaptive default agrees with a fine fixed-step RK4 reference on a
/// smooth run.
#[test]
fn adaptive_matches_fixed_step_reference() {
    let theta0 = vec![0.0, 0.8, 1.6, 2.4];
    let config = ModelConfig {
        strength: Some(Coupling::Uniform(1.5)),
        phases: Some(theta0.clone()),
        frequencies: Some(vec![0.9, 1.0, 1.1, 1.2]),
        ..ModelConfig::new()
    };
    let model = KuramotoModel::from_graph(&Graph::ring(4), config).unwrap();
    let settings = SimSettings {
        dt: 0.1,
        steps: 20,
        wrap_phases: false,
        ..SimSettings::default()
    };
    let sim = Simulation::new(model, settings).unwrap();
    let series = sim.run().unwrap();

    let reference = rk4(0.0, 2.0, 1e-4, &theta0, |_t, th| sim.model().derivative(th));
    let last = series.snapshot(series.steps() - 1);
    for (a, b) in last.iter().zip(&reference) {
        assert!((a - b).abs() < 1e-6, "adaptive {a} vs rk4 {b}");
    }
}

/// A weighted graph is coerced to unweighted by default; the caller's graph
/// keeps its weights.
#[test]
fn weight_coercion_end_to_end() {
    let mut g = Graph::new(3);
    g.add_weighted_edge(0, 1, 2.0).unwrap();
    g.add_weighted_edge(1, 2, 0.5).unwrap();

    let config = ModelConfig {
        strength: Some(Coupling::Uniform(1.0)),
        phases: Some(vec![0.0, 1.0, 2.0]),
        frequencies: Some(vec![1.0; 3]),
        ..ModelConfig::new()
    };
    let model = KuramotoModel::from_graph(&g, config).unwrap();

    assert_eq!(model.adjacency()[(0, 1)], 1.0);
    assert_eq!(model.adjacency()[(1, 2)], 1.0);
    assert_eq!(model.adjacency()[(0, 2)], 0.0);
    assert_eq!(g.edge_weights(), vec![2.0, 0.5]);
}

/// Same seed, same randomized defaults, same trajectory.
#[test]
fn seeded_runs_reproduce() {
    let run = || {
        let config = ModelConfig {
            seed: Some(99),
            ..ModelConfig::new()
        };
        let model = KuramotoModel::from_graph(&Graph::ring(8), config).unwrap();
        let settings = SimSettings {
            steps: 25,
            ..SimSettings::default()
        };
        Simulation::new(model, settings).unwrap().run().unwrap()
    };
    let a = run();
    let b = run();
    for k in 0..a.steps() {
        assert_eq!(a.snapshot(k), b.snapshot(k));
    }
}

/// Mean frequency of an uncoupled network is exactly ω.
#[test]
fn mean_frequency_uncoupled() {
    let omega = vec![0.7, 1.3, 2.1];
    let config = ModelConfig {
        strength: Some(Coupling::Uniform(0.0)),
        phases: Some(vec![0.0, 1.0, 2.0]),
        frequencies: Some(omega.clone()),
        ..ModelConfig::new()
    };
    let model = KuramotoModel::from_graph(&Graph::complete(3), config).unwrap();
    let settings = SimSettings {
        steps: 30,
        ..SimSettings::default()
    };
    let series = Simulation::new(model.clone(), settings).unwrap().run().unwrap();

    let mean = model.mean_frequency(&series).unwrap();
    for (m, w) in mean.iter().zip(&omega) {
        assert!((m - w).abs() < 1e-12);
    }
}

/// Wrapped output stays in [0, 2π) even for long runs with fast rotation.
#[test]
fn wrapped_phases_bounded() {
    let config = ModelConfig {
        strength: Some(Coupling::Uniform(1.0)),
        phases: Some(vec![0.0, 3.0]),
        frequencies: Some(vec![5.0, -5.0]),
        ..ModelConfig::new()
    };
    let model = KuramotoModel::from_graph(&Graph::complete(2), config).unwrap();
    let settings = SimSettings {
        dt: 0.1,
        steps: 300,
        ..SimSettings::default()
    };
    let series = Simulation::new(model, settings).unwrap().run().unwrap();
    for k in 0..series.steps() {
        for &th in series.snapshot(k) {
            assert!((0.0..TAU).contains(&th));
        }
    }
}
