// Ring of coupled oscillators integrated with the default solver.
// Prints JSON with the time grid and the order parameter r(t):
//   {"t":[...], "r":[...]}

use kuramoto::{phase_coherence, Coupling, Graph, KuramotoModel, ModelConfig, SimSettings, Simulation};

fn fmt_arr(v: &[f64]) -> String {
    let inner: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", inner.join(","))
}

fn main() {
    tracing_subscriber::fmt::init();

    let config = ModelConfig {
        strength: Some(Coupling::Uniform(3.0)),
        seed: Some(17),
        ..ModelConfig::new()
    };
    let model = KuramotoModel::from_graph(&Graph::ring(16), config)
        .expect("model construction failed");

    let settings = SimSettings::with_duration(0.02, 30.0);
    let series = Simulation::new(model, settings)
        .expect("invalid settings")
        .run()
        .expect("integration failed");

    let r: Vec<f64> = (0..series.steps())
        .map(|k| phase_coherence(series.snapshot(k)))
        .collect();

    println!("{{\"t\":{},\"r\":{}}}", fmt_arr(series.times()), fmt_arr(&r));
}
