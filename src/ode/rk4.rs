/// Single step of the classic 4th-order Runge-Kutta method.
///
/// Advances `y` from `t` to `t + h` using `f(t, y) -> dy/dt`.
///
/// ```
/// use kuramoto::ode::rk4_step;
///
/// // dy/dt = -y (exponential decay)
/// let y1 = rk4_step(0.0, &[1.0], 0.01, |_t, y| vec![-y[0]]);
/// assert!((y1[0] - (-0.01_f64).exp()).abs() < 1e-10);
/// ```
pub fn rk4_step(
    t: f64,
    y: &[f64],
    h: f64,
    mut f: impl FnMut(f64, &[f64]) -> Vec<f64>,
) -> Vec<f64> {
    let k1 = f(t, y);
    let k2 = f(t + 0.5 * h, &saxpy(y, &k1, 0.5 * h));
    let k3 = f(t + 0.5 * h, &saxpy(y, &k2, 0.5 * h));
    let k4 = f(t + h, &saxpy(y, &k3, h));

    y.iter()
        .enumerate()
        .map(|(i, &yi)| yi + h * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]) / 6.0)
        .collect()
}

/// Integrate an ODE using fixed-step 4th-order Runge-Kutta.
///
/// Returns the final state at `tf`. The step size `dt` is used directly
/// (positive for forward, negative for backward); the last step is clamped
/// to land exactly on `tf`.
///
/// ```
/// use kuramoto::ode::rk4;
///
/// // Harmonic oscillator: y'' = -y  →  [y, y']
/// let yf = rk4(0.0, std::f64::consts::TAU, 0.001, &[1.0, 0.0],
///     |_t, y| vec![y[1], -y[0]],
/// );
/// assert!((yf[0] - 1.0).abs() < 1e-8);
/// assert!(yf[1].abs() < 1e-8);
/// ```
pub fn rk4(
    t0: f64,
    tf: f64,
    dt: f64,
    y0: &[f64],
    mut f: impl FnMut(f64, &[f64]) -> Vec<f64>,
) -> Vec<f64> {
    let mut t = t0;
    let mut y = y0.to_vec();
    let tdir = if tf > t0 { 1.0 } else { -1.0 };
    let mut h = dt.abs() * tdir;

    loop {
        // Clamp last step
        if (tdir > 0.0 && t + h > tf) || (tdir < 0.0 && t + h < tf) {
            h = tf - t;
        }

        y = rk4_step(t, &y, h, &mut f);
        t += h;

        if (tdir > 0.0 && t >= tf) || (tdir < 0.0 && t <= tf) {
            break;
        }
    }

    y
}

/// `y + a * k`, elementwise.
fn saxpy(y: &[f64], k: &[f64], a: f64) -> Vec<f64> {
    y.iter().zip(k).map(|(&yi, &ki)| yi + a * ki).collect()
}
