//! Fixed-step forward Euler integration of the SIRD system.
//!
//! Every step evaluates all four derivatives from the same pre-step snapshot,
//! then advances each component by `derivative * step`. The trajectory length is
//! known up front (`floor(horizon / step)`), so buffers are allocated once and
//! filled by index.
//!
//! Time values are accumulated (`t += step`) rather than recomputed as
//! `i * step`; the resulting floating-point drift is accepted.

use crate::domain::{ModelParameters, SimulationConfig, State, Trajectory};
use crate::models::derivative;

/// Integrate at full resolution.
///
/// No validation is performed: negative rates or odd horizons produce whatever
/// the recurrence produces. The first point is always the initial state.
pub fn simulate(params: &ModelParameters, config: &SimulationConfig) -> Trajectory {
    let n = config.n_points();
    let mut trajectory = Trajectory::with_len(n);

    let mut t = 0.0;
    let mut y = config.initial.to_vector();
    trajectory.set(0, t, &config.initial);

    for idx in 1..n {
        let dy = derivative(params, &y);
        y += dy * config.step;
        t += config.step;
        trajectory.set(idx, t, &State::from_vector(&y));
    }

    trajectory
}

/// Integrate, then keep every `config.stride`-th point.
///
/// This is what scoring and plotting consume.
pub fn forecast(params: &ModelParameters, config: &SimulationConfig) -> Trajectory {
    simulate(params, config).downsample(config.stride)
}
