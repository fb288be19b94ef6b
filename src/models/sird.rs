//! SIRD derivatives.
//!
//! ```text
//! dS = -β S I
//! dI =  β S I - γ I - μ I
//! dR =  γ I
//! dD =  μ I
//! ```
//!
//! The four components sum to zero, so the total population is conserved.

use nalgebra::Vector4;

use crate::domain::ModelParameters;

/// Time derivative of `(S, I, R, D)` at `state`.
pub fn derivative(params: &ModelParameters, state: &Vector4<f64>) -> Vector4<f64> {
    let (s, i) = (state[0], state[1]);
    let infections = params.beta * s * i;
    let recoveries = params.gamma * i;
    let deaths = params.mu * i;
    Vector4::new(-infections, infections - recoveries - deaths, recoveries, deaths)
}

/// Basic reproduction number `β / (γ + μ)`.
pub fn r0(params: &ModelParameters) -> f64 {
    params.beta / (params.gamma + params.mu)
}
