//! Synthetic ground truth from known SIRD parameters.
//!
//! The dataset is the downsampled forecast itself, one row per retained point,
//! optionally perturbed with multiplicative log-normal noise. The day-0 row is
//! left untouched so the initial state read back from the file matches the one
//! used to generate it.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{Compartment, GroundTruth, ModelParameters, SimulationConfig};
use crate::error::FitError;
use crate::sim::forecast;

/// Settings for one synthetic dataset.
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub params: ModelParameters,
    pub sim: SimulationConfig,
    /// Log-scale standard deviation of the multiplicative noise (0 disables it).
    pub noise: f64,
    pub seed: u64,
}

/// Generate a ground-truth table aligned with `config.sim`.
pub fn generate_ground_truth(config: &SyntheticConfig) -> Result<GroundTruth, FitError> {
    config.sim.validate()?;
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(FitError::InvalidConfig(format!(
            "noise must be finite and >= 0 (got {})",
            config.noise
        )));
    }

    let clean = GroundTruth::from_trajectory(&forecast(&config.params, &config.sim));
    if config.noise == 0.0 {
        return Ok(clean);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| FitError::InvalidConfig(format!("noise distribution error: {e}")))?;

    let sigma = config.noise;
    // Keeps the perturbed value unbiased: E[exp(σz - σ²/2)] = 1.
    let mean_correction = 0.5 * sigma * sigma;

    let mut rows = clean.rows();
    for row in rows.iter_mut().filter(|r| r.day != 0) {
        for c in Compartment::ALL {
            let z = normal.sample(&mut rng);
            let factor = (sigma * z - mean_correction).exp();
            row.set(c, row.get(c) * factor);
        }
    }

    Ok(GroundTruth::from_rows(&rows))
}
