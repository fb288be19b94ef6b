//! Parameter grid generation.
//!
//! We fit SIRD rates with a deterministic, exhaustive grid search. Candidates
//! are enumerated beta-major, then gamma, then mu; that order only matters for
//! breaking ties.

use crate::domain::{ModelParameters, ParamRange};
use crate::error::FitError;

/// Generate `count` evenly spaced points between `min` and `max` (inclusive).
///
/// `count == 0` yields nothing and `count == 1` yields `[min]`. With two or more
/// points both endpoints are exact.
pub fn linspace(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (count as f64 - 1.0);
            let mut out: Vec<f64> = (0..count).map(|i| i as f64 * step + min).collect();
            out[count - 1] = max;
            out
        }
    }
}

/// Candidate values for each rate.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamGrid {
    pub betas: Vec<f64>,
    pub gammas: Vec<f64>,
    pub mus: Vec<f64>,
}

impl ParamGrid {
    pub fn new(betas: Vec<f64>, gammas: Vec<f64>, mus: Vec<f64>) -> Self {
        Self { betas, gammas, mus }
    }

    pub fn from_ranges(beta: ParamRange, gamma: ParamRange, mu: ParamRange) -> Self {
        Self {
            betas: linspace(beta.min, beta.max, beta.count),
            gammas: linspace(gamma.min, gamma.max, gamma.count),
            mus: linspace(mu.min, mu.max, mu.count),
        }
    }

    /// Number of candidate triples.
    pub fn len(&self) -> usize {
        self.betas.len() * self.gammas.len() * self.mus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ensure_non_empty(&self) -> Result<(), FitError> {
        if self.is_empty() { Err(FitError::EmptyGrid) } else { Ok(()) }
    }

    /// Candidate at enumeration position `idx`.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    pub fn candidate(&self, idx: usize) -> ModelParameters {
        let per_beta = self.gammas.len() * self.mus.len();
        let b = idx / per_beta;
        let rem = idx % per_beta;
        let g = rem / self.mus.len();
        let m = rem % self.mus.len();
        ModelParameters::new(self.betas[b], self.gammas[g], self.mus[m])
    }

    /// All candidates in enumeration order (beta outermost, mu innermost).
    pub fn candidates(&self) -> impl Iterator<Item = ModelParameters> + '_ {
        self.betas.iter().flat_map(move |&beta| {
            self.gammas.iter().flat_map(move |&gamma| {
                self.mus.iter().map(move |&mu| ModelParameters::new(beta, gamma, mu))
            })
        })
    }
}
