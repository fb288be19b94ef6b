//! Reporting utilities: per-day residuals and the worst-fitting days.

pub mod format;

pub use format::*;

use crate::domain::{Compartment, GroundTruth, Trajectory};
use crate::error::FitError;

/// Observed minus predicted values for one ground-truth row.
#[derive(Debug, Clone, PartialEq)]
pub struct DayResidual {
    pub day: u32,
    pub residuals: [f64; 4],
}

impl DayResidual {
    pub fn get(&self, c: Compartment) -> f64 {
        self.residuals[c.index()]
    }

    /// Sum of absolute residuals across compartments.
    pub fn abs_total(&self) -> f64 {
        self.residuals.iter().map(|r| r.abs()).sum()
    }
}

/// Compute residuals row by row.
pub fn compute_residuals(forecast: &Trajectory, truth: &GroundTruth) -> Result<Vec<DayResidual>, FitError> {
    if forecast.len() != truth.len() {
        return Err(FitError::ShapeMismatch {
            predicted: forecast.len(),
            observed: truth.len(),
        });
    }

    let out = truth
        .days()
        .iter()
        .enumerate()
        .map(|(idx, &day)| DayResidual {
            day,
            residuals: Compartment::ALL.map(|c| truth.column(c)[idx] - forecast.column(c)[idx]),
        })
        .collect();
    Ok(out)
}

/// The `top_n` days with the largest absolute total residual, worst first.
pub fn worst_days(residuals: &[DayResidual], top_n: usize) -> Vec<DayResidual> {
    let mut sorted = residuals.to_vec();
    sorted.sort_by(|a, b| b.abs_total().partial_cmp(&a.abs_total()).unwrap_or(std::cmp::Ordering::Equal));
    sorted.truncate(top_n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, State};

    fn forecast_flat(n: usize) -> Trajectory {
        let mut traj = Trajectory::with_len(n);
        for idx in 0..n {
            traj.set(idx, idx as f64, &State::new(0.5, 0.5, 0.0, 0.0));
        }
        traj
    }

    #[test]
    fn residuals_are_observed_minus_predicted() {
        let truth = GroundTruth::from_rows(&[
            Observation { day: 0, susceptible: 0.5, infected: 0.5, recovered: 0.0, dead: 0.0 },
            Observation { day: 1, susceptible: 0.4, infected: 0.5, recovered: 0.1, dead: 0.0 },
        ]);
        let res = compute_residuals(&forecast_flat(2), &truth).unwrap();
        assert_eq!(res[0].abs_total(), 0.0);
        assert_eq!(res[1].day, 1);
        assert!((res[1].get(Compartment::Susceptible) + 0.1).abs() < 1e-12);
        assert!((res[1].get(Compartment::Recovered) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn worst_days_sorts_by_absolute_error() {
        let residuals = vec![
            DayResidual { day: 0, residuals: [0.0; 4] },
            DayResidual { day: 1, residuals: [-0.3, 0.0, 0.0, 0.0] },
            DayResidual { day: 2, residuals: [0.1, 0.1, 0.0, 0.0] },
        ];
        let worst = worst_days(&residuals, 2);
        assert_eq!(worst.len(), 2);
        assert_eq!(worst[0].day, 1);
        assert_eq!(worst[1].day, 2);
    }

    #[test]
    fn residuals_require_aligned_series() {
        let truth = GroundTruth::from_rows(&[Observation { day: 0, susceptible: 1.0, infected: 0.0, recovered: 0.0, dead: 0.0 }]);
        assert!(compute_residuals(&forecast_flat(2), &truth).is_err());
    }
}
