//! Forecast scoring.
//!
//! The score is the plain sum of the four per-compartment RMSEs. Compartments
//! are not weighted or normalised, so a compartment living on a larger scale
//! dominates the total.

use crate::domain::{Compartment, GroundTruth, Trajectory};
use crate::error::FitError;
use crate::math::rmse;

/// Per-compartment errors and their sum (lower is better).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub per_compartment: [f64; 4],
    pub total: f64,
}

impl Score {
    pub fn get(&self, c: Compartment) -> f64 {
        self.per_compartment[c.index()]
    }
}

/// Score a downsampled forecast against ground truth, row by row.
///
/// Both series must have the same length; the time axes are assumed to line up.
pub fn score_forecast(forecast: &Trajectory, truth: &GroundTruth) -> Result<Score, FitError> {
    if forecast.len() != truth.len() {
        return Err(FitError::ShapeMismatch {
            predicted: forecast.len(),
            observed: truth.len(),
        });
    }

    let mut per_compartment = [0.0; 4];
    for c in Compartment::ALL {
        per_compartment[c.index()] = rmse(forecast.column(c), truth.column(c))?;
    }
    let total = per_compartment.iter().sum();

    Ok(Score { per_compartment, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, State};

    fn forecast_of(states: &[State]) -> Trajectory {
        let mut traj = Trajectory::with_len(states.len());
        for (idx, s) in states.iter().enumerate() {
            traj.set(idx, idx as f64, s);
        }
        traj
    }

    fn truth_of(states: &[State]) -> GroundTruth {
        let rows: Vec<Observation> = states
            .iter()
            .enumerate()
            .map(|(day, s)| Observation {
                day: day as u32,
                susceptible: s.s,
                infected: s.i,
                recovered: s.r,
                dead: s.d,
            })
            .collect();
        GroundTruth::from_rows(&rows)
    }

    #[test]
    fn total_is_unweighted_sum_of_compartments() {
        let forecast = forecast_of(&[State::new(1.0, 0.0, 0.0, 0.0), State::new(1.0, 0.0, 0.0, 0.0)]);
        let truth = truth_of(&[State::new(0.0, 0.0, 2.0, 0.0), State::new(0.0, 0.0, 2.0, 0.0)]);

        let score = score_forecast(&forecast, &truth).unwrap();
        assert_eq!(score.get(Compartment::Susceptible), 1.0);
        assert_eq!(score.get(Compartment::Infected), 0.0);
        assert_eq!(score.get(Compartment::Recovered), 2.0);
        assert_eq!(score.get(Compartment::Dead), 0.0);
        assert_eq!(score.total, 3.0);
    }

    #[test]
    fn perfect_forecast_scores_zero() {
        let states = [State::new(0.9, 0.1, 0.0, 0.0), State::new(0.8, 0.15, 0.04, 0.01)];
        let score = score_forecast(&forecast_of(&states), &truth_of(&states)).unwrap();
        assert_eq!(score.total, 0.0);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let forecast = forecast_of(&[State::default(); 3]);
        let truth = truth_of(&[State::default(); 4]);
        let err = score_forecast(&forecast, &truth).unwrap_err();
        assert_eq!(err, FitError::ShapeMismatch { predicted: 3, observed: 4 });
    }
}
