//! Exhaustive grid search over (beta, gamma, mu).
//!
//! Each candidate is integrated once, downsampled, and scored against ground
//! truth. Only a strictly lower score replaces the running best, so the first
//! minimal candidate in enumeration order wins ties (NaN never wins).
//!
//! The winner's trajectory is recomputed once at the end instead of keeping a
//! trajectory per candidate alive during the search.

use log::{debug, info, trace};
use rayon::prelude::*;

use crate::domain::{GroundTruth, ModelParameters, SimulationConfig, Trajectory};
use crate::error::FitError;
use crate::fit::grid::ParamGrid;
use crate::fit::score::{Score, score_forecast};
use crate::progress::SearchProgress;
use crate::sim::forecast;

/// Search behaviour that does not change the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Evaluate candidates on the rayon pool.
    ///
    /// The reduction still walks scores in enumeration order, so the selected
    /// candidate is identical to a sequential run.
    pub parallel: bool,
    /// Draw a terminal progress bar over the candidates.
    pub progress: bool,
}

/// Best candidate found by [`grid_search`].
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub params: ModelParameters,
    pub score: Score,
    /// Downsampled forecast of the winning parameters.
    pub trajectory: Trajectory,
    /// Position of the winner in enumeration order.
    pub candidate_index: usize,
    /// Number of candidates evaluated.
    pub evaluated: usize,
}

/// Evaluate every candidate of `grid` and return the lowest-scoring one.
///
/// Fails fast with [`FitError::ShapeMismatch`] when the configured horizon, step
/// and stride cannot produce one forecast point per ground-truth row. Any
/// scoring error aborts the whole search.
pub fn grid_search(
    grid: &ParamGrid,
    sim: &SimulationConfig,
    truth: &GroundTruth,
    opts: &SearchOptions,
) -> Result<SearchResult, FitError> {
    check_inputs(grid, sim, truth)?;

    let progress = SearchProgress::new("Grid search", grid.len(), opts.progress);
    let result = grid_search_with_progress(grid, sim, truth, opts, &progress);
    progress.finish();
    result
}

/// [`grid_search`] reporting each evaluated candidate to `progress`.
pub fn grid_search_with_progress(
    grid: &ParamGrid,
    sim: &SimulationConfig,
    truth: &GroundTruth,
    opts: &SearchOptions,
    progress: &SearchProgress,
) -> Result<SearchResult, FitError> {
    check_inputs(grid, sim, truth)?;

    let n = grid.len();
    info!(
        "Grid search: {} betas x {} gammas x {} mus = {n} candidates ({} steps each, parallel={})",
        grid.betas.len(),
        grid.gammas.len(),
        grid.mus.len(),
        sim.n_points(),
        opts.parallel,
    );

    let (candidate_index, score) = if opts.parallel {
        let scores: Vec<Result<Score, FitError>> = (0..n)
            .into_par_iter()
            .map(|idx| {
                let score = evaluate(&grid.candidate(idx), sim, truth);
                progress.increment();
                score
            })
            .collect();
        select_best(grid, scores)?
    } else {
        select_best(
            grid,
            grid.candidates().map(|params| {
                let score = evaluate(&params, sim, truth);
                progress.increment();
                score
            }),
        )?
    };

    let params = grid.candidate(candidate_index);
    info!(
        "Best candidate #{candidate_index}: beta={} gamma={} mu={} score={:.6}",
        params.beta, params.gamma, params.mu, score.total
    );

    Ok(SearchResult {
        params,
        score,
        trajectory: forecast(&params, sim),
        candidate_index,
        evaluated: n,
    })
}

fn check_inputs(grid: &ParamGrid, sim: &SimulationConfig, truth: &GroundTruth) -> Result<(), FitError> {
    grid.ensure_non_empty()?;

    let expected = sim.downsampled_len();
    if expected != truth.len() {
        return Err(FitError::ShapeMismatch {
            predicted: expected,
            observed: truth.len(),
        });
    }
    Ok(())
}

/// Score a single candidate.
pub fn evaluate(params: &ModelParameters, sim: &SimulationConfig, truth: &GroundTruth) -> Result<Score, FitError> {
    score_forecast(&forecast(params, sim), truth)
}

/// Walk scores in enumeration order, keeping the first strict minimum.
fn select_best<I>(grid: &ParamGrid, scores: I) -> Result<(usize, Score), FitError>
where
    I: IntoIterator<Item = Result<Score, FitError>>,
{
    let mut best: Option<(usize, Score)> = None;
    let mut best_total = f64::INFINITY;

    for (idx, score) in scores.into_iter().enumerate() {
        let score = score?;
        trace!("candidate #{idx} {:?} score={}", grid.candidate(idx), score.total);
        if score.total < best_total {
            debug!("new best #{idx} {:?} score={:.6}", grid.candidate(idx), score.total);
            best_total = score.total;
            best = Some((idx, score));
        }
    }

    best.ok_or(FitError::NoViableCandidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::State;

    fn sim(step: f64, horizon: f64, stride: usize, initial: State) -> SimulationConfig {
        SimulationConfig {
            step,
            horizon,
            stride,
            initial,
        }
    }

    fn truth_from(params: &ModelParameters, sim: &SimulationConfig) -> GroundTruth {
        GroundTruth::from_trajectory(&forecast(params, sim))
    }

    #[test]
    fn recovers_generating_parameters() {
        let cfg = sim(0.01, 90.0, 1000, State::new(0.99, 0.01, 0.0, 0.0));
        let truth_params = ModelParameters::new(0.3, 0.1, 0.02);
        let truth = truth_from(&truth_params, &cfg);

        let grid = ParamGrid::new(vec![0.1, 0.2, 0.3, 0.5], vec![0.05, 0.1, 0.3], vec![0.01, 0.02, 0.1]);
        for parallel in [false, true] {
            let result = grid_search(&grid, &cfg, &truth, &SearchOptions { parallel, progress: false }).unwrap();
            assert_eq!(result.params, truth_params);
            assert!(result.score.total.abs() < 1e-12);
            assert_eq!(result.evaluated, 36);
            assert_eq!(result.trajectory.len(), truth.len());
        }
    }

    #[test]
    fn ties_go_to_first_candidate_in_enumeration_order() {
        // With no infected, every candidate produces the same flat forecast.
        let cfg = sim(0.1, 20.0, 10, State::new(1.0, 0.0, 0.0, 0.0));
        let truth = truth_from(&ModelParameters::new(0.0, 0.0, 0.0), &cfg);
        let grid = ParamGrid::new(vec![0.5, 0.3], vec![0.2, 0.1], vec![0.05, 0.02]);

        for parallel in [false, true] {
            let result = grid_search(&grid, &cfg, &truth, &SearchOptions { parallel, progress: false }).unwrap();
            assert_eq!(result.candidate_index, 0);
            assert_eq!(result.params, ModelParameters::new(0.5, 0.2, 0.05));
            assert_eq!(result.score.total, 0.0);
        }
    }

    #[test]
    fn later_equal_score_does_not_replace_best() {
        let cfg = sim(0.1, 20.0, 10, State::new(0.9, 0.1, 0.0, 0.0));
        let target = ModelParameters::new(0.4, 0.1, 0.05);
        let truth = truth_from(&target, &cfg);
        // The exact match appears twice; the first one must win.
        let grid = ParamGrid::new(vec![0.2, 0.4, 0.4], vec![0.1], vec![0.05]);

        let result = grid_search(&grid, &cfg, &truth, &SearchOptions::default()).unwrap();
        assert_eq!(result.candidate_index, 1);
        assert_eq!(result.params, target);
    }

    #[test]
    fn progress_covers_every_candidate() {
        let cfg = sim(0.1, 20.0, 10, State::new(0.9, 0.1, 0.0, 0.0));
        let truth = truth_from(&ModelParameters::new(0.3, 0.1, 0.02), &cfg);
        let grid = ParamGrid::new(vec![0.1, 0.3, 0.5], vec![0.05, 0.1], vec![0.01, 0.02]);

        for parallel in [false, true] {
            let progress = SearchProgress::hidden(grid.len());
            let opts = SearchOptions { parallel, progress: false };
            let result = grid_search_with_progress(&grid, &cfg, &truth, &opts, &progress).unwrap();
            assert_eq!(progress.total(), grid.len());
            assert_eq!(progress.completed(), grid.len());
            assert_eq!(result.evaluated, progress.completed());
        }
    }

    #[test]
    fn misaligned_ground_truth_fails_before_searching() {
        let cfg = sim(0.01, 90.0, 1000, State::new(0.99, 0.01, 0.0, 0.0));
        let short = sim(0.01, 50.0, 1000, cfg.initial);
        let truth = truth_from(&ModelParameters::new(0.3, 0.1, 0.02), &short);

        let grid = ParamGrid::new(vec![0.3], vec![0.1], vec![0.02]);
        let err = grid_search(&grid, &cfg, &truth, &SearchOptions::default()).unwrap_err();
        assert!(matches!(err, FitError::ShapeMismatch { .. }));
    }

    #[test]
    fn empty_grid_is_rejected() {
        let cfg = sim(0.1, 1.0, 1, State::new(0.9, 0.1, 0.0, 0.0));
        let truth = truth_from(&ModelParameters::new(0.3, 0.1, 0.02), &cfg);
        let grid = ParamGrid::new(vec![], vec![0.1], vec![0.02]);
        let err = grid_search(&grid, &cfg, &truth, &SearchOptions::default()).unwrap_err();
        assert_eq!(err, FitError::EmptyGrid);
    }

    #[test]
    fn all_nan_scores_yield_no_viable_candidate() {
        let cfg = sim(0.1, 2.0, 1, State::new(0.9, 0.1, 0.0, 0.0));
        let truth = truth_from(&ModelParameters::new(0.3, 0.1, 0.02), &cfg);
        let grid = ParamGrid::new(vec![f64::NAN], vec![0.1], vec![0.02]);
        let err = grid_search(&grid, &cfg, &truth, &SearchOptions::default()).unwrap_err();
        assert_eq!(err, FitError::NoViableCandidate);
    }
}
