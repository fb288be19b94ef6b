//! Shared fit pipeline used by both the CLI and the TUI front-ends.
//!
//! CSV load -> initial state -> grid search -> residuals
//!
//! The front-ends only deal with presentation (printing vs widgets).

use crate::domain::{FitConfig, GroundTruth, SimulationConfig};
use crate::error::FitError;
use crate::fit::{ParamGrid, SearchOptions, SearchResult, grid_search};
use crate::io::ingest::load_ground_truth;
use crate::report::{DayResidual, compute_residuals};

/// All computed outputs of a single `sird fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub truth: GroundTruth,
    pub sim: SimulationConfig,
    pub grid: ParamGrid,
    pub result: SearchResult,
    pub residuals: Vec<DayResidual>,
}

/// Load the configured CSV and run the full pipeline.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, FitError> {
    config.validate()?;
    let truth = load_ground_truth(&config.csv_path)?;
    run_fit_with_truth(config, truth)
}

/// Run the pipeline against ground truth that is already in memory.
pub fn run_fit_with_truth(config: &FitConfig, truth: GroundTruth) -> Result<RunOutput, FitError> {
    config.validate()?;

    let initial = truth.initial_state(config.init_recovered, config.init_dead)?;
    let sim = config.simulation(initial);
    let grid = ParamGrid::from_ranges(config.beta_range, config.gamma_range, config.mu_range);

    let opts = SearchOptions {
        parallel: config.parallel,
        progress: config.progress,
    };
    let result = grid_search(&grid, &sim, &truth, &opts)?;

    let residuals = compute_residuals(&result.trajectory, &truth)?;

    Ok(RunOutput {
        truth,
        sim,
        grid,
        result,
        residuals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SyntheticConfig, generate_ground_truth};
    use crate::domain::{ModelParameters, ParamRange, State};
    use crate::io::export::write_ground_truth_csv;
    use std::path::PathBuf;

    fn config(csv_path: PathBuf) -> FitConfig {
        FitConfig {
            csv_path,
            step: 0.01,
            horizon: 40.0,
            stride: 100,
            beta_range: ParamRange::new(0.2, 0.4, 3),
            gamma_range: ParamRange::new(0.05, 0.15, 3),
            mu_range: ParamRange::new(0.01, 0.03, 3),
            init_recovered: 0.0,
            init_dead: 0.0,
            parallel: false,
            progress: false,
            plot: false,
            plot_width: 80,
            plot_height: 20,
        }
    }

    fn synthetic(cfg: &FitConfig) -> GroundTruth {
        generate_ground_truth(&SyntheticConfig {
            params: ModelParameters::new(0.3, 0.1, 0.02),
            sim: SimulationConfig {
                step: cfg.step,
                horizon: cfg.horizon,
                stride: cfg.stride,
                initial: State::new(0.99, 0.01, 0.0, 0.0),
            },
            noise: 0.0,
            seed: 1,
        })
        .unwrap()
    }

    #[test]
    fn csv_round_trip_recovers_generating_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truth.csv");
        let cfg = config(path.clone());
        write_ground_truth_csv(&path, &synthetic(&cfg)).unwrap();

        let run = run_fit(&cfg).unwrap();
        let p = run.result.params;
        assert!((p.beta - 0.3).abs() < 1e-12);
        assert!((p.gamma - 0.1).abs() < 1e-12);
        assert!((p.mu - 0.02).abs() < 1e-12);
        assert!(run.result.score.total < 1e-9);
        assert_eq!(run.residuals.len(), run.truth.len());
        assert_eq!(run.result.evaluated, 27);
    }

    #[test]
    fn horizon_mismatch_is_reported_before_searching() {
        let cfg = config(PathBuf::new());
        let truth = synthetic(&cfg);
        let short = FitConfig {
            horizon: 20.0,
            ..cfg
        };
        let err = run_fit_with_truth(&short, truth).unwrap_err();
        assert!(matches!(err, FitError::ShapeMismatch { predicted: 20, observed: 40 }));
    }

    #[test]
    fn invalid_config_is_rejected_before_loading() {
        let cfg = FitConfig {
            stride: 0,
            ..config(PathBuf::from("/definitely/not/here.csv"))
        };
        assert!(matches!(run_fit(&cfg), Err(FitError::InvalidConfig(_))));
    }
}
