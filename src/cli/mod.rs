//! Command-line parsing for the SIRD grid-search fitter.
//!
//! Argument parsing and command dispatch live apart from the modeling code;
//! `app` turns these structs into `FitConfig`/`SyntheticConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    DEFAULT_BETA_RANGE, DEFAULT_GAMMA_RANGE, DEFAULT_HORIZON, DEFAULT_MU_RANGE, DEFAULT_STEP, DEFAULT_STRIDE,
};
use crate::log::LogLevel;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sird", version, about = "SIRD epidemic model fitter (Euler integration + grid search)")]
pub struct Cli {
    /// Diagnostic verbosity on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit beta, gamma and mu to a ground-truth CSV and print the report.
    Fit(FitArgs),
    /// Write a synthetic ground-truth CSV from known parameters.
    Generate(GenerateArgs),
    /// Run the fit, then show predicted vs observed curves in a terminal UI.
    Tui(FitArgs),
}

/// Options shared by `fit` and `tui`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Ground-truth CSV (`Jour,Susceptibles,Infectés,Rétablis,Décès`).
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Euler step size (days).
    #[arg(long, default_value_t = DEFAULT_STEP)]
    pub step: f64,

    /// Simulated horizon (days).
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    pub horizon: f64,

    /// Keep every N-th integration point when comparing with the data.
    #[arg(long, default_value_t = DEFAULT_STRIDE)]
    pub stride: usize,

    #[arg(long, default_value_t = DEFAULT_BETA_RANGE.min)]
    pub beta_min: f64,
    #[arg(long, default_value_t = DEFAULT_BETA_RANGE.max)]
    pub beta_max: f64,
    /// Number of beta values (inclusive linspace).
    #[arg(long, default_value_t = DEFAULT_BETA_RANGE.count)]
    pub beta_count: usize,

    #[arg(long, default_value_t = DEFAULT_GAMMA_RANGE.min)]
    pub gamma_min: f64,
    #[arg(long, default_value_t = DEFAULT_GAMMA_RANGE.max)]
    pub gamma_max: f64,
    /// Number of gamma values (inclusive linspace).
    #[arg(long, default_value_t = DEFAULT_GAMMA_RANGE.count)]
    pub gamma_count: usize,

    #[arg(long, default_value_t = DEFAULT_MU_RANGE.min)]
    pub mu_min: f64,
    #[arg(long, default_value_t = DEFAULT_MU_RANGE.max)]
    pub mu_max: f64,
    /// Number of mu values (inclusive linspace).
    #[arg(long, default_value_t = DEFAULT_MU_RANGE.count)]
    pub mu_count: usize,

    /// Initial recovered value (day-0 R is not taken from the CSV).
    #[arg(long = "init-r", default_value_t = 0.0)]
    pub init_recovered: f64,

    /// Initial dead value (day-0 D is not taken from the CSV).
    #[arg(long = "init-d", default_value_t = 0.0)]
    pub init_dead: f64,

    /// Evaluate candidates in parallel (same result as the sequential search).
    #[arg(long)]
    pub parallel: bool,

    /// Never draw the search progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Show the N days with the largest residuals (0 disables the table).
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

/// Options for `generate`.
#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Output CSV path.
    #[arg(short, long, value_name = "CSV", default_value = "sird_dataset.csv")]
    pub output: PathBuf,

    #[arg(long, default_value_t = 0.3)]
    pub beta: f64,
    #[arg(long, default_value_t = 0.1)]
    pub gamma: f64,
    #[arg(long, default_value_t = 0.02)]
    pub mu: f64,

    /// Initial susceptible fraction.
    #[arg(long = "s0", default_value_t = 0.99)]
    pub s0: f64,

    /// Initial infected fraction.
    #[arg(long = "i0", default_value_t = 0.01)]
    pub i0: f64,

    #[arg(long, default_value_t = DEFAULT_STEP)]
    pub step: f64,
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    pub horizon: f64,
    #[arg(long, default_value_t = DEFAULT_STRIDE)]
    pub stride: usize,

    /// Log-normal noise sigma (0 writes the exact trajectory).
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
