//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real main that parses the CLI,
//! installs logging, runs the fit or the generator, and prints the report.

use std::io::IsTerminal;

use clap::Parser;

use crate::cli::{Command, FitArgs, GenerateArgs};
use crate::data::{SyntheticConfig, generate_ground_truth};
use crate::domain::{FitConfig, ModelParameters, ParamRange, SimulationConfig, State};
use crate::error::FitError;
use crate::log::LogLevel;

pub mod pipeline;

/// Entry point for the `sird` binary.
pub fn run() -> Result<(), FitError> {
    let cli = crate::cli::Cli::parse();
    crate::log::init_logging(cli.log_level.into())?;

    let is_tty = std::io::stdout().is_terminal();
    match cli.command {
        Command::Fit(args) => handle_fit(&args, progress_enabled(&args, cli.log_level, is_tty)),
        Command::Generate(args) => handle_generate(&args),
        Command::Tui(args) => handle_tui(&args, progress_enabled(&args, cli.log_level, is_tty)),
    }
}

/// The search bar is drawn on stdout, so only for an interactive terminal and
/// never when logging is switched off.
pub fn progress_enabled(args: &FitArgs, level: LogLevel, stdout_is_tty: bool) -> bool {
    !args.no_progress && level != LogLevel::Off && stdout_is_tty
}

fn handle_fit(args: &FitArgs, show_progress: bool) -> Result<(), FitError> {
    let config = fit_config_from_args(args, show_progress);
    let run = pipeline::run_fit(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.truth, &run.sim, &run.grid, &run.result)
    );

    if args.top > 0 {
        let worst = crate::report::worst_days(&run.residuals, args.top);
        println!("{}", crate::report::format_residual_table(&worst));
    }

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.result.trajectory,
            &run.truth,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    Ok(())
}

fn handle_tui(args: &FitArgs, show_progress: bool) -> Result<(), FitError> {
    let config = fit_config_from_args(args, show_progress);
    let run = pipeline::run_fit(&config)?;
    crate::tui::run(&run)
}

fn handle_generate(args: &GenerateArgs) -> Result<(), FitError> {
    let config = synthetic_config_from_args(args);
    let truth = generate_ground_truth(&config)?;
    crate::io::export::write_ground_truth_csv(&args.output, &truth)?;
    println!("Wrote {} rows to {}", truth.len(), args.output.display());
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs, show_progress: bool) -> FitConfig {
    FitConfig {
        csv_path: args.csv.clone(),
        step: args.step,
        horizon: args.horizon,
        stride: args.stride,
        beta_range: ParamRange::new(args.beta_min, args.beta_max, args.beta_count),
        gamma_range: ParamRange::new(args.gamma_min, args.gamma_max, args.gamma_count),
        mu_range: ParamRange::new(args.mu_min, args.mu_max, args.mu_count),
        init_recovered: args.init_recovered,
        init_dead: args.init_dead,
        parallel: args.parallel,
        progress: show_progress,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
    }
}

pub fn synthetic_config_from_args(args: &GenerateArgs) -> SyntheticConfig {
    SyntheticConfig {
        params: ModelParameters::new(args.beta, args.gamma, args.mu),
        sim: SimulationConfig {
            step: args.step,
            horizon: args.horizon,
            stride: args.stride,
            initial: State::new(args.s0, args.i0, 0.0, 0.0),
        },
        noise: args.noise,
        seed: args.seed,
    }
}
