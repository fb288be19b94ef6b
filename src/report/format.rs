//! Formatted terminal output for `sird fit`.

use crate::domain::{Compartment, GroundTruth, SimulationConfig};
use crate::fit::{ParamGrid, SearchResult};
use crate::models::r0;
use crate::report::DayResidual;

/// Winning parameters as three labelled numbers.
pub fn format_best_params(result: &SearchResult) -> String {
    format!(
        "Best parameters found:\nbeta: {} gamma: {} mu: {}\n",
        result.params.beta, result.params.gamma, result.params.mu
    )
}

/// Full run summary: dataset, search size, winner and its error breakdown.
pub fn format_run_summary(
    truth: &GroundTruth,
    sim: &SimulationConfig,
    grid: &ParamGrid,
    result: &SearchResult,
) -> String {
    let mut out = String::new();

    out.push_str("=== sird - SIRD grid-search fit ===\n");
    out.push_str(&format!(
        "Data: {} rows | initial S={:.6} I={:.6} R={:.6} D={:.6}\n",
        truth.len(),
        sim.initial.s,
        sim.initial.i,
        sim.initial.r,
        sim.initial.d,
    ));
    out.push_str(&format!(
        "Integration: step={} horizon={} -> {} points, stride={} -> {} compared\n",
        sim.step,
        sim.horizon,
        sim.n_points(),
        sim.stride,
        sim.downsampled_len(),
    ));
    out.push_str(&format!(
        "Grid: beta {} | gamma {} | mu {} ({} candidates)\n",
        fmt_axis(&grid.betas),
        fmt_axis(&grid.gammas),
        fmt_axis(&grid.mus),
        result.evaluated,
    ));

    out.push('\n');
    out.push_str(&format_best_params(result));
    out.push_str(&format!(
        "R0 = beta / (gamma + mu) = {:.4} | candidate #{}\n",
        r0(&result.params),
        result.candidate_index
    ));

    out.push_str("\nScore (sum of per-compartment RMSE):\n");
    for c in Compartment::ALL {
        out.push_str(&format!("  {:<12} {:.6}\n", c.display_name(), result.score.get(c)));
    }
    out.push_str(&format!("  {:<12} {:.6}\n", "total", result.score.total));

    out
}

/// Table of per-day residuals (observed - predicted).
pub fn format_residual_table(rows: &[DayResidual]) -> String {
    let mut out = String::new();
    out.push_str("Largest deviations (observed - predicted):\n");
    out.push_str(
        format!(
            "{:>5} {:>12} {:>12} {:>12} {:>12}",
            "day", "S", "I", "R", "D"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:->5} {:->12} {:->12} {:->12} {:->12}", "", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows {
        out.push_str(&format!(
            "{:>5} {:>12.6} {:>12.6} {:>12.6} {:>12.6}\n",
            r.day,
            r.get(Compartment::Susceptible),
            r.get(Compartment::Infected),
            r.get(Compartment::Recovered),
            r.get(Compartment::Dead),
        ));
    }

    out
}

fn fmt_axis(values: &[f64]) -> String {
    match values {
        [] => "[]".to_string(),
        [only] => format!("[{only}]"),
        [first, .., last] => format!("[{first:.4}..{last:.4}] x{}", values.len()),
    }
}
