//! ASCII plotting for terminal output.
//!
//! Fixed-size character grid, deterministic output. Eight series share the
//! canvas, one letter per compartment:
//!
//! - predicted trajectory: line drawn with the lowercase letter (`s i r d`)
//! - observed ground truth: uppercase letter at each observation (`S I R D`)

use crate::domain::{Compartment, GroundTruth, Trajectory};

/// Render predicted and observed series over the day axis.
pub fn render_ascii_plot(forecast: &Trajectory, truth: &GroundTruth, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let predicted: Vec<Vec<(f64, f64)>> = Compartment::ALL
        .iter()
        .map(|&c| forecast.time().iter().copied().zip(forecast.column(c).iter().copied()).collect())
        .collect();
    let observed: Vec<Vec<(f64, f64)>> = Compartment::ALL
        .iter()
        .map(|&c| {
            truth
                .days()
                .iter()
                .map(|&d| d as f64)
                .zip(truth.column(c).iter().copied())
                .collect()
        })
        .collect();

    let all = predicted.iter().chain(observed.iter()).flatten();
    let (x_min, x_max, y_min, y_max) = bounds(all).unwrap_or((0.0, 1.0, 0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so observation markers stay visible on top.
    for (c, series) in Compartment::ALL.iter().zip(&predicted) {
        let ch = c.letter().to_ascii_lowercase();
        draw_series(&mut grid, series, x_min, x_max, y_min, y_max, ch);
    }
    for (c, series) in Compartment::ALL.iter().zip(&observed) {
        for &(x, y) in series {
            let col = map_x(x, x_min, x_max, width);
            let row = map_y(y, y_min, y_max, height);
            grid[row][col] = c.letter();
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: day=[{x_min:.1}, {x_max:.1}] | y=[{y_min:.4}, {y_max:.4}]\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out.push_str("Legend: s/i/r/d predicted (line), S/I/R/D observed (points)\n");

    out
}

fn bounds<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> Option<(f64, f64, f64, f64)> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(x, y) in points {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !(x_min.is_finite() && y_min.is_finite()) {
        return None;
    }
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }
    Some((x_min, x_max, y_min, y_max))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Largest value on the top row.
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_series(grid: &mut [Vec<char>], series: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64, ch: char) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in series {
        if !(x.is_finite() && y.is_finite()) {
            prev = None;
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, ch),
            None => grid[row][col] = ch,
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let (mut x, mut y) = (x0 as isize, y0 as isize);
    let (x1, y1) = (x1 as isize, y1 as isize);

    let dx = (x1 - x).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let dy = -(y1 - y).abs();
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        let cell = &mut grid[y as usize][x as usize];
        if *cell == ' ' {
            *cell = ch;
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
