//! Ratatui-based terminal UI.
//!
//! Shows the fitted forecast against the ground truth for all four
//! compartments, plus the winning parameters and their error breakdown.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::pipeline::RunOutput;
use crate::domain::Compartment;
use crate::error::FitError;
use crate::models::r0;

mod plotters_chart;

use plotters_chart::{ChartSeries, SeriesKind, SirdPlottersChart};

/// Start the TUI over a finished fit.
pub fn run(output: &RunOutput) -> Result<(), FitError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| FitError::Terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(output);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, FitError> {
        enable_raw_mode().map_err(|e| FitError::Terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(FitError::Terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App<'a> {
    run: &'a RunOutput,
    show_predicted: bool,
    show_observed: bool,
    status: String,
}

impl<'a> App<'a> {
    fn new(run: &'a RunOutput) -> Self {
        Self {
            run,
            show_predicted: true,
            show_observed: true,
            status: format!("{} candidates evaluated", run.result.evaluated),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), FitError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| FitError::Terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| FitError::Terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| FitError::Terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the UI should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('p') => {
                self.show_predicted = !self.show_predicted;
                self.status = format!("predicted: {}", on_off(self.show_predicted));
            }
            KeyCode::Char('o') => {
                self.show_observed = !self.show_observed;
                self.status = format!("observed: {}", on_off(self.show_observed));
            }
            _ => {}
        }
        false
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let result = &self.run.result;
        let sim = &self.run.sim;
        let lines = vec![
            Line::from(vec![
                Span::styled("sird", Style::default().fg(Color::Cyan)),
                Span::raw(" - SIRD grid-search fit"),
            ]),
            Line::from(Span::styled(
                format!(
                    "beta={} gamma={} mu={} | R0={:.3} | score={:.6}",
                    result.params.beta,
                    result.params.gamma,
                    result.params.mu,
                    r0(&result.params),
                    result.score.total,
                ),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!(
                    "rows={} | step={} horizon={} stride={}",
                    self.run.truth.len(),
                    sim.step,
                    sim.horizon,
                    sim.stride,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(28)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_legend(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Predicted vs observed").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let (series, x_bounds, y_bounds) = chart_series(self.run, self.show_predicted, self.show_observed);
        if series.is_empty() {
            let msg = Paragraph::new("All series hidden (p / o to toggle).").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let (chart_rect, insets) = chart_layout(inner);
        let widget = SirdPlottersChart {
            series: &series,
            x_bounds,
            y_bounds,
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds);
        }
    }

    fn draw_legend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines = vec![Line::from(Span::styled(
            "RMSE per compartment",
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        for c in Compartment::ALL {
            lines.push(Line::from(vec![
                Span::styled("■ ", Style::default().fg(ratatui_color(c))),
                Span::raw(format!("{:<12} {:.5}", c.display_name(), self.run.result.score.get(c))),
            ]));
        }
        lines.push(Line::from(format!("  {:<12} {:.5}", "total", self.run.result.score.total)));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "line = predicted",
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(Span::styled(
            "dots = observed",
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Legend").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "p predicted  o observed  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn on_off(v: bool) -> &'static str {
    if v { "on" } else { "off" }
}

fn series_color(c: Compartment) -> RGBColor {
    match c {
        Compartment::Susceptible => RGBColor(0, 170, 255),
        Compartment::Infected => RGBColor(255, 80, 80),
        Compartment::Recovered => RGBColor(0, 220, 0),
        Compartment::Dead => RGBColor(200, 200, 200),
    }
}

fn ratatui_color(c: Compartment) -> Color {
    let RGBColor(r, g, b) = series_color(c);
    Color::Rgb(r, g, b)
}

/// Build chart series and shared bounds for the visible layers.
fn chart_series(run: &RunOutput, predicted: bool, observed: bool) -> (Vec<ChartSeries>, [f64; 2], [f64; 2]) {
    let forecast = &run.result.trajectory;
    let truth = &run.truth;

    let mut series = Vec::with_capacity(8);
    for c in Compartment::ALL {
        if predicted {
            series.push(ChartSeries {
                points: forecast.time().iter().copied().zip(forecast.column(c).iter().copied()).collect(),
                color: series_color(c),
                kind: SeriesKind::Line,
            });
        }
        if observed {
            series.push(ChartSeries {
                points: truth
                    .days()
                    .iter()
                    .map(|&d| d as f64)
                    .zip(truth.column(c).iter().copied())
                    .collect(),
                color: series_color(c),
                kind: SeriesKind::Points,
            });
        }
    }

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in series.iter().flat_map(|s| s.points.iter()) {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !x_min.is_finite() || !x_max.is_finite() || x_max <= x_min {
        x_min = 0.0;
        x_max = 1.0;
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    (series, [x_min, x_max], [y_min - pad, y_max + pad])
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{x_val:.0}");
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.2}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("day")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("frac").style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_fit_with_truth;
    use crate::domain::{FitConfig, GroundTruth, ModelParameters, ParamRange, SimulationConfig, State};
    use crate::sim::forecast;
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;

    fn run_output() -> RunOutput {
        let config = FitConfig {
            csv_path: PathBuf::new(),
            step: 0.1,
            horizon: 30.0,
            stride: 10,
            beta_range: ParamRange::new(0.2, 0.4, 3),
            gamma_range: ParamRange::new(0.1, 0.1, 1),
            mu_range: ParamRange::new(0.02, 0.02, 1),
            init_recovered: 0.0,
            init_dead: 0.0,
            parallel: false,
            progress: false,
            plot: false,
            plot_width: 80,
            plot_height: 20,
        };
        let sim = SimulationConfig {
            step: 0.1,
            horizon: 30.0,
            stride: 10,
            initial: State::new(0.99, 0.01, 0.0, 0.0),
        };
        let truth = GroundTruth::from_trajectory(&forecast(&ModelParameters::new(0.3, 0.1, 0.02), &sim));
        run_fit_with_truth(&config, truth).unwrap()
    }

    #[test]
    fn chart_series_follow_toggles() {
        let run = run_output();
        let (all, x, y) = chart_series(&run, true, true);
        assert_eq!(all.len(), 8);
        assert_eq!(x[0], 0.0);
        assert!(y[0] < 0.0 && y[1] > 0.99);

        let (only_obs, _, _) = chart_series(&run, false, true);
        assert_eq!(only_obs.len(), 4);
        assert!(only_obs.iter().all(|s| s.kind == SeriesKind::Points));

        let (none, x, y) = chart_series(&run, false, false);
        assert!(none.is_empty());
        assert_eq!(x, [0.0, 1.0]);
        assert!(y[0] < 0.0 && y[1] > 1.0);
    }

    #[test]
    fn keys_toggle_layers_and_quit() {
        let run = run_output();
        let mut app = App::new(&run);
        assert!(!app.handle_key(KeyCode::Char('p')));
        assert!(!app.show_predicted);
        assert!(!app.handle_key(KeyCode::Char('o')));
        assert!(!app.show_observed);
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Esc));
    }

    #[test]
    fn draws_header_with_winning_parameters() {
        let run = run_output();
        let app = App::new(&run);
        let mut terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("SIRD grid-search fit"));
        assert!(text.contains("R0="));
        assert!(text.contains("q quit"));
    }
}
