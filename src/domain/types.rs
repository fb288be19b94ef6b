//! Shared domain types.
//!
//! Trajectories and ground truth are stored column-wise (one buffer per
//! compartment) because scoring and plotting both consume whole columns.

use std::path::PathBuf;

use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// One of the four SIRD compartments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compartment {
    Susceptible,
    Infected,
    Recovered,
    Dead,
}

impl Compartment {
    pub const ALL: [Compartment; 4] = [
        Compartment::Susceptible,
        Compartment::Infected,
        Compartment::Recovered,
        Compartment::Dead,
    ];

    /// Position of this compartment in state vectors and column arrays.
    pub fn index(self) -> usize {
        match self {
            Compartment::Susceptible => 0,
            Compartment::Infected => 1,
            Compartment::Recovered => 2,
            Compartment::Dead => 3,
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Compartment::Susceptible => "Susceptible",
            Compartment::Infected => "Infected",
            Compartment::Recovered => "Recovered",
            Compartment::Dead => "Dead",
        }
    }

    /// Single-letter tag (`S`, `I`, `R`, `D`).
    pub fn letter(self) -> char {
        match self {
            Compartment::Susceptible => 'S',
            Compartment::Infected => 'I',
            Compartment::Recovered => 'R',
            Compartment::Dead => 'D',
        }
    }

    /// Column header used by the ground-truth CSV.
    pub fn csv_header(self) -> &'static str {
        match self {
            Compartment::Susceptible => "Susceptibles",
            Compartment::Infected => "Infectés",
            Compartment::Recovered => "Rétablis",
            Compartment::Dead => "Décès",
        }
    }
}

/// Rate parameters of the SIRD model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParameters {
    /// Infection rate.
    pub beta: f64,
    /// Recovery rate.
    pub gamma: f64,
    /// Mortality rate.
    pub mu: f64,
}

impl ModelParameters {
    pub fn new(beta: f64, gamma: f64, mu: f64) -> Self {
        Self { beta, gamma, mu }
    }
}

/// Population fractions (or counts) per compartment at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct State {
    pub s: f64,
    pub i: f64,
    pub r: f64,
    pub d: f64,
}

impl State {
    pub fn new(s: f64, i: f64, r: f64, d: f64) -> Self {
        Self { s, i, r, d }
    }

    pub fn get(&self, c: Compartment) -> f64 {
        match c {
            Compartment::Susceptible => self.s,
            Compartment::Infected => self.i,
            Compartment::Recovered => self.r,
            Compartment::Dead => self.d,
        }
    }

    /// S + I + R + D. Conserved by the dynamics up to rounding.
    pub fn total(&self) -> f64 {
        self.s + self.i + self.r + self.d
    }

    pub fn to_vector(self) -> Vector4<f64> {
        Vector4::new(self.s, self.i, self.r, self.d)
    }

    pub fn from_vector(v: &Vector4<f64>) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// Integration settings for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Euler step size (days).
    pub step: f64,
    /// Simulated duration (days).
    pub horizon: f64,
    /// Keep every `stride`-th point when downsampling.
    pub stride: usize,
    pub initial: State,
}

impl SimulationConfig {
    /// Number of integration points, `floor(horizon / step)`, never below one.
    pub fn n_points(&self) -> usize {
        let ratio = (self.horizon / self.step).floor();
        if ratio.is_finite() && ratio >= 1.0 {
            ratio as usize
        } else {
            1
        }
    }

    /// Length of the downsampled trajectory this config produces.
    pub fn downsampled_len(&self) -> usize {
        let stride = self.stride.max(1);
        (self.n_points() - 1) / stride + 1
    }

    /// Reject step, horizon and stride values that cannot produce a trajectory,
    /// including point counts above [`MAX_POINTS`].
    pub fn validate(&self) -> Result<(), FitError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(FitError::InvalidConfig(format!("step must be finite and > 0 (got {})", self.step)));
        }
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(FitError::InvalidConfig(format!(
                "horizon must be finite and > 0 (got {})",
                self.horizon
            )));
        }
        if self.stride == 0 {
            return Err(FitError::InvalidConfig("stride must be >= 1".to_string()));
        }
        let ratio = (self.horizon / self.step).floor();
        if !(ratio <= MAX_POINTS as f64) {
            return Err(FitError::InvalidConfig(format!(
                "horizon / step = {ratio:e} integration points exceeds the limit of {MAX_POINTS}"
            )));
        }
        Ok(())
    }
}

/// A simulated time series, one buffer per compartment.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    time: Vec<f64>,
    columns: [Vec<f64>; 4],
}

impl Trajectory {
    /// Zero-filled trajectory with room for exactly `len` points.
    pub fn with_len(len: usize) -> Self {
        Self {
            time: vec![0.0; len],
            columns: [vec![0.0; len], vec![0.0; len], vec![0.0; len], vec![0.0; len]],
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn column(&self, c: Compartment) -> &[f64] {
        &self.columns[c.index()]
    }

    /// # Panics
    /// Panics if `idx >= self.len()`.
    pub fn state_at(&self, idx: usize) -> State {
        State::new(
            self.columns[0][idx],
            self.columns[1][idx],
            self.columns[2][idx],
            self.columns[3][idx],
        )
    }

    /// Overwrite point `idx`.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    pub fn set(&mut self, idx: usize, t: f64, state: &State) {
        self.time[idx] = t;
        for c in Compartment::ALL {
            self.columns[c.index()][idx] = state.get(c);
        }
    }

    /// Keep indices `0, stride, 2 * stride, …` of every column.
    ///
    /// A stride of 0 is treated as 1.
    pub fn downsample(&self, stride: usize) -> Trajectory {
        let stride = stride.max(1);
        let pick = |v: &Vec<f64>| v.iter().step_by(stride).copied().collect::<Vec<f64>>();
        Trajectory {
            time: pick(&self.time),
            columns: [
                pick(&self.columns[0]),
                pick(&self.columns[1]),
                pick(&self.columns[2]),
                pick(&self.columns[3]),
            ],
        }
    }
}

/// One row of the reference dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "Jour")]
    pub day: u32,
    #[serde(rename = "Susceptibles")]
    pub susceptible: f64,
    #[serde(rename = "Infectés")]
    pub infected: f64,
    #[serde(rename = "Rétablis")]
    pub recovered: f64,
    #[serde(rename = "Décès")]
    pub dead: f64,
}

impl Observation {
    pub fn get(&self, c: Compartment) -> f64 {
        match c {
            Compartment::Susceptible => self.susceptible,
            Compartment::Infected => self.infected,
            Compartment::Recovered => self.recovered,
            Compartment::Dead => self.dead,
        }
    }

    pub fn set(&mut self, c: Compartment, v: f64) {
        match c {
            Compartment::Susceptible => self.susceptible = v,
            Compartment::Infected => self.infected = v,
            Compartment::Recovered => self.recovered = v,
            Compartment::Dead => self.dead = v,
        }
    }
}

/// Reference observations, one row per day, stored column-wise.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundTruth {
    days: Vec<u32>,
    columns: [Vec<f64>; 4],
}

impl GroundTruth {
    pub fn from_rows(rows: &[Observation]) -> Self {
        Self {
            days: rows.iter().map(|r| r.day).collect(),
            columns: [
                rows.iter().map(|r| r.susceptible).collect(),
                rows.iter().map(|r| r.infected).collect(),
                rows.iter().map(|r| r.recovered).collect(),
                rows.iter().map(|r| r.dead).collect(),
            ],
        }
    }

    /// Build ground truth from a simulated trajectory; days are the rounded
    /// time values.
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        Self {
            days: trajectory.time().iter().map(|t| t.round().max(0.0) as u32).collect(),
            columns: Compartment::ALL.map(|c| trajectory.column(c).to_vec()),
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn days(&self) -> &[u32] {
        &self.days
    }

    pub fn column(&self, c: Compartment) -> &[f64] {
        &self.columns[c.index()]
    }

    pub fn rows(&self) -> Vec<Observation> {
        (0..self.len())
            .map(|idx| Observation {
                day: self.days[idx],
                susceptible: self.columns[0][idx],
                infected: self.columns[1][idx],
                recovered: self.columns[2][idx],
                dead: self.columns[3][idx],
            })
            .collect()
    }

    /// Initial state from the day-0 row: S and I come from the data, R and D
    /// are supplied by the caller (zero unless overridden).
    pub fn initial_state(&self, recovered: f64, dead: f64) -> Result<State, FitError> {
        let idx = self
            .days
            .iter()
            .position(|&d| d == 0)
            .ok_or_else(|| FitError::DataUnavailable("ground truth has no row for day 0".to_string()))?;
        Ok(State::new(self.columns[0][idx], self.columns[1][idx], recovered, dead))
    }
}

/// Inclusive `(min, max)` range sampled at `count` evenly spaced points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64, count: usize) -> Self {
        Self { min, max, count }
    }
}

/// Upper bound on integration points per trajectory (five `f64` buffers each).
pub const MAX_POINTS: usize = 10_000_000;

pub const DEFAULT_STEP: f64 = 0.001;
pub const DEFAULT_HORIZON: f64 = 90.0;
pub const DEFAULT_STRIDE: usize = 1000;
pub const DEFAULT_BETA_RANGE: ParamRange = ParamRange::new(0.1, 1.0, 20);
pub const DEFAULT_GAMMA_RANGE: ParamRange = ParamRange::new(0.1, 1.0, 4);
// Mortality is usually much smaller than the other two rates.
pub const DEFAULT_MU_RANGE: ParamRange = ParamRange::new(0.01, 0.5, 4);

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub csv_path: PathBuf,

    pub step: f64,
    pub horizon: f64,
    pub stride: usize,

    pub beta_range: ParamRange,
    pub gamma_range: ParamRange,
    pub mu_range: ParamRange,

    /// Initial recovered value (the CSV only provides S and I at day 0).
    pub init_recovered: f64,
    /// Initial dead value.
    pub init_dead: f64,

    /// Evaluate candidates on the rayon pool.
    pub parallel: bool,
    /// Show a progress bar while searching.
    pub progress: bool,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

impl FitConfig {
    /// Reject values that would make the run meaningless before any work starts.
    ///
    /// Rates themselves are not checked: degenerate parameters simply score badly.
    pub fn validate(&self) -> Result<(), FitError> {
        self.simulation(State::default()).validate()?;
        for (name, range) in [("beta", self.beta_range), ("gamma", self.gamma_range), ("mu", self.mu_range)] {
            if !(range.min.is_finite() && range.max.is_finite()) {
                return Err(FitError::InvalidConfig(format!("{name} range bounds must be finite")));
            }
            if range.count == 0 {
                return Err(FitError::InvalidConfig(format!("{name} range needs count >= 1")));
            }
        }
        Ok(())
    }

    pub fn simulation(&self, initial: State) -> SimulationConfig {
        SimulationConfig {
            step: self.step,
            horizon: self.horizon,
            stride: self.stride,
            initial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(step: f64, horizon: f64, stride: usize) -> SimulationConfig {
        SimulationConfig {
            step,
            horizon,
            stride,
            initial: State::default(),
        }
    }

    #[test]
    fn n_points_floors_ratio_and_never_drops_initial_point() {
        assert_eq!(sim(0.5, 10.0, 1).n_points(), 20);
        assert_eq!(sim(0.3, 1.0, 1).n_points(), 3);
        assert_eq!(sim(1.0, 1.0, 1).n_points(), 1);
        assert_eq!(sim(2.0, 1.0, 1).n_points(), 1);
        assert_eq!(sim(1.0, -5.0, 1).n_points(), 1);
    }

    #[test]
    fn downsampled_len_matches_stride_arithmetic() {
        assert_eq!(sim(0.25, 22_500.0, 1000).downsampled_len(), 90);
        assert_eq!(sim(1.0, 5.0, 1000).downsampled_len(), 1);
        assert_eq!(sim(1.0, 1001.0, 1000).downsampled_len(), 2);
    }

    #[test]
    fn simulation_validate_rejects_unusable_grids() {
        assert!(sim(0.001, 90.0, 1000).validate().is_ok());
        assert!(matches!(sim(0.0, 90.0, 1).validate(), Err(FitError::InvalidConfig(_))));
        assert!(matches!(sim(0.1, f64::NAN, 1).validate(), Err(FitError::InvalidConfig(_))));
        assert!(matches!(sim(0.1, 90.0, 0).validate(), Err(FitError::InvalidConfig(_))));
        // Would otherwise saturate the point count and exhaust memory.
        assert!(matches!(sim(1e-300, 90.0, 1000).validate(), Err(FitError::InvalidConfig(_))));
        assert!(sim(1.0, MAX_POINTS as f64, 1).validate().is_ok());
        assert!(sim(1.0, MAX_POINTS as f64 + 1.0, 1).validate().is_err());
    }

    #[test]
    fn fit_config_validate_covers_simulation_limits() {
        let config = FitConfig {
            csv_path: PathBuf::new(),
            step: 1e-300,
            horizon: DEFAULT_HORIZON,
            stride: DEFAULT_STRIDE,
            beta_range: DEFAULT_BETA_RANGE,
            gamma_range: DEFAULT_GAMMA_RANGE,
            mu_range: DEFAULT_MU_RANGE,
            init_recovered: 0.0,
            init_dead: 0.0,
            parallel: false,
            progress: false,
            plot: false,
            plot_width: 80,
            plot_height: 20,
        };
        assert!(matches!(config.validate(), Err(FitError::InvalidConfig(_))));
        let ok = FitConfig { step: DEFAULT_STEP, ..config };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn initial_state_reads_day_zero_row() {
        let rows = [
            Observation { day: 1, susceptible: 0.9, infected: 0.08, recovered: 0.01, dead: 0.01 },
            Observation { day: 0, susceptible: 0.99, infected: 0.01, recovered: 0.5, dead: 0.5 },
        ];
        let truth = GroundTruth::from_rows(&rows);
        let init = truth.initial_state(0.0, 0.0).unwrap();
        assert_eq!(init, State::new(0.99, 0.01, 0.0, 0.0));

        let init = truth.initial_state(0.2, 0.1).unwrap();
        assert_eq!(init.r, 0.2);
        assert_eq!(init.d, 0.1);
    }

    #[test]
    fn initial_state_without_day_zero_is_data_unavailable() {
        let rows = [Observation { day: 3, susceptible: 0.9, infected: 0.1, recovered: 0.0, dead: 0.0 }];
        let err = GroundTruth::from_rows(&rows).initial_state(0.0, 0.0).unwrap_err();
        assert!(matches!(err, FitError::DataUnavailable(_)));
    }

    #[test]
    fn downsample_with_zero_stride_keeps_everything() {
        let mut traj = Trajectory::with_len(3);
        for i in 0..3 {
            traj.set(i, i as f64, &State::new(i as f64, 0.0, 0.0, 0.0));
        }
        assert_eq!(traj.downsample(0), traj);
    }
}
