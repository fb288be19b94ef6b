//! Ground-truth CSV ingest.
//!
//! Expected schema (one row per day, contiguous from day 0):
//!
//! ```text
//! Jour,Susceptibles,Infectés,Rétablis,Décès
//! ```
//!
//! English aliases (`day`, `susceptible`, `infected`, `recovered`, `dead`) are
//! accepted too. Header matching is case-insensitive and ignores a UTF-8 BOM.
//!
//! Rows are compared to the forecast by position, so any malformed row fails
//! the whole load.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{info, warn};

use crate::domain::{Compartment, GroundTruth, Observation};
use crate::error::FitError;

const DAY_HEADERS: [&str; 2] = ["jour", "day"];

/// Load ground truth from a CSV file.
pub fn load_ground_truth(path: &Path) -> Result<GroundTruth, FitError> {
    let file = File::open(path)
        .map_err(|e| FitError::Io(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let truth = read_ground_truth(file)?;
    info!("Loaded {} ground-truth rows from {}", truth.len(), path.display());
    Ok(truth)
}

/// Parse ground truth from any CSV reader.
pub fn read_ground_truth<R: Read>(input: R) -> Result<GroundTruth, FitError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let header_map = build_header_map(&headers);

    let day_idx = find_column(&header_map, &DAY_HEADERS)
        .ok_or_else(|| FitError::Csv("Missing required column: `Jour` (or `day`)".to_string()))?;
    let mut value_idx = [0usize; 4];
    for c in Compartment::ALL {
        value_idx[c.index()] = find_column(&header_map, &compartment_headers(c)).ok_or_else(|| {
            FitError::Csv(format!("Missing required column: `{}`", c.csv_header()))
        })?;
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header line, and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| FitError::Csv(format!("line {line}: {e}")))?;

        let day = get(&record, day_idx, line)?
            .parse::<u32>()
            .map_err(|e| FitError::Csv(format!("line {line}: invalid day: {e}")))?;
        let mut row = Observation {
            day,
            susceptible: 0.0,
            infected: 0.0,
            recovered: 0.0,
            dead: 0.0,
        };
        for c in Compartment::ALL {
            row.set(c, parse_f64(get(&record, value_idx[c.index()], line)?, line, c)?);
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(FitError::DataUnavailable("ground-truth CSV has no data rows".to_string()));
    }
    if !rows.iter().enumerate().all(|(i, r)| r.day as usize == i) {
        warn!("Ground-truth days are not contiguous from 0; rows are still compared by position.");
    }

    Ok(GroundTruth::from_rows(&rows))
}

fn compartment_headers(c: Compartment) -> [&'static str; 2] {
    match c {
        Compartment::Susceptible => ["susceptibles", "susceptible"],
        Compartment::Infected => ["infectés", "infected"],
        Compartment::Recovered => ["rétablis", "recovered"],
        Compartment::Dead => ["décès", "dead"],
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|n| header_map.get(*n).copied())
}

fn get(record: &StringRecord, idx: usize, line: usize) -> Result<&str, FitError> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| FitError::Csv(format!("line {line}: missing value in column {}", idx + 1)))
}

fn parse_f64(s: &str, line: usize, c: Compartment) -> Result<f64, FitError> {
    let v = s
        .parse::<f64>()
        .map_err(|e| FitError::Csv(format!("line {line}: invalid `{}` value '{s}': {e}", c.csv_header())))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FitError::Csv(format!("line {line}: non-finite `{}` value", c.csv_header())))
    }
}
