//! Write a ground-truth table to CSV.
//!
//! The output uses the same schema `ingest` reads, so a generated dataset can be
//! fed straight back into `sird fit`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::domain::GroundTruth;
use crate::error::FitError;

/// Write `truth` to a CSV file.
pub fn write_ground_truth_csv(path: &Path, truth: &GroundTruth) -> Result<(), FitError> {
    let file = File::create(path)
        .map_err(|e| FitError::Io(format!("Failed to create CSV '{}': {e}", path.display())))?;
    write_ground_truth(file, truth)?;
    info!("Wrote {} rows to {}", truth.len(), path.display());
    Ok(())
}

/// Write `truth` as CSV to any writer.
pub fn write_ground_truth<W: Write>(output: W, truth: &GroundTruth) -> Result<(), FitError> {
    let mut writer = csv::Writer::from_writer(output);
    for row in truth.rows() {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .map_err(|e| FitError::Io(format!("Failed to flush CSV: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Compartment, Observation};
    use crate::io::ingest::{load_ground_truth, read_ground_truth};

    fn truth() -> GroundTruth {
        GroundTruth::from_rows(&[
            Observation { day: 0, susceptible: 0.99, infected: 0.01, recovered: 0.0, dead: 0.0 },
            Observation { day: 1, susceptible: 0.98, infected: 0.015, recovered: 0.004, dead: 0.001 },
        ])
    }

    #[test]
    fn header_uses_dataset_column_names() {
        let mut buf = Vec::new();
        write_ground_truth(&mut buf, &truth()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        let expected: Vec<&str> = std::iter::once("Jour")
            .chain(Compartment::ALL.iter().map(|c| c.csv_header()))
            .collect();
        assert_eq!(header, expected.join(","));
    }

    #[test]
    fn written_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sird_dataset.csv");
        write_ground_truth_csv(&path, &truth()).unwrap();
        assert_eq!(load_ground_truth(&path).unwrap(), truth());

        let mut buf = Vec::new();
        write_ground_truth(&mut buf, &truth()).unwrap();
        assert_eq!(read_ground_truth(buf.as_slice()).unwrap(), truth());
    }
}
