//! Error type shared by the library and the `sird` binary.
//!
//! Every variant maps to a process exit code:
//!
//! - `2`: bad input or configuration (the user can fix the invocation)
//! - `3`: the dataset cannot support a fit
//! - `4`: the search ran but could not produce a result

#[derive(Clone, PartialEq)]
pub enum FitError {
    /// Predicted and observed series have different lengths.
    ShapeMismatch { predicted: usize, observed: usize },
    /// Required reference data is missing (e.g. no day-0 row).
    DataUnavailable(String),
    /// RMSE over zero observations.
    EmptySeries,
    /// At least one parameter range has no candidates.
    EmptyGrid,
    /// Every candidate scored NaN.
    NoViableCandidate,
    /// Rejected configuration value.
    InvalidConfig(String),
    /// File system failure.
    Io(String),
    /// Malformed CSV.
    Csv(String),
    /// Terminal setup or drawing failure.
    Terminal(String),
}

impl FitError {
    pub fn exit_code(&self) -> u8 {
        match self {
            FitError::InvalidConfig(_) | FitError::Io(_) | FitError::Csv(_) => 2,
            FitError::DataUnavailable(_) | FitError::ShapeMismatch { .. } | FitError::EmptySeries => 3,
            FitError::EmptyGrid | FitError::NoViableCandidate | FitError::Terminal(_) => 4,
        }
    }
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::ShapeMismatch { predicted, observed } => write!(
                f,
                "Shape mismatch: model produced {predicted} points but ground truth has {observed} rows \
                 (check horizon, step and stride)."
            ),
            FitError::DataUnavailable(msg) => write!(f, "Data unavailable: {msg}"),
            FitError::EmptySeries => write!(f, "Cannot compute RMSE over an empty series."),
            FitError::EmptyGrid => write!(f, "Parameter grid is empty (every range needs count >= 1)."),
            FitError::NoViableCandidate => write!(f, "No candidate produced a finite score."),
            FitError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            FitError::Io(msg) => write!(f, "I/O error: {msg}"),
            FitError::Csv(msg) => write!(f, "CSV error: {msg}"),
            FitError::Terminal(msg) => write!(f, "Terminal error: {msg}"),
        }
    }
}

impl std::fmt::Debug for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FitError")
            .field("exit_code", &self.exit_code())
            .field("message", &self.to_string())
            .finish()
    }
}

impl std::error::Error for FitError {}

impl From<csv::Error> for FitError {
    fn from(err: csv::Error) -> Self {
        FitError::Csv(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(FitError::InvalidConfig("x".into()).exit_code(), 2);
        assert_eq!(FitError::DataUnavailable("x".into()).exit_code(), 3);
        assert_eq!(FitError::ShapeMismatch { predicted: 1, observed: 2 }.exit_code(), 3);
        assert_eq!(FitError::NoViableCandidate.exit_code(), 4);
    }

    #[test]
    fn shape_mismatch_message_names_both_lengths() {
        let msg = FitError::ShapeMismatch { predicted: 9, observed: 90 }.to_string();
        assert!(msg.contains('9') && msg.contains("90"));
    }
}
