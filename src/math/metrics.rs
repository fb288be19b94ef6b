//! Error metrics between a predicted and an observed series.

use crate::error::FitError;

/// Root-mean-square error `sqrt(mean((p - t)^2))`.
///
/// Series are compared by position; no time alignment or interpolation.
pub fn rmse(predictions: &[f64], targets: &[f64]) -> Result<f64, FitError> {
    if predictions.len() != targets.len() {
        return Err(FitError::ShapeMismatch {
            predicted: predictions.len(),
            observed: targets.len(),
        });
    }
    if predictions.is_empty() {
        return Err(FitError::EmptySeries);
    }

    let sse: f64 = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| {
            let r = t - p;
            r * r
        })
        .sum();
    Ok((sse / predictions.len() as f64).sqrt())
}
