//! Reporting utilities: residuals, summaries, and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{Dataset, ObservationResidual, RateParams, ResidualSummary};
use crate::error::AppError;
use crate::models::predict;

/// Compute predicted values and residuals for each observation.
pub fn compute_residuals(dataset: &Dataset, params: &RateParams) -> Result<Vec<ObservationResidual>, AppError> {
    let mut out = Vec::with_capacity(dataset.len());
    for (i, o) in dataset.iter().enumerate() {
        let predicted = predict(params, o);
        if !predicted.is_finite() {
            return Err(AppError::NonFinite(format!(
                "model prediction for observation {} during residual computation",
                i + 1
            )));
        }
        out.push(ObservationResidual {
            observation: *o,
            predicted,
            residual: o.rate - predicted,
        });
    }
    Ok(out)
}

/// Sum of squares, RMSE, and largest absolute residual.
pub fn summarize(residuals: &[ObservationResidual]) -> ResidualSummary {
    let n = residuals.len();
    let ssr: f64 = residuals.iter().map(|r| r.residual * r.residual).sum();
    let rmse = if n > 0 { (ssr / n as f64).sqrt() } else { 0.0 };
    let max_abs = residuals.iter().map(|r| r.residual.abs()).fold(0.0, f64::max);
    ResidualSummary { n, ssr, rmse, max_abs }
}

/// Common axis range for the parity plot: `[min, max]` over observed and
/// predicted values. `None` when there are no finite values.
pub fn parity_bounds(residuals: &[ObservationResidual]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for r in residuals {
        for v in [r.observation.rate, r.predicted] {
            if v.is_finite() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
    }
    if lo.is_finite() && hi.is_finite() {
        Some((lo, hi))
    } else {
        None
    }
}
