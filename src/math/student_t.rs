//! Student-t critical values for confidence intervals.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{AppError, AppResult};

/// Two-sided critical value `t(1 − α/2, dof)`.
///
/// Returns `Ok(None)` when `dof = 0`: the distribution is undefined and the
/// interval is unbounded, which callers report as "undetermined".
pub fn t_critical(alpha: f64, dof: usize) -> AppResult<Option<f64>> {
    validate_alpha(alpha)?;
    if dof == 0 {
        return Ok(None);
    }
    let dist = StudentsT::new(0.0, 1.0, dof as f64)
        .map_err(|e| AppError::InvalidInput(format!("Student-t distribution with dof={dof}: {e}")))?;
    let t = dist.inverse_cdf(1.0 - alpha / 2.0);
    if !t.is_finite() {
        return Err(AppError::NonFinite(format!("t-critical for alpha={alpha}, dof={dof}")));
    }
    Ok(Some(t))
}

/// Significance levels must lie strictly inside (0, 1).
pub fn validate_alpha(alpha: f64) -> AppResult<()> {
    if alpha.is_finite() && alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Significance level must be in (0, 1), got {alpha}."
        )))
    }
}
