//! Confidence intervals for the fitted coefficients.
//!
//! For each parameter `i`:
//!
//! ```text
//! half_width_i   = sqrt(cov_ii) · t(1 − α/2, n − p)
//! relative_pct_i = half_width_i / estimate_i · 100
//! ```
//!
//! The loop runs over the parameters (not the observations). Anything that
//! cannot be computed, such as zero degrees of freedom, an infinite or negative
//! variance, or a zero estimate, is reported as `None` ("undetermined").

use tracing::warn;

use crate::domain::{ConfidenceRow, ConfidenceTable, PARAM_NAMES, RegressionFit};
use crate::error::AppResult;
use crate::math::t_critical;

/// Build the confidence interval table for a fit at significance `alpha`.
pub fn confidence_intervals(fit: &RegressionFit, alpha: f64) -> AppResult<ConfidenceTable> {
    let estimates = fit.params.to_array();
    let variances = fit.variances();
    interval_table(&estimates, &variances, &PARAM_NAMES, fit.n, alpha)
}

/// Confidence intervals from raw estimates and covariance diagonal.
///
/// `n` is the number of observations; the parameter count is `estimates.len()`.
pub fn interval_table(
    estimates: &[f64],
    variances: &[f64],
    names: &[&str],
    n: usize,
    alpha: f64,
) -> AppResult<ConfidenceTable> {
    let p = estimates.len();
    let dof = n.saturating_sub(p);
    let t = t_critical(alpha, dof)?;
    if t.is_none() {
        warn!(n, p, "no degrees of freedom; confidence intervals are undetermined");
    }

    let rows = (0..p)
        .map(|i| {
            let estimate = estimates[i];
            let half_width = match (t, variances.get(i)) {
                (Some(t), Some(&var)) if var.is_finite() && var >= 0.0 => Some(var.sqrt() * t),
                _ => None,
            };
            let relative_pct = half_width
                .filter(|_| estimate != 0.0)
                .map(|hw| hw / estimate * 100.0)
                .filter(|v| v.is_finite());
            ConfidenceRow {
                name: names.get(i).map_or_else(|| format!("p{}", i + 1), |s| s.to_string()),
                estimate,
                half_width,
                relative_pct,
            }
        })
        .collect();

    Ok(ConfidenceTable {
        alpha,
        dof,
        t_critical: t,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn half_width_uses_t_critical() {
        let table = interval_table(&[2.0, -4.0], &[0.04, 0.25], &["x", "y"], 10, 0.05).unwrap();
        assert_eq!(table.dof, 8);
        let t = table.t_critical.unwrap();
        assert!((t - 2.306).abs() < 1e-3);

        let hw0 = table.rows[0].half_width.unwrap();
        assert!((hw0 - 0.2 * t).abs() < 1e-12);
        assert!((table.rows[0].relative_pct.unwrap() - hw0 / 2.0 * 100.0).abs() < 1e-12);
        // Signed, following the estimate.
        assert!(table.rows[1].relative_pct.unwrap() < 0.0);
        assert_eq!(table.rows[1].name, "y");
    }

    #[test]
    fn rows_follow_parameter_count_not_observation_count() {
        let table = interval_table(&[1.0, 2.0, 3.0], &[0.1, 0.1, 0.1], &["a", "b", "c"], 13, 0.05).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.dof, 10);
    }

    #[test]
    fn zero_dof_is_undetermined_not_a_number() {
        let table = interval_table(&[1.0; 5], &[0.1; 5], &PARAM_NAMES, 5, 0.05).unwrap();
        assert_eq!(table.dof, 0);
        assert_eq!(table.t_critical, None);
        assert!(table.rows.iter().all(|r| r.half_width.is_none() && r.relative_pct.is_none()));
        assert!(!table.is_determined());
    }

    #[test]
    fn infinite_variance_and_zero_estimate_are_undetermined() {
        let table = interval_table(&[1.0, 0.0], &[f64::INFINITY, 0.5], &["a", "b"], 10, 0.05).unwrap();
        assert!(table.rows[0].half_width.is_none());
        assert!(table.rows[1].half_width.is_some());
        assert!(table.rows[1].relative_pct.is_none());
    }

    #[test]
    fn missing_names_fall_back_to_positions() {
        let table = interval_table(&[1.0, 2.0], &[0.1, 0.1], &["a"], 10, 0.05).unwrap();
        assert_eq!(table.rows[1].name, "p2");
    }

    proptest! {
        #[test]
        fn wider_alpha_never_widens_intervals(
            var in 1e-6_f64..10.0,
            n in 6usize..60,
            a_small in 0.001_f64..0.5,
            delta in 0.0_f64..0.4,
        ) {
            let a_large = a_small + delta;
            let est = [1.0; 5];
            let vars = [var; 5];
            let tight = interval_table(&est, &vars, &PARAM_NAMES, n, a_large).unwrap();
            let loose = interval_table(&est, &vars, &PARAM_NAMES, n, a_small).unwrap();
            for (t, l) in tight.rows.iter().zip(&loose.rows) {
                prop_assert!(t.half_width.unwrap() <= l.half_width.unwrap() + 1e-12);
            }
        }
    }
}
