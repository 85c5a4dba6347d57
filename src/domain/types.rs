//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and solving
//! - read from JSON configuration and CSV files
//! - exported to JSON/CSV reports

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Number of fitted rate-law coefficients.
pub const PARAM_COUNT: usize = 5;

/// Display names of the rate-law coefficients, in positional order.
pub const PARAM_NAMES: [&str; PARAM_COUNT] = ["b1", "b2", "b3", "b4", "b5"];

/// Default significance level (0.05 → 95% confidence intervals).
pub const DEFAULT_ALPHA: f64 = 0.05;

/// A single rate observation: three concentrations and the measured rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub ca: f64,
    pub cb: f64,
    pub cc: f64,
    pub rate: f64,
}

impl Observation {
    pub fn new(ca: f64, cb: f64, cc: f64, rate: f64) -> Self {
        Self { ca, cb, cc, rate }
    }

    pub fn is_finite(&self) -> bool {
        self.ca.is_finite() && self.cb.is_finite() && self.cc.is_finite() && self.rate.is_finite()
    }
}

/// An ordered set of observations.
///
/// Storing rows (rather than four parallel columns) makes the "all columns
/// have length N" invariant structural; the column views are derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    pub observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn ca(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.ca).collect()
    }

    pub fn cb(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.cb).collect()
    }

    pub fn cc(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.cc).collect()
    }

    pub fn rates(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.rate).collect()
    }
}

/// Rate-law coefficients β1..β5.
///
/// The model is
///
/// ```text
/// r = (b1·C_B − C_C/b5) / (1 + b2·C_A + b3·C_B + b4·C_C)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateParams {
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
    pub b4: f64,
    pub b5: f64,
}

impl RateParams {
    pub fn new(b1: f64, b2: f64, b3: f64, b4: f64, b5: f64) -> Self {
        Self { b1, b2, b3, b4, b5 }
    }

    pub fn from_array(v: [f64; PARAM_COUNT]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4])
    }

    /// Build parameters from a slice, checking its length.
    pub fn from_slice(v: &[f64]) -> Result<Self, AppError> {
        let arr: [f64; PARAM_COUNT] = v.try_into().map_err(|_| {
            AppError::InvalidInput(format!(
                "Expected {PARAM_COUNT} rate-law parameters, got {}.",
                v.len()
            ))
        })?;
        Ok(Self::from_array(arr))
    }

    pub fn to_array(self) -> [f64; PARAM_COUNT] {
        [self.b1, self.b2, self.b3, self.b4, self.b5]
    }

    pub fn to_dvector(self) -> DVector<f64> {
        DVector::from_row_slice(&self.to_array())
    }

    /// Read parameters back from a solver vector, checking its length.
    pub fn from_dvector(v: &DVector<f64>) -> Result<Self, AppError> {
        Self::from_slice(v.as_slice())
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Reference initial guess for the rate-law fit.
impl Default for RateParams {
    fn default() -> Self {
        Self::new(1.0, 0.1, 0.1, 0.1, 1.0)
    }
}

/// Output of the least-squares fit.
#[derive(Debug, Clone)]
pub struct RegressionFit {
    pub params: RateParams,
    /// Estimated covariance of `params` (P×P). Entries are `+inf` when the
    /// covariance cannot be estimated (no degrees of freedom, rank-deficient Jacobian).
    pub covariance: DMatrix<f64>,
    /// Sum of squared residuals at the optimum.
    pub ssr: f64,
    /// Number of observations.
    pub n: usize,
    /// Number of fitted parameters.
    pub p: usize,
    /// Human-readable solver termination reason.
    pub termination: String,
    /// Number of residual evaluations used by the solver.
    pub evaluations: usize,
}

impl RegressionFit {
    /// Degrees of freedom, `max(0, n - p)`.
    pub fn dof(&self) -> usize {
        self.n.saturating_sub(self.p)
    }

    /// Diagonal of the covariance matrix (parameter variances).
    pub fn variances(&self) -> Vec<f64> {
        self.covariance.diagonal().iter().copied().collect()
    }
}

/// One row of the confidence interval table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceRow {
    pub name: String,
    pub estimate: f64,
    /// Half-width of the interval; `None` when undetermined.
    pub half_width: Option<f64>,
    /// Half-width as a percentage of the estimate; `None` when undetermined.
    pub relative_pct: Option<f64>,
}

/// Confidence intervals for all fitted parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceTable {
    pub alpha: f64,
    pub dof: usize,
    /// Two-sided Student-t critical value; `None` when `dof = 0`.
    pub t_critical: Option<f64>,
    pub rows: Vec<ConfidenceRow>,
}

impl ConfidenceTable {
    /// Confidence level in percent (e.g. 95 for `alpha = 0.05`).
    pub fn level_pct(&self) -> f64 {
        (1.0 - self.alpha) * 100.0
    }

    pub fn is_determined(&self) -> bool {
        self.rows.iter().all(|r| r.half_width.is_some())
    }
}

/// A per-observation fitted result (used for summaries, plots, and exports).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationResidual {
    pub observation: Observation,
    pub predicted: f64,
    /// `observed - predicted`.
    pub residual: f64,
}

/// Residual diagnostics at the fitted parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualSummary {
    pub n: usize,
    pub ssr: f64,
    pub rmse: f64,
    pub max_abs: f64,
}

/// Fixed constants of the three-equation system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemConstants {
    pub a: f64,
    pub b: f64,
}

impl Default for SystemConstants {
    fn default() -> Self {
        Self { a: 1.0, b: 2.0 }
    }
}

/// Output of the root solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    pub solution: Vec<f64>,
    /// Residuals evaluated at `solution`.
    pub residuals: Vec<f64>,
    pub residual_norm: f64,
    pub evaluations: usize,
}

/// A full regression run's configuration as understood by the pipeline.
///
/// This is derived from built-in defaults, an optional JSON config file, and
/// CLI flags (in increasing precedence).
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionConfig {
    pub dataset: Dataset,
    /// Where the dataset came from (for the report header).
    pub source: String,
    pub initial_guess: RateParams,
    /// Significance level α (0.05 → 95% confidence intervals).
    pub alpha: f64,
}

/// A full equation-solving run's configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EquationConfig {
    pub constants: SystemConstants,
    pub initial_guess: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_keep_positional_order() {
        let p = RateParams::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(p.b1, 1.0);
        assert_eq!(p.b5, 5.0);
        assert_eq!(p.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(RateParams::from_dvector(&p.to_dvector()).unwrap(), p);
    }

    #[test]
    fn params_reject_wrong_length() {
        let err = RateParams::from_slice(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let short = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert!(matches!(RateParams::from_dvector(&short), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn dataset_column_views_follow_row_order() {
        let ds = Dataset::new(vec![Observation::new(1.0, 1.0, 0.0, 0.5), Observation::new(2.0, 2.0, 0.0, 0.6)]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.cb(), vec![1.0, 2.0]);
        assert_eq!(ds.rates(), vec![0.5, 0.6]);
    }

    #[test]
    fn dataset_deserializes_from_plain_array() {
        let json = r#"[{"ca": 1.0, "cb": 2.0, "cc": 0.5, "rate": 1.1}]"#;
        let ds: Dataset = serde_json::from_str(json).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.observations[0].cc, 0.5);
    }

    #[test]
    fn dof_saturates_at_zero() {
        let fit = RegressionFit {
            params: RateParams::default(),
            covariance: DMatrix::zeros(PARAM_COUNT, PARAM_COUNT),
            ssr: 0.0,
            n: 3,
            p: PARAM_COUNT,
            termination: String::new(),
            evaluations: 0,
        };
        assert_eq!(fit.dof(), 0);
    }
}
