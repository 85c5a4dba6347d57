//! Levenberg–Marquardt binding and covariance estimation.
//!
//! Both pipelines reduce to "drive a residual function through MINPACK-style
//! Levenberg–Marquardt":
//!
//! - the regression minimizes Σ (predicted − observed)² over the rate-law coefficients
//! - the root solver minimizes ‖r(y)‖² over a square system and then checks ‖r‖ ≈ 0
//!
//! The optimizer itself comes from the `levenberg-marquardt` crate; this module
//! only adapts our residual functions to its `LeastSquaresProblem` trait and
//! turns its termination report into `AppError`s.

use levenberg_marquardt::{LeastSquaresProblem, LevenbergMarquardt};
use nalgebra::storage::Owned;
use nalgebra::{DMatrix, DVector, Dyn};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// A residual function with an analytic Jacobian.
///
/// Returning `None` (or any non-finite entry) means the function is undefined
/// at `x`; the solver treats that as a hard stop.
pub trait Residuals {
    fn residuals(&self, x: &DVector<f64>) -> Option<DVector<f64>>;
    fn jacobian(&self, x: &DVector<f64>) -> Option<DMatrix<f64>>;
}

/// Solver tolerances.
///
/// Defaults match MINPACK's `lmder`/`lmdif` defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    /// Relative reduction in the sum of squares.
    pub ftol: f64,
    /// Relative change in the parameters.
    pub xtol: f64,
    /// Orthogonality between residuals and Jacobian columns.
    pub gtol: f64,
    /// Evaluation budget is `patience * (n + 1)`.
    pub patience: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            gtol: 0.0,
            patience: 100,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> AppResult<()> {
        let tols = [("ftol", self.ftol), ("xtol", self.xtol), ("gtol", self.gtol)];
        for (name, v) in tols {
            if !(v.is_finite() && v >= 0.0) {
                return Err(AppError::InvalidInput(format!("{name} must be finite and >= 0, got {v}.")));
            }
        }
        if self.patience == 0 {
            return Err(AppError::InvalidInput("patience must be > 0.".to_string()));
        }
        Ok(())
    }
}

/// A converged least-squares point.
#[derive(Debug, Clone)]
pub struct Minimum {
    pub params: DVector<f64>,
    pub residuals: DVector<f64>,
    pub jacobian: DMatrix<f64>,
    pub termination: String,
    pub evaluations: usize,
}

impl Minimum {
    /// Sum of squared residuals.
    pub fn ssr(&self) -> f64 {
        self.residuals.norm_squared()
    }
}

struct Problem<'a, R: ?Sized> {
    model: &'a R,
    params: DVector<f64>,
}

impl<R: ?Sized> Clone for Problem<'_, R> {
    fn clone(&self) -> Self {
        Self {
            model: self.model,
            params: self.params.clone(),
        }
    }
}

impl<R: Residuals + ?Sized> LeastSquaresProblem<f64, Dyn, Dyn> for Problem<'_, R> {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, Dyn>;
    type ParameterStorage = Owned<f64, Dyn>;

    fn set_params(&mut self, x: &DVector<f64>) {
        self.params.copy_from(x);
    }

    fn params(&self) -> DVector<f64> {
        self.params.clone()
    }

    fn residuals(&self) -> Option<DVector<f64>> {
        finite_residuals(self.model, &self.params)
    }

    fn jacobian(&self) -> Option<DMatrix<f64>> {
        finite_jacobian(self.model, &self.params)
    }
}

/// Minimize `‖r(x)‖²` starting from `x0`.
///
/// Any unsuccessful termination (evaluation budget exhausted, undefined
/// residuals, numerical breakdown) is returned as `AppError::NotConverged`.
pub fn minimize<R: Residuals + ?Sized>(model: &R, x0: DVector<f64>, opts: &SolverOptions) -> AppResult<Minimum> {
    opts.validate()?;
    if x0.is_empty() {
        return Err(AppError::InvalidInput("No parameters to solve for.".to_string()));
    }

    let residuals0 = finite_residuals(model, &x0)
        .ok_or_else(|| AppError::ModelUndefined("residuals are not finite at the initial point".to_string()))?;
    if residuals0.len() < x0.len() {
        return Err(AppError::Underdetermined {
            n: residuals0.len(),
            p: x0.len(),
        });
    }
    debug!(
        n_params = x0.len(),
        n_residuals = residuals0.len(),
        ssr0 = residuals0.norm_squared(),
        "starting Levenberg-Marquardt"
    );

    let solver = LevenbergMarquardt::new()
        .with_ftol(opts.ftol)
        .with_xtol(opts.xtol)
        .with_gtol(opts.gtol)
        .with_patience(opts.patience);
    let (problem, report) = solver.minimize(Problem { model, params: x0 });

    let termination = format!("{:?}", report.termination);
    if !report.termination.was_successful() {
        return Err(AppError::NotConverged(format!(
            "{termination} after {} evaluations",
            report.number_of_evaluations
        )));
    }

    let params = problem.params;
    let residuals = finite_residuals(model, &params)
        .ok_or_else(|| AppError::NonFinite("residuals at the solver's final point".to_string()))?;
    let jacobian = finite_jacobian(model, &params)
        .ok_or_else(|| AppError::NonFinite("Jacobian at the solver's final point".to_string()))?;

    debug!(
        evaluations = report.number_of_evaluations,
        ssr = residuals.norm_squared(),
        termination = %termination,
        "Levenberg-Marquardt finished"
    );

    Ok(Minimum {
        params,
        residuals,
        jacobian,
        termination,
        evaluations: report.number_of_evaluations,
    })
}

/// Estimate the parameter covariance from the Jacobian at the optimum.
///
/// ```text
/// cov = (JᵀJ)⁺ · ssr / dof
/// ```
///
/// The pseudo-inverse is built from the SVD of `J`, discarding singular values
/// below `eps · max(m, n) · s_max`. Returns `None` when the covariance cannot be
/// estimated: no degrees of freedom, a non-finite input, or a rank-deficient
/// Jacobian.
pub fn covariance(jacobian: &DMatrix<f64>, ssr: f64, dof: usize) -> Option<DMatrix<f64>> {
    let (m, n) = jacobian.shape();
    if dof == 0 || n == 0 || m < n || !ssr.is_finite() || jacobian.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let svd = jacobian.clone().svd(false, true);
    let v_t = svd.v_t?;
    let s = &svd.singular_values;
    if s.len() < n {
        return None;
    }
    let threshold = f64::EPSILON * m.max(n) as f64 * s.max();
    if s.iter().any(|&sk| sk <= threshold) {
        return None;
    }

    let scale = ssr / dof as f64;
    let mut cov = DMatrix::<f64>::zeros(n, n);
    for (k, &sk) in s.iter().enumerate() {
        let v = v_t.row(k).transpose();
        cov += (&v * v.transpose()) * (scale / (sk * sk));
    }
    Some(cov)
}

fn finite_residuals<R: Residuals + ?Sized>(model: &R, x: &DVector<f64>) -> Option<DVector<f64>> {
    model.residuals(x).filter(|r| r.iter().all(|v| v.is_finite()))
}

fn finite_jacobian<R: Residuals + ?Sized>(model: &R, x: &DVector<f64>) -> Option<DMatrix<f64>> {
    model.jacobian(x).filter(|j| j.iter().all(|v| v.is_finite()))
}
