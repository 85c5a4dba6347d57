//! Multivariate root finding.
//!
//! A square system `r(y) = 0` is solved by minimizing `‖r(y)‖²` with the same
//! MINPACK-family Levenberg–Marquardt engine used by the regression. A local
//! minimum of `‖r‖²` is not necessarily a root, so the result is accepted only
//! when `‖r‖` is below `residual_tol`. Non-convergence is returned to the
//! caller; there is no internal retry.

use nalgebra::{DMatrix, DVector};
use tracing::info;

use crate::domain::{SolveResult, SystemConstants};
use crate::error::{AppError, AppResult};
use crate::math::{Residuals, SolverOptions, minimize};
use crate::models::equations;

/// A square nonlinear system with an analytic Jacobian.
pub trait NonlinearSystem {
    /// Number of unknowns (and equations).
    fn dim(&self) -> usize;
    fn residuals(&self, y: &[f64]) -> Vec<f64>;
    /// Row-major `dim × dim` Jacobian.
    fn jacobian(&self, y: &[f64]) -> Vec<f64>;
}

/// Options for `solve_system`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootOptions {
    pub solver: SolverOptions,
    /// Maximum accepted residual norm at the solution.
    pub residual_tol: f64,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            solver: SolverOptions::default(),
            residual_tol: 1e-6,
        }
    }
}

/// The three-equation system with fixed constants `a`, `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreeEquationSystem {
    pub constants: SystemConstants,
}

impl NonlinearSystem for ThreeEquationSystem {
    fn dim(&self) -> usize {
        equations::DIM
    }

    fn residuals(&self, y: &[f64]) -> Vec<f64> {
        equations::residuals(&self.constants, &to_array(y)).to_vec()
    }

    fn jacobian(&self, y: &[f64]) -> Vec<f64> {
        equations::jacobian(&self.constants, &to_array(y))
            .iter()
            .flat_map(|row| row.iter().copied())
            .collect()
    }
}

fn to_array(y: &[f64]) -> [f64; equations::DIM] {
    let mut out = [0.0; equations::DIM];
    for (o, v) in out.iter_mut().zip(y) {
        *o = *v;
    }
    out
}

struct SystemResiduals<'a, S: ?Sized> {
    system: &'a S,
}

impl<S: NonlinearSystem + ?Sized> Residuals for SystemResiduals<'_, S> {
    fn residuals(&self, y: &DVector<f64>) -> Option<DVector<f64>> {
        let r = self.system.residuals(y.as_slice());
        (r.len() == self.system.dim()).then(|| DVector::from_vec(r))
    }

    fn jacobian(&self, y: &DVector<f64>) -> Option<DMatrix<f64>> {
        let n = self.system.dim();
        let j = self.system.jacobian(y.as_slice());
        (j.len() == n * n).then(|| DMatrix::from_row_slice(n, n, &j))
    }
}

/// Solve `system(y) = 0` starting from `guess`.
pub fn solve_system<S: NonlinearSystem + ?Sized>(system: &S, guess: &[f64], opts: &RootOptions) -> AppResult<SolveResult> {
    let n = system.dim();
    if guess.len() != n {
        return Err(AppError::InvalidInput(format!(
            "Initial guess has {} entries, system has {n} unknowns.",
            guess.len()
        )));
    }
    if guess.iter().any(|v| !v.is_finite()) {
        return Err(AppError::InvalidInput("Initial guess has a non-finite value.".to_string()));
    }
    if !(opts.residual_tol.is_finite() && opts.residual_tol > 0.0) {
        return Err(AppError::InvalidInput(format!(
            "residual_tol must be finite and > 0, got {}.",
            opts.residual_tol
        )));
    }

    let model = SystemResiduals { system };
    let min = minimize(&model, DVector::from_row_slice(guess), &opts.solver)?;
    let residual_norm = min.residuals.norm();
    if residual_norm > opts.residual_tol {
        return Err(AppError::NotConverged(format!(
            "stopped at a non-root ({}) with residual norm {residual_norm:.3e} > {:.1e}; try another initial guess",
            min.termination, opts.residual_tol
        )));
    }

    info!(residual_norm, evaluations = min.evaluations, "root found");

    Ok(SolveResult {
        solution: min.params.iter().copied().collect(),
        residuals: min.residuals.iter().copied().collect(),
        residual_norm,
        evaluations: min.evaluations,
    })
}

/// Solve the three-equation system for the given constants.
pub fn solve_equations(constants: SystemConstants, guess: &[f64], opts: &RootOptions) -> AppResult<SolveResult> {
    if !(constants.a.is_finite() && constants.b.is_finite()) {
        return Err(AppError::InvalidInput("Constants a and b must be finite.".to_string()));
    }
    solve_system(&ThreeEquationSystem { constants }, guess, opts)
}
