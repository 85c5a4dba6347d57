//! Nonlinear least-squares fit of the rate law.
//!
//! Given:
//! - observations `(C_A, C_B, C_C, r)_i`
//! - an initial guess for `b1..b5`
//!
//! we minimize `Σ (predict(b, obs_i) − r_i)²` with Levenberg–Marquardt and
//! estimate the covariance of the optimum from the linearized Jacobian.

use nalgebra::{DMatrix, DVector};
use tracing::{info, warn};

use crate::domain::{Dataset, PARAM_COUNT, RateParams, RegressionFit};
use crate::error::{AppError, AppResult};
use crate::math::{Residuals, SolverOptions, covariance, minimize};
use crate::models::{is_defined, jacobian_row, predict};

/// The rate law bound to a dataset, as seen by the solver.
struct RateLawResiduals<'a> {
    dataset: &'a Dataset,
}

impl Residuals for RateLawResiduals<'_> {
    fn residuals(&self, x: &DVector<f64>) -> Option<DVector<f64>> {
        let params = RateParams::from_dvector(x).ok()?;
        Some(DVector::from_iterator(
            self.dataset.len(),
            self.dataset.iter().map(|o| predict(&params, o) - o.rate),
        ))
    }

    fn jacobian(&self, x: &DVector<f64>) -> Option<DMatrix<f64>> {
        let params = RateParams::from_dvector(x).ok()?;
        let mut jac = DMatrix::<f64>::zeros(self.dataset.len(), PARAM_COUNT);
        for (i, o) in self.dataset.iter().enumerate() {
            let row = jacobian_row(&params, o);
            for (j, v) in row.iter().enumerate() {
                jac[(i, j)] = *v;
            }
        }
        Some(jac)
    }
}

/// Fit the rate law to `dataset` starting from `initial_guess`.
///
/// N = P is accepted: the point estimate is still computed, but the
/// covariance is reported as undetermined (`+inf`).
pub fn fit_rate_law(dataset: &Dataset, initial_guess: &RateParams, opts: &SolverOptions) -> AppResult<RegressionFit> {
    if dataset.is_empty() {
        return Err(AppError::EmptyDataset);
    }
    let n = dataset.len();
    if n < PARAM_COUNT {
        return Err(AppError::Underdetermined { n, p: PARAM_COUNT });
    }
    if let Some((i, _)) = dataset.iter().enumerate().find(|(_, o)| !o.is_finite()) {
        return Err(AppError::InvalidInput(format!("Observation {} has a non-finite value.", i + 1)));
    }
    if !initial_guess.is_finite() {
        return Err(AppError::InvalidInput("Initial guess has a non-finite value.".to_string()));
    }
    if !is_defined(initial_guess, dataset) {
        return Err(AppError::ModelUndefined(format!(
            "b5 is zero or a denominator vanishes for guess {:?}",
            initial_guess.to_array()
        )));
    }

    let model = RateLawResiduals { dataset };
    let min = minimize(&model, initial_guess.to_dvector(), opts)?;

    let params = RateParams::from_dvector(&min.params)?;
    let ssr = min.ssr();
    let dof = n - PARAM_COUNT;
    let covariance = covariance(&min.jacobian, ssr, dof).unwrap_or_else(|| {
        warn!(n, dof, "covariance of the parameters could not be estimated");
        DMatrix::from_element(PARAM_COUNT, PARAM_COUNT, f64::INFINITY)
    });

    info!(
        ssr,
        evaluations = min.evaluations,
        params = ?params.to_array(),
        "rate-law fit converged"
    );

    Ok(RegressionFit {
        params,
        covariance,
        ssr,
        n,
        p: PARAM_COUNT,
        termination: min.termination,
        evaluations: min.evaluations,
    })
}
