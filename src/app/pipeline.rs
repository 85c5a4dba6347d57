//! Shared pipeline logic used by the CLI and by tests.
//!
//! Keeping this in one place avoids duplicating the core workflows:
//!
//! - regression: dataset -> fit -> covariance -> confidence intervals -> residuals
//! - equations: constants + guess -> root solve -> verification residuals
//!
//! Both take explicit configuration; there is no global state. Presentation
//! (printing, plots, exports) stays in `app`.

use tracing::info;

use crate::domain::{
    ConfidenceTable, EquationConfig, ObservationResidual, RegressionConfig, RegressionFit, ResidualSummary,
    SolveResult,
};
use crate::error::AppError;
use crate::fit::{RootOptions, confidence_intervals, fit_rate_law, solve_equations};
use crate::math::SolverOptions;
use crate::report::{compute_residuals, summarize};

/// All computed outputs of a single regression run.
#[derive(Debug, Clone)]
pub struct RegressionRun {
    pub fit: RegressionFit,
    pub confidence: ConfidenceTable,
    pub residuals: Vec<ObservationResidual>,
    pub summary: ResidualSummary,
}

/// Execute the regression pipeline.
pub fn run_regression(config: &RegressionConfig, opts: &SolverOptions) -> Result<RegressionRun, AppError> {
    info!(
        source = %config.source,
        n = config.dataset.len(),
        alpha = config.alpha,
        "running rate-law regression"
    );

    // 1) Fit.
    let fit = fit_rate_law(&config.dataset, &config.initial_guess, opts)?;

    // 2) Confidence intervals from the covariance diagonal.
    let confidence = confidence_intervals(&fit, config.alpha)?;

    // 3) Residuals at the fitted parameters (same model function as the fit).
    let residuals = compute_residuals(&config.dataset, &fit.params)?;
    let summary = summarize(&residuals);

    Ok(RegressionRun {
        fit,
        confidence,
        residuals,
        summary,
    })
}

/// Execute the equation-solving pipeline.
pub fn run_equations(config: &EquationConfig, opts: &RootOptions) -> Result<SolveResult, AppError> {
    info!(
        a = config.constants.a,
        b = config.constants.b,
        guess = ?config.initial_guess,
        "solving nonlinear system"
    );
    solve_equations(config.constants, &config.initial_guess, opts)
}
