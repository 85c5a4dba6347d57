//! Built-in demo inputs for both pipelines.
//!
//! The regression dataset is synthetic: thirteen concentration triples with
//! rates chosen so that the least-squares optimum of the rate law sits at
//! `b ≈ (1.253, 0.063, 0.040, 0.112, 1.191)` with `SSR ≈ 0.2989`. The residual
//! pattern is orthogonal to the model Jacobian at that point, so the optimum is
//! known in advance and the fit can be checked against it.

use crate::domain::{Dataset, Observation, RateParams, SystemConstants};

const CA: [f64; 13] = [0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 0.5, 1.0, 2.0, 3.0, 1.5, 2.5, 1.0];
const CB: [f64; 13] = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 0.5, 1.0, 2.0, 3.0, 4.0, 2.5];
const CC: [f64; 13] = [0.2, 0.4, 0.6, 0.8, 1.0, 0.3, 0.5, 0.1, 1.2, 0.7, 0.9, 1.5, 0.05];
const RATE: [f64; 13] = [
    0.905, 1.1218, 1.9355, 1.6609, 2.359, 2.9532, 3.7166, 0.5292, 0.1695, 1.4839, 2.1478, 2.4742, 2.6957,
];

/// Parameters at the least-squares optimum of `demo_dataset()`.
pub const DEMO_OPTIMUM: [f64; 5] = [1.253, 0.063, 0.040, 0.112, 1.191];

/// Sum of squared residuals at `DEMO_OPTIMUM`.
pub const DEMO_SSR: f64 = 0.2989;

/// The thirteen-point demo dataset.
pub fn demo_dataset() -> Dataset {
    Dataset::new(
        (0..CA.len())
            .map(|i| Observation::new(CA[i], CB[i], CC[i], RATE[i]))
            .collect(),
    )
}

/// Reference initial guess `[1, 0.1, 0.1, 0.1, 1]`.
pub fn demo_initial_guess() -> RateParams {
    RateParams::default()
}

/// Reference equation constants `a = 1`, `b = 2`.
pub fn demo_constants() -> SystemConstants {
    SystemConstants::default()
}

/// Reference initial guess `[1, 1, 1]` for the equation system.
pub fn demo_equation_guess() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}
