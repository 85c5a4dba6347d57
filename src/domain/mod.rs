//! Domain types used throughout both pipelines.
//!
//! This module defines:
//!
//! - observations and datasets for the regression (`Observation`, `Dataset`)
//! - the rate-law parameter structure (`RateParams`)
//! - fit, confidence interval, and residual outputs
//! - equation-system constants and solver outputs

pub mod types;

pub use types::*;
