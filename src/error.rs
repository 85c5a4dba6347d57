//! Crate-wide error type.
//!
//! Every error maps to a process exit code so the binary can report failures
//! consistently:
//!
//! - `2`: bad input, configuration, or I/O
//! - `3`: unusable dataset (empty, underdetermined)
//! - `4`: numerical failure (non-convergence, undefined model values)

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Dataset is empty.")]
    EmptyDataset,

    #[error("Underdetermined fit: n={n} observations for p={p} parameters.")]
    Underdetermined { n: usize, p: usize },

    #[error("Model is undefined at the initial guess: {0}")]
    ModelUndefined(String),

    #[error("Non-finite value: {0}")]
    NonFinite(String),

    #[error("Solver did not converge: {0}")]
    NotConverged(String),

    #[error("Plot error: {0}")]
    Plot(String),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::InvalidInput(_) | AppError::Config(_) | AppError::Io(_) | AppError::Plot(_) => 2,
            AppError::EmptyDataset | AppError::Underdetermined { .. } => 3,
            AppError::ModelUndefined(_) | AppError::NonFinite(_) | AppError::NotConverged(_) => 4,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
