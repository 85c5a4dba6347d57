//! Numerical building blocks: the Levenberg–Marquardt binding, covariance
//! estimation, and Student-t critical values.

pub mod lm;
pub mod student_t;

pub use lm::{Minimum, Residuals, SolverOptions, covariance, minimize};
pub use student_t::{t_critical, validate_alpha};
