//! Fitting and solving.
//!
//! Responsibilities:
//!
//! - fit the rate law by nonlinear least squares (`regression`)
//! - derive Student-t confidence intervals from the fit (`confidence`)
//! - solve square nonlinear systems (`root`)

pub mod confidence;
pub mod regression;
pub mod root;

pub use confidence::*;
pub use regression::*;
pub use root::*;
