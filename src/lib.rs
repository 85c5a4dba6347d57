//! `rate-fit` library crate.
//!
//! The binary (`ratefit`) is a thin wrapper around this library so that:
//!
//! - both pipelines (rate-law regression, nonlinear system solve) are testable
//!   without spawning processes
//! - the numerical pieces (model, LM binding, intervals) are reusable on their own

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
