//! Model functions for both pipelines.
//!
//! Models are implemented as small, pure functions so that fitting/solving code
//! can stay generic.

pub mod equations;
pub mod rate_law;

pub use rate_law::{is_defined, jacobian_row, predict, predict_all};
