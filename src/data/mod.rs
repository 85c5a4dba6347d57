//! Built-in inputs used when no configuration is supplied.

pub mod demo;

pub use demo::*;
