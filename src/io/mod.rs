//! Input/output helpers.
//!
//! - JSON configuration (`config`)
//! - CSV ingest + validation (`ingest`)
//! - per-observation CSV export (`export`)
//! - fit report JSON read/write (`report`)

pub mod config;
pub mod export;
pub mod ingest;
pub mod report;

pub use config::*;
pub use export::*;
pub use ingest::*;
pub use report::*;
