//! JSON configuration files.
//!
//! Every section and field is optional; anything missing falls back to the
//! built-in demo inputs (`data::demo`). CLI flags are layered on top by
//! `app`.
//!
//! ```json
//! {
//!   "regression": {
//!     "dataset": [{"ca": 0.5, "cb": 1.0, "cc": 0.2, "rate": 0.905}],
//!     "initial_guess": [1.0, 0.1, 0.1, 0.1, 1.0],
//!     "confidence_level": 0.05
//!   },
//!   "equations": { "a": 1.0, "b": 2.0, "initial_guess": [1.0, 1.0, 1.0] }
//! }
//! ```
//!
//! `confidence_level` is the significance α: `0.05` produces 95% intervals.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Dataset, DEFAULT_ALPHA, EquationConfig, RateParams, RegressionConfig, SystemConstants};
use crate::error::AppError;
use crate::math::validate_alpha;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub regression: RegressionSection,
    #[serde(default)]
    pub equations: EquationSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegressionSection {
    pub dataset: Option<Dataset>,
    /// CSV file with `ca,cb,cc,rate` columns, relative to the config file.
    pub dataset_csv: Option<PathBuf>,
    pub initial_guess: Option<Vec<f64>>,
    pub confidence_level: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EquationSection {
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub initial_guess: Option<Vec<f64>>,
}

/// Read a config file.
///
/// A relative `dataset_csv` is resolved against the config file's directory.
pub fn read_config(path: &Path) -> Result<ConfigFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::Io(format!("Failed to open config '{}': {e}", path.display())))?;
    let mut config: ConfigFile = serde_json::from_reader(file)
        .map_err(|e| AppError::Config(format!("Invalid config '{}': {e}", path.display())))?;

    if let (Some(csv), Some(dir)) = (config.regression.dataset_csv.as_mut(), path.parent()) {
        if csv.is_relative() {
            *csv = dir.join(&*csv);
        }
    }
    Ok(config)
}

impl RegressionSection {
    /// Resolve into a pipeline config, falling back to `defaults`.
    ///
    /// An inline `dataset` wins over `dataset_csv`.
    pub fn resolve(&self, defaults: RegressionConfig) -> Result<RegressionConfig, AppError> {
        let (dataset, source) = match (&self.dataset, &self.dataset_csv) {
            (Some(ds), _) => (ds.clone(), "config file (inline dataset)".to_string()),
            (None, Some(path)) => {
                let ingested = crate::io::ingest::load_dataset_csv(path)?;
                (ingested.dataset, path.display().to_string())
            }
            (None, None) => (defaults.dataset, defaults.source),
        };

        let initial_guess = match &self.initial_guess {
            Some(v) => RateParams::from_slice(v)?,
            None => defaults.initial_guess,
        };

        let alpha = self.confidence_level.unwrap_or(defaults.alpha);
        validate_alpha(alpha).map_err(|e| AppError::Config(format!("confidence_level: {e}")))?;

        Ok(RegressionConfig {
            dataset,
            source,
            initial_guess,
            alpha,
        })
    }
}

impl EquationSection {
    /// Resolve into a pipeline config, falling back to `defaults`.
    pub fn resolve(&self, defaults: EquationConfig) -> EquationConfig {
        EquationConfig {
            constants: SystemConstants {
                a: self.a.unwrap_or(defaults.constants.a),
                b: self.b.unwrap_or(defaults.constants.b),
            },
            initial_guess: self.initial_guess.clone().unwrap_or(defaults.initial_guess),
        }
    }
}

/// Built-in regression defaults: the demo dataset at α = 0.05.
pub fn default_regression_config() -> RegressionConfig {
    RegressionConfig {
        dataset: crate::data::demo_dataset(),
        source: "built-in demo dataset".to_string(),
        initial_guess: crate::data::demo_initial_guess(),
        alpha: DEFAULT_ALPHA,
    }
}

/// Built-in equation defaults: `a = 1`, `b = 2`, guess `[1, 1, 1]`.
pub fn default_equation_config() -> EquationConfig {
    EquationConfig {
        constants: crate::data::demo_constants(),
        initial_guess: crate::data::demo_equation_guess().to_vec(),
    }
}
