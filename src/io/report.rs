//! Read/write fit report JSON files.
//!
//! The report is the "portable" representation of a regression run:
//! - fitted parameters and their covariance
//! - the confidence interval table
//! - residual diagnostics and per-observation results
//!
//! Non-finite numbers (undetermined covariance entries) are written as `null`.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ConfidenceTable, ObservationResidual, RateParams, RegressionFit, ResidualSummary};
use crate::error::AppError;

/// A saved fit report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub n: usize,
    pub p: usize,
    pub dof: usize,
    pub params: RateParams,
    /// Row-major covariance; `None` marks an undetermined entry.
    pub covariance: Vec<Vec<Option<f64>>>,
    pub confidence: ConfidenceTable,
    pub summary: ResidualSummary,
    pub residuals: Vec<ObservationResidual>,
    pub termination: String,
}

impl FitReport {
    pub fn new(
        source: &str,
        fit: &RegressionFit,
        confidence: &ConfidenceTable,
        summary: &ResidualSummary,
        residuals: &[ObservationResidual],
    ) -> Self {
        let covariance = fit
            .covariance
            .row_iter()
            .map(|row| row.iter().map(|&v| v.is_finite().then_some(v)).collect())
            .collect();

        Self {
            tool: "ratefit".to_string(),
            generated_at: Utc::now(),
            source: source.to_string(),
            n: fit.n,
            p: fit.p,
            dof: fit.dof(),
            params: fit.params,
            covariance,
            confidence: confidence.clone(),
            summary: *summary,
            residuals: residuals.to_vec(),
            termination: fit.termination.clone(),
        }
    }
}

/// Write a report JSON file.
pub fn write_report_json(path: &Path, report: &FitReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::Io(format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::Io(format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

/// Read a report JSON file.
pub fn read_report_json(path: &Path) -> Result<FitReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::Io(format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: FitReport =
        serde_json::from_reader(file).map_err(|e| AppError::Config(format!("Invalid report JSON: {e}")))?;
    Ok(report)
}
