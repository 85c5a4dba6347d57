//! Command-line parsing for the rate-law fitter and equation solver.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ratefit", version, about = "Rate-law regression and nonlinear equation solving")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the rate law, print parameters with confidence intervals, and plot parity.
    Fit(FitArgs),
    /// Solve the three-equation nonlinear system.
    Solve(SolveArgs),
    /// Re-render the parameter table and parity plot from a saved fit report.
    Plot(PlotArgs),
}

/// Options for the regression.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// JSON config file (see `io::config`).
    #[arg(short, long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// CSV dataset with `ca,cb,cc,rate` columns (overrides the config dataset).
    #[arg(short, long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Significance level for confidence intervals (0.05 → 95%).
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Initial guess for b1..b5, comma separated.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, value_name = "B1,B2,B3,B4,B5")]
    pub guess: Option<Vec<f64>>,

    /// Solver patience (evaluation budget is patience × (p + 1)).
    #[arg(long, default_value_t = 100)]
    pub patience: usize,

    /// Print the per-observation residual table.
    #[arg(long)]
    pub residuals: bool,

    /// Disable the terminal parity plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Write the parity plot as an SVG image.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// Export per-observation results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the full fit report to JSON.
    #[arg(long = "export-report", value_name = "JSON")]
    pub export_report: Option<PathBuf>,
}

/// Options for the equation solver.
#[derive(Debug, Parser, Clone)]
pub struct SolveArgs {
    /// JSON config file (see `io::config`).
    #[arg(short, long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Constant `a`.
    #[arg(short = 'a', allow_negative_numbers = true)]
    pub a: Option<f64>,

    /// Constant `b`.
    #[arg(short = 'b', allow_negative_numbers = true)]
    pub b: Option<f64>,

    /// Initial guess for y1,y2,y3, comma separated.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, value_name = "Y1,Y2,Y3")]
    pub guess: Option<Vec<f64>>,

    /// Maximum residual norm accepted as a root.
    #[arg(long, default_value_t = 1e-6)]
    pub tol: f64,

    /// Solver patience (evaluation budget is patience × (n + 1)).
    #[arg(long, default_value_t = 100)]
    pub patience: usize,
}

/// Options for replaying a saved report.
#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Report JSON file produced by `ratefit fit --export-report`.
    #[arg(long, value_name = "JSON")]
    pub report: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Also write the parity plot as an SVG image.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fit_flags() {
        let cli = Cli::parse_from(["ratefit", "fit", "--alpha", "0.1", "--guess", "1,0.1,0.1,0.1,1", "--no-plot"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.alpha, Some(0.1));
        assert_eq!(args.guess, Some(vec![1.0, 0.1, 0.1, 0.1, 1.0]));
        assert!(args.no_plot);
    }

    #[test]
    fn parses_solve_flags_with_negative_values() {
        let cli = Cli::parse_from(["ratefit", "solve", "-a", "-1", "-b", "2", "--guess=-1,1,1"]);
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert_eq!(args.a, Some(-1.0));
        assert_eq!(args.b, Some(2.0));
        assert_eq!(args.guess, Some(vec![-1.0, 1.0, 1.0]));
    }
}
