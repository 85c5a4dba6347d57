//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - layers defaults, config file and flags into pipeline configs
//! - runs the regression or the equation solver, or replays a saved report
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{Command, FitArgs, PlotArgs, SolveArgs};
use crate::domain::{EquationConfig, RateParams, RegressionConfig};
use crate::error::AppError;
use crate::fit::RootOptions;
use crate::io::{ConfigFile, FitReport, default_equation_config, default_regression_config, read_config};
use crate::math::{SolverOptions, validate_alpha};

pub mod pipeline;

/// SVG parity plot size in pixels.
const SVG_SIZE: (u32, u32) = (640, 640);

/// Entry point for the `ratefit` binary.
pub fn run() -> Result<(), AppError> {
    // `ratefit` and `ratefit --alpha 0.1` behave like `ratefit fit ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Solve(args) => handle_solve(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = regression_config_from_args(&args)?;
    let opts = SolverOptions {
        patience: args.patience,
        ..SolverOptions::default()
    };
    let run = pipeline::run_regression(&config, &opts)?;

    println!(
        "{}",
        crate::report::format_fit_summary(&config.source, &run.fit, &run.confidence, &run.summary)
    );

    if args.residuals {
        println!("{}", crate::report::format_residual_table(&run.residuals));
    }

    if !args.no_plot {
        let plot = crate::plot::render_parity_plot(&run.residuals, args.width, args.height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &args.svg {
        crate::plot::write_parity_svg(path, &run.residuals, SVG_SIZE)?;
        info!(path = %path.display(), "wrote parity plot");
    }
    if let Some(path) = &args.export {
        crate::io::export::write_results_csv(path, &run.residuals)?;
        info!(path = %path.display(), "wrote results CSV");
    }
    if let Some(path) = &args.export_report {
        let report = crate::io::report::FitReport::new(
            &config.source,
            &run.fit,
            &run.confidence,
            &run.summary,
            &run.residuals,
        );
        crate::io::report::write_report_json(path, &report)?;
        info!(path = %path.display(), "wrote fit report");
    }

    Ok(())
}

fn handle_solve(args: SolveArgs) -> Result<(), AppError> {
    let config = equation_config_from_args(&args)?;
    if !(args.tol.is_finite() && args.tol > 0.0) {
        return Err(AppError::InvalidInput(format!("--tol must be > 0, got {}", args.tol)));
    }
    let opts = RootOptions {
        solver: SolverOptions {
            patience: args.patience,
            ..SolverOptions::default()
        },
        residual_tol: args.tol,
    };

    let result = pipeline::run_equations(&config, &opts)?;
    println!(
        "{}",
        crate::report::format_solve_report(&config.constants, &config.initial_guess, &result)
    );
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let report = crate::io::report::read_report_json(&args.report)?;
    println!("{}", saved_report_text(&report, args.width, args.height));

    if let Some(path) = &args.svg {
        crate::plot::write_parity_svg(path, &report.residuals, SVG_SIZE)?;
        info!(path = %path.display(), "wrote parity plot");
    }
    Ok(())
}

/// Parameter table, SSR and parity plot for a saved report.
fn saved_report_text(report: &FitReport, width: usize, height: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Report: {} ({} by {})\n",
        report.source,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.tool
    ));
    out.push_str(&format!("Points: n={} | params p={} | dof={}\n\n", report.n, report.p, report.dof));
    out.push_str(&crate::report::format_parameter_table(&report.confidence));
    out.push_str(&format!("\nSSR  = {:.4}\n\n", report.summary.ssr));
    out.push_str(&crate::plot::render_parity_plot(&report.residuals, width, height));
    out
}

fn load_config_file(path: Option<&std::path::Path>) -> Result<ConfigFile, AppError> {
    match path {
        Some(p) => read_config(p),
        None => Ok(ConfigFile::default()),
    }
}

/// Defaults <- config file <- flags.
pub fn regression_config_from_args(args: &FitArgs) -> Result<RegressionConfig, AppError> {
    let file = load_config_file(args.config.as_deref())?;
    let mut config = file.regression.resolve(default_regression_config())?;

    if let Some(path) = &args.data {
        let ingested = crate::io::ingest::load_dataset_csv(path)?;
        if !ingested.row_errors.is_empty() {
            eprintln!(
                "warning: skipped {} of {} CSV rows in '{}'",
                ingested.row_errors.len(),
                ingested.rows_read,
                path.display()
            );
        }
        config.dataset = ingested.dataset;
        config.source = path.display().to_string();
    }
    if let Some(guess) = &args.guess {
        config.initial_guess = RateParams::from_slice(guess)?;
    }
    if let Some(alpha) = args.alpha {
        validate_alpha(alpha)?;
        config.alpha = alpha;
    }

    Ok(config)
}

/// Defaults <- config file <- flags.
pub fn equation_config_from_args(args: &SolveArgs) -> Result<EquationConfig, AppError> {
    let file = load_config_file(args.config.as_deref())?;
    let mut config = file.equations.resolve(default_equation_config());

    if let Some(a) = args.a {
        config.constants.a = a;
    }
    if let Some(b) = args.b {
        config.constants.b = b;
    }
    if let Some(guess) = &args.guess {
        config.initial_guess = guess.clone();
    }

    Ok(config)
}

/// Rewrite argv so `ratefit` defaults to `ratefit fit`.
///
/// Rules:
/// - `ratefit`                      -> `ratefit fit`
/// - `ratefit --alpha 0.1 ...`      -> `ratefit fit --alpha 0.1 ...`
/// - `ratefit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fit".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "solve" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "fit flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_fit() {
        assert_eq!(rewrite_args(argv(&["ratefit"])), argv(&["ratefit", "fit"]));
        assert_eq!(
            rewrite_args(argv(&["ratefit", "--alpha", "0.1"])),
            argv(&["ratefit", "fit", "--alpha", "0.1"])
        );
        assert_eq!(rewrite_args(argv(&["ratefit", "--help"])), argv(&["ratefit", "--help"]));
        assert_eq!(rewrite_args(argv(&["ratefit", "solve"])), argv(&["ratefit", "solve"]));
    }

    #[test]
    fn flags_override_defaults() {
        let cli = crate::cli::Cli::parse_from([
            "ratefit", "fit", "--alpha", "0.1", "--guess", "2,0.2,0.2,0.2,2",
        ]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let cfg = regression_config_from_args(&args).unwrap();
        assert_eq!(cfg.alpha, 0.1);
        assert_eq!(cfg.initial_guess, RateParams::new(2.0, 0.2, 0.2, 0.2, 2.0));
        assert_eq!(cfg.dataset, crate::data::demo_dataset());
    }

    #[test]
    fn invalid_flags_are_rejected() {
        let cli = crate::cli::Cli::parse_from(["ratefit", "fit", "--alpha", "1.5"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert!(matches!(regression_config_from_args(&args), Err(AppError::InvalidInput(_))));

        let cli = crate::cli::Cli::parse_from(["ratefit", "fit", "--guess", "1,2"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert!(regression_config_from_args(&args).is_err());
    }

    #[test]
    fn saved_report_replays_table_and_plot() {
        let config = default_regression_config();
        let run = pipeline::run_regression(&config, &SolverOptions::default()).unwrap();
        let report = FitReport::new(&config.source, &run.fit, &run.confidence, &run.summary, &run.residuals);

        let path = std::env::temp_dir().join(format!("ratefit_replay_{}.json", std::process::id()));
        crate::io::report::write_report_json(&path, &report).unwrap();

        let cli = crate::cli::Cli::parse_from(["ratefit", "plot", "--report", path.to_str().unwrap()]);
        let Command::Plot(args) = cli.command else {
            panic!("expected plot");
        };
        let back = crate::io::report::read_report_json(&args.report).unwrap();
        let txt = saved_report_text(&back, args.width, args.height);

        assert!(txt.contains("built-in demo dataset"));
        assert_eq!(txt.lines().filter(|l| l.starts_with('b')).count(), 5);
        assert!(txt.contains("Parity: x=observed, y=predicted"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn solve_flags_override_config_file() {
        let dir = std::env::temp_dir().join(format!("ratefit_app_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let cfg_path = dir.join("eq.json");
        std::fs::write(&cfg_path, r#"{"equations": {"a": 5.0, "b": 3.0}}"#).unwrap();

        let cli = crate::cli::Cli::parse_from([
            "ratefit",
            "solve",
            "--config",
            cfg_path.to_str().unwrap(),
            "-b",
            "2",
        ]);
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        let cfg = equation_config_from_args(&args).unwrap();
        assert_eq!(cfg.constants.a, 5.0);
        assert_eq!(cfg.constants.b, 2.0);
        assert_eq!(cfg.initial_guess, vec![1.0, 1.0, 1.0]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
