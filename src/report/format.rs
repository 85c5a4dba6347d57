//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{
    ConfidenceTable, ObservationResidual, RegressionFit, ResidualSummary, SolveResult, SystemConstants,
};

/// Residuals below this magnitude are reported as zero in the solve report.
const ZERO_CHECK_TOL: f64 = 1e-6;

const UNDETERMINED: &str = "undetermined";

/// Format the fit run summary (dataset size, solver diagnostics, SSR).
pub fn format_fit_summary(
    source: &str,
    fit: &RegressionFit,
    table: &ConfidenceTable,
    summary: &ResidualSummary,
) -> String {
    let mut out = String::new();

    out.push_str("=== ratefit - rate-law regression ===\n");
    out.push_str(&format!("Data: {source}\n"));
    out.push_str(&format!(
        "Points: n={} | params p={} | dof={}\n",
        fit.n,
        fit.p,
        fit.dof()
    ));
    out.push_str(&format!(
        "Solver: {} ({} evaluations)\n",
        fit.termination, fit.evaluations
    ));
    out.push_str(&format!(
        "Confidence: {:.1}% (alpha={}) | t-critical={}\n",
        table.level_pct(),
        table.alpha,
        fmt_opt(table.t_critical, 4),
    ));
    out.push('\n');

    out.push_str(&format_parameter_table(table));
    out.push('\n');

    out.push_str(&format!("SSR  = {:.4}\n", summary.ssr));
    out.push_str(&format!("RMSE = {:.4}\n", summary.rmse));
    out.push_str(&format!("max |residual| = {:.4}\n", summary.max_abs));

    if !table.is_determined() {
        out.push_str("\nNote: confidence intervals are undetermined (no degrees of freedom or singular covariance).\n");
    }

    out
}

/// Format the parameter table: value, CI half-width, CI half-width in % of value.
pub fn format_parameter_table(table: &ConfidenceTable) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!("{:<6} {:>12} {:>14} {:>14}", "param", "value", "± CI", "CI %"),
    );
    push_line(&mut out, format!("{:-<6} {:-<12} {:-<14} {:-<14}", "", "", "", ""));

    for row in &table.rows {
        push_line(
            &mut out,
            format!(
                "{:<6} {:>12.4} {:>14} {:>14}",
                row.name,
                row.estimate,
                fmt_opt(row.half_width, 4),
                fmt_opt(row.relative_pct, 1),
            ),
        );
    }

    out
}

/// Format the per-observation residual table.
pub fn format_residual_table(residuals: &[ObservationResidual]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:>4} {:>8} {:>8} {:>8} {:>10} {:>10} {:>10}",
            "#", "C_A", "C_B", "C_C", "observed", "predicted", "residual"
        ),
    );
    push_line(
        &mut out,
        format!(
            "{:-<4} {:-<8} {:-<8} {:-<8} {:-<10} {:-<10} {:-<10}",
            "", "", "", "", "", "", ""
        ),
    );

    for (i, r) in residuals.iter().enumerate() {
        let o = &r.observation;
        push_line(
            &mut out,
            format!(
                "{:>4} {:>8.3} {:>8.3} {:>8.3} {:>10.4} {:>10.4} {:>10.4}",
                i + 1,
                o.ca,
                o.cb,
                o.cc,
                o.rate,
                r.predicted,
                r.residual
            ),
        );
    }

    out
}

/// Format the equation-solving result with a per-equation zero check.
pub fn format_solve_report(constants: &SystemConstants, guess: &[f64], result: &SolveResult) -> String {
    let mut out = String::new();

    out.push_str("=== ratefit - nonlinear system ===\n");
    out.push_str(&format!("Constants: a={} b={}\n", constants.a, constants.b));
    out.push_str(&format!("Initial guess: {}\n", fmt_vec(guess)));
    out.push_str(&format!("Evaluations: {}\n", result.evaluations));
    out.push('\n');

    out.push_str("Solution:\n");
    for (i, y) in result.solution.iter().enumerate() {
        out.push_str(&format!("  y{} = {y:.6}\n", i + 1));
    }
    out.push('\n');

    out.push_str("Check (each equation should be ~0):\n");
    for (i, r) in result.residuals.iter().enumerate() {
        let status = if r.abs() < ZERO_CHECK_TOL { "ok" } else { "NOT ZERO" };
        out.push_str(&format!("  eq{}: {r:>12.3e}  {status}\n", i + 1));
    }
    out.push_str(&format!("  |r| = {:.3e}\n", result.residual_norm));

    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(x) => format!("{x:.decimals$}"),
        None => UNDETERMINED.to_string(),
    }
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x}")).collect();
    format!("[{}]", parts.join(", "))
}
