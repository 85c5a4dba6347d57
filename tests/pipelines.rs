//! End-to-end runs of both pipelines through the public library API.

use rate_fit::app::pipeline::{run_equations, run_regression};
use rate_fit::data::{DEMO_OPTIMUM, DEMO_SSR, demo_dataset};
use rate_fit::domain::{Dataset, EquationConfig, PARAM_COUNT, RateParams, SystemConstants};
use rate_fit::error::AppError;
use rate_fit::fit::RootOptions;
use rate_fit::io::{default_equation_config, default_regression_config};
use rate_fit::math::SolverOptions;
use rate_fit::models::predict_all;

#[test]
fn demo_regression_reaches_documented_optimum() {
    let run = run_regression(&default_regression_config(), &SolverOptions::default()).unwrap();

    for (got, want) in run.fit.params.to_array().iter().zip(DEMO_OPTIMUM) {
        assert!((got - want).abs() < 1e-2, "got {got}, want {want}");
    }
    assert!((run.fit.ssr - DEMO_SSR).abs() < 1e-3, "ssr = {}", run.fit.ssr);
    assert!((run.summary.ssr - run.fit.ssr).abs() < 1e-12);
    assert_eq!(run.residuals.len(), 13);
}

#[test]
fn demo_confidence_table_has_one_row_per_parameter() {
    let run = run_regression(&default_regression_config(), &SolverOptions::default()).unwrap();
    let table = &run.confidence;

    assert_eq!(table.rows.len(), PARAM_COUNT);
    assert_eq!(table.dof, 8);
    let t = table.t_critical.unwrap();
    assert!((t - 2.306).abs() < 1e-3, "t = {t}");
    for row in &table.rows {
        let hw = row.half_width.unwrap();
        assert!(hw.is_finite() && hw > 0.0, "{}: {hw}", row.name);
    }
}

#[test]
fn fitted_predictions_are_reproducible() {
    let run = run_regression(&default_regression_config(), &SolverOptions::default()).unwrap();
    let ds = demo_dataset();

    let again = predict_all(&run.fit.params, &ds);
    for (r, p) in run.residuals.iter().zip(&again) {
        assert_eq!(r.predicted, *p);
        assert_eq!(r.residual, r.observation.rate - p);
    }
}

#[test]
fn square_dataset_reports_undetermined_intervals() {
    let mut config = default_regression_config();
    let truth = RateParams::from_array(DEMO_OPTIMUM);
    let mut observations = demo_dataset().observations;
    observations.truncate(PARAM_COUNT);
    let rates = predict_all(&truth, &Dataset::new(observations.clone()));
    for (o, r) in observations.iter_mut().zip(rates) {
        o.rate = r;
    }
    config.dataset = Dataset::new(observations);
    config.initial_guess = truth;

    let run = run_regression(&config, &SolverOptions::default()).unwrap();
    assert_eq!(run.confidence.dof, 0);
    assert_eq!(run.confidence.t_critical, None);
    assert!(!run.confidence.is_determined());
    assert!(run.confidence.rows.iter().all(|r| r.half_width.is_none()));
}

#[test]
fn too_few_observations_is_a_data_error() {
    let mut config = default_regression_config();
    config.dataset.observations.truncate(3);
    let err = run_regression(&config, &SolverOptions::default()).unwrap_err();
    assert!(matches!(err, AppError::Underdetermined { n: 3, p: 5 }));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn reference_equation_system_is_solved() {
    let res = run_equations(&default_equation_config(), &RootOptions::default()).unwrap();

    let want = [2.3166, 1.2665, 6.0];
    for (got, want) in res.solution.iter().zip(want) {
        assert!((got - want).abs() < 1e-4, "got {got}, want {want}");
    }
    assert!(res.residuals.iter().all(|r| r.abs() < 1e-5));
}

#[test]
fn system_without_real_root_fails_to_converge() {
    // a = -1, b = 0 turns the first equation into y1^2 = -10.
    let config = EquationConfig {
        constants: SystemConstants { a: -1.0, b: 0.0 },
        initial_guess: vec![1.0, 1.0, 1.0],
    };
    let err = run_equations(&config, &RootOptions::default()).unwrap_err();
    assert_eq!(err.exit_code(), 4);
}
