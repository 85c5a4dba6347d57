//! Rate-law model evaluation.
//!
//! The fitter relies on two primitive operations:
//! - predict the rate for one observation given the coefficients (for residuals/plots)
//! - compute the partial derivatives of that prediction (the LM Jacobian row)
//!
//! ```text
//! r = (b1·C_B − C_C/b5) / D,   D = 1 + b2·C_A + b3·C_B + b4·C_C
//! ```
//!
//! `b5 = 0` or `D = 0` is a degeneracy of the physical model, not a software
//! fault: these functions return non-finite values and never panic. Callers
//! decide whether to reject them (`is_defined`).

use crate::domain::{Dataset, Observation, PARAM_COUNT, RateParams};

/// Predict the rate for a single observation.
pub fn predict(params: &RateParams, obs: &Observation) -> f64 {
    let numer = params.b1 * obs.cb - obs.cc / params.b5;
    numer / denominator(params, obs)
}

/// Predict the rate for every observation, in order.
pub fn predict_all(params: &RateParams, dataset: &Dataset) -> Vec<f64> {
    dataset.iter().map(|o| predict(params, o)).collect()
}

/// Partial derivatives of `predict` with respect to `b1..b5`.
pub fn jacobian_row(params: &RateParams, obs: &Observation) -> [f64; PARAM_COUNT] {
    let d = denominator(params, obs);
    let numer = params.b1 * obs.cb - obs.cc / params.b5;
    let d2 = d * d;
    [
        obs.cb / d,
        -numer * obs.ca / d2,
        -numer * obs.cb / d2,
        -numer * obs.cc / d2,
        obs.cc / (params.b5 * params.b5 * d),
    ]
}

/// `true` when the model yields a finite prediction for every observation.
pub fn is_defined(params: &RateParams, dataset: &Dataset) -> bool {
    dataset.iter().all(|o| predict(params, o).is_finite())
}

fn denominator(params: &RateParams, obs: &Observation) -> f64 {
    1.0 + params.b2 * obs.ca + params.b3 * obs.cb + params.b4 * obs.cc
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn obs(ca: f64, cb: f64, cc: f64) -> Observation {
        Observation::new(ca, cb, cc, 0.0)
    }

    #[test]
    fn predict_matches_hand_computation() {
        let p = RateParams::new(2.0, 0.5, 0.25, 1.0, 4.0);
        // numer = 2*2 - 1/4 = 3.75; denom = 1 + 0.5 + 0.5 + 1 = 3
        let y = predict(&p, &obs(1.0, 2.0, 1.0));
        assert!((y - 1.25).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs_are_non_finite_not_panics() {
        let zero_b5 = RateParams::new(1.0, 0.0, 0.0, 0.0, 0.0);
        assert!(!predict(&zero_b5, &obs(1.0, 1.0, 1.0)).is_finite());

        // 1 + (-1)*1 = 0
        let zero_denom = RateParams::new(1.0, -1.0, 0.0, 0.0, 1.0);
        assert!(!predict(&zero_denom, &obs(1.0, 1.0, 0.0)).is_finite());

        let ds = Dataset::new(vec![obs(1.0, 1.0, 0.0)]);
        assert!(!is_defined(&zero_denom, &ds));
    }

    #[test]
    fn jacobian_matches_central_differences() {
        let p = RateParams::new(1.25, 0.06, 0.04, 0.11, 1.19);
        let o = obs(1.5, 2.0, 0.6);
        let analytic = jacobian_row(&p, &o);
        let h = 1e-6;
        for k in 0..PARAM_COUNT {
            let mut up = p.to_array();
            let mut dn = p.to_array();
            up[k] += h;
            dn[k] -= h;
            let fd = (predict(&RateParams::from_array(up), &o) - predict(&RateParams::from_array(dn), &o))
                / (2.0 * h);
            assert!(
                (analytic[k] - fd).abs() < 1e-6,
                "d/db{}: analytic {} vs fd {fd}",
                k + 1,
                analytic[k]
            );
        }
    }

    proptest! {
        #[test]
        fn predict_all_preserves_length(
            rows in prop::collection::vec((0.0_f64..5.0, 0.0_f64..5.0, 0.0_f64..5.0), 0..40),
        ) {
            let ds = Dataset::new(rows.iter().map(|&(a, b, c)| obs(a, b, c)).collect());
            // Positive coefficients keep the denominator >= 1.
            let p = RateParams::new(1.2, 0.1, 0.1, 0.1, 1.1);
            let out = predict_all(&p, &ds);
            prop_assert_eq!(out.len(), ds.len());
            prop_assert!(out.iter().all(|v| v.is_finite()));
        }
    }
}
