//! The three-equation nonlinear system.
//!
//! ```text
//! r1 = a·y1² + b·y1 − 10
//! r2 = b·y1² + y2 − 12
//! r3 = b + y3 − 8
//! ```
//!
//! `a` and `b` are fixed constants; `y1..y3` are the unknowns.

use crate::domain::SystemConstants;

/// Number of unknowns (and equations).
pub const DIM: usize = 3;

/// Equation residuals at `y`.
pub fn residuals(k: &SystemConstants, y: &[f64; DIM]) -> [f64; DIM] {
    [
        k.a * y[0] * y[0] + k.b * y[0] - 10.0,
        k.b * y[0] * y[0] + y[1] - 12.0,
        k.b + y[2] - 8.0,
    ]
}

/// Analytic Jacobian `∂r_i/∂y_j` (row-major).
pub fn jacobian(k: &SystemConstants, y: &[f64; DIM]) -> [[f64; DIM]; DIM] {
    [
        [2.0 * k.a * y[0] + k.b, 0.0, 0.0],
        [2.0 * k.b * y[0], 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residuals_vanish_at_known_root() {
        let k = SystemConstants { a: 1.0, b: 2.0 };
        let y1 = -1.0 + 11.0_f64.sqrt();
        let y = [y1, 12.0 - 2.0 * y1 * y1, 6.0];
        for r in residuals(&k, &y) {
            assert!(r.abs() < 1e-12);
        }
    }

    #[test]
    fn residuals_at_unit_guess() {
        let k = SystemConstants { a: 1.0, b: 2.0 };
        assert_eq!(residuals(&k, &[1.0, 1.0, 1.0]), [-7.0, -9.0, -5.0]);
    }

    #[test]
    fn jacobian_first_row_is_derivative_of_quadratic() {
        let k = SystemConstants { a: 3.0, b: 2.0 };
        let j = jacobian(&k, &[1.5, 0.0, 0.0]);
        assert_eq!(j[0], [11.0, 0.0, 0.0]);
        assert_eq!(j[1], [6.0, 1.0, 0.0]);
    }
}
