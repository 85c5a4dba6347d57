//! ASCII parity plot for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observations: `o` at (observed, predicted)
//! - 45° reference line: `.`
//!
//! Both axes share the same range so the reference line is the grid diagonal.

use crate::domain::ObservationResidual;
use crate::report::parity_bounds;

/// Render a parity plot (observed on x, predicted on y).
pub fn render_parity_plot(residuals: &[ObservationResidual], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (lo, hi) = parity_bounds(residuals)
        .map(|(lo, hi)| pad_range(lo, hi, 0.05))
        .unwrap_or((0.0, 1.0));

    let mut grid = vec![vec![' '; width]; height];

    // Reference line first so points overlay it.
    let x0 = map_x(lo, lo, hi, width);
    let y0 = map_y(lo, lo, hi, height);
    let x1 = map_x(hi, lo, hi, width);
    let y1 = map_y(hi, lo, hi, height);
    draw_line(&mut grid, x0, y0, x1, y1, '.');

    for r in residuals {
        if !(r.observation.rate.is_finite() && r.predicted.is_finite()) {
            continue;
        }
        let x = map_x(r.observation.rate, lo, hi, width);
        let y = map_y(r.predicted, lo, hi, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Parity: x=observed, y=predicted | range=[{lo:.3}, {hi:.3}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(v: f64, lo: f64, hi: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((v - lo) / (hi - lo)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(v: f64, lo: f64, hi: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((v - lo) / (hi - lo)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
