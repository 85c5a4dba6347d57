//! Plotters-powered parity plot, written as an SVG image.
//!
//! The terminal plot (`plot::ascii`) is good for a quick look; this one is the
//! shareable artifact. Both use the same data and the same axis range
//! (`report::parity_bounds`), so the 45° reference line is the chart diagonal.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::ObservationResidual;
use crate::error::AppError;
use crate::report::parity_bounds;

/// Write a parity plot (observed vs. predicted) to `path` as SVG.
pub fn write_parity_svg(path: &Path, residuals: &[ObservationResidual], size: (u32, u32)) -> Result<(), AppError> {
    let (lo, hi) = parity_bounds(residuals)
        .ok_or_else(|| AppError::Plot("No finite observations to plot.".to_string()))?;
    // A single distinct value still needs a non-empty axis range.
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Parity plot", ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..hi, lo..hi)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Observed rate")
        .y_desc("Predicted rate")
        .x_labels(6)
        .y_labels(6)
        .draw()
        .map_err(plot_err)?;

    // 1) 45° reference line.
    chart
        .draw_series(LineSeries::new(vec![(lo, lo), (hi, hi)], &BLACK))
        .map_err(plot_err)?;

    // 2) Observations.
    let marker = RGBColor(31, 119, 180);
    chart
        .draw_series(
            residuals
                .iter()
                .filter(|r| r.observation.rate.is_finite() && r.predicted.is_finite())
                .map(|r| Circle::new((r.observation.rate, r.predicted), 4, marker.filled())),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

fn plot_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Plot(e.to_string())
}
