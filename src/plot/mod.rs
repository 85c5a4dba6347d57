//! Parity plots: terminal (`ascii`) and SVG image (`svg`).

pub mod ascii;
pub mod svg;

pub use ascii::render_parity_plot;
pub use svg::write_parity_svg;
