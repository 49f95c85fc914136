//! Summary charts of the processed table.
//!
//! [`aggregate`] computes the numbers each chart shows; [`ChartRenderer`]
//! turns them into SVG files. Charts are independent: one failing chart is
//! reported and the rest are still drawn.

pub mod aggregate;
mod render;

pub use render::{Chart, ChartFailure, ChartRenderer, RenderReport};
