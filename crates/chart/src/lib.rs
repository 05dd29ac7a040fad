//! # Cohort Chart
//!
//! Grouped score distributions built from factor slices.
//!
//! Each population (e.g. one subject's factor tree) contributes the
//! `(score, outcome)` pairs of [`SliceSamples`](cohort_factor_tree::SliceSamples).
//! The chart groups them by population, then by outcome in a caller-supplied
//! display order, and summarizes every group as a box plot.
//!
//! ```text
//! population ─┬─ outcome (display order) ─> BoxStats { min, q1, median, q3, max }
//!             └─ ...
//! ```
//!
//! Output is data, not pixels: [`CorrelationChart::spec`] serializes to JSON for
//! an external plotting tool, and [`render_markdown`] prints a table with a text
//! glyph per box.

mod chart;
mod error;
mod render;
mod summary;

pub use chart::{ChartRow, ChartSpec, CorrelationChart, OutcomeGroup, PopulationGroups};
pub use error::{ChartError, Result};
pub use render::render_markdown;
pub use summary::BoxStats;
