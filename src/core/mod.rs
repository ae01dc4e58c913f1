//! Work-order normalization and material aggregation pipeline
//!
//! `normalize(rows, mode) → filter(records, criteria) → aggregate(filtered) → layout(n)`,
//! every stage a pure function.

pub mod aggregate;
pub mod coerce;
pub mod columns;
pub mod filter;
pub mod layout;
pub mod normalizer;
pub mod pipeline;

pub use aggregate::aggregate_chart;
pub use filter::{filter_records, DISPLAY_LIMIT};
pub use layout::{chart_layout, chart_layout_for_viewport};
pub use normalizer::{normalize, RowNormalizer};
pub use pipeline::{analyze, Analysis};
