//! Poste - utility-pole work-order analyzer
//!
//! Reads work-order spreadsheets, normalizes each row into an order id, a
//! pole node id and up to ten material entries, filters the records and sums
//! material quantities for a bar chart.
//!
//! # Features
//!
//! - Two sheet layouts: modernization and maintenance
//! - Node, order and material filters, display capped at 10 records
//! - Chart totals in first-appearance order plus a responsive chart layout
//! - Excel import/export
//! - Remote processing of the original workbook
//!
//! # Example
//!
//! ```no_run
//! use poste_analyzer::core::analyze;
//! use poste_analyzer::excel::ExcelImporter;
//! use poste_analyzer::types::{FilterCriteria, Mode};
//!
//! let sheet = ExcelImporter::new("ordenes.xlsx").import()?;
//! let criteria = FilterCriteria::new().node("ND-1");
//! let analysis = analyze(&sheet.rows, Mode::Maintenance, &criteria);
//!
//! for datum in &analysis.chart {
//!     println!("{}: {}", datum.name, datum.quantity);
//! }
//! # Ok::<(), poste_analyzer::error::AnalyzerError>(())
//! ```

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod logging;
pub mod remote;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use error::{AnalyzerError, AnalyzerResult};
pub use types::{
    CellValue, ChartDatum, ChartLayout, DecodedSheet, FilterCriteria, MaterialCatalog,
    MaterialEntry, Mode, NormalizedSheet, RawRow, WorkOrderRecord,
};
