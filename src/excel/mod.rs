//! Excel collaborators
//!
//! - Import: first worksheet of an .xlsx work-order file → decoded rows
//! - Export: analysis → report workbook

mod exporter;
mod importer;

pub use exporter::ReportExporter;
pub use importer::{decode_workbook, ExcelImporter};
