//! CLI command handlers

pub mod commands;

pub use commands::{analyze, materials, preview, process, render_analysis, report, OutputFormat};
