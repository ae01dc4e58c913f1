use crate::core::{analyze as run_pipeline, normalize, Analysis, DISPLAY_LIMIT};
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::excel::{decode_workbook, ExcelImporter, ReportExporter};
use crate::remote::{submit, HttpProcessingEndpoint, ProcessingEndpoint, RemoteConfig};
use crate::session::{Event, SelectedFile, Session, SubmitStatus};
use crate::types::{DecodedSheet, FilterCriteria, Mode, SheetPreview};
use colored::Colorize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Output format of the `analyze` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(AnalyzerError::Validation(format!(
                "Unknown format '{}' (expected text, json or yaml)",
                other
            ))),
        }
    }
}

/// Format a number for display, removing unnecessary decimal places
fn format_number(n: f64) -> String {
    let rounded = (n * 1e6).round() / 1e6;
    let text = format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string();
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

fn load_sheet(file: &Path) -> AnalyzerResult<DecodedSheet> {
    ExcelImporter::new(file).import()
}

/// Execute the preview command
pub fn preview(file: PathBuf, rows: usize) -> AnalyzerResult<()> {
    println!("{}", "📄 Poste - Sheet Preview".bold().green());
    println!("   File: {}\n", file.display());

    let sheet = load_sheet(&file)?;
    print!("{}", render_preview(&sheet.name, &sheet.preview(rows)));
    Ok(())
}

fn render_preview(sheet_name: &str, preview: &SheetPreview) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "   Sheet: {} ({} rows, {} columns)\n",
        sheet_name,
        preview.total_rows,
        preview.headers.len()
    );
    let _ = writeln!(out, "{}", preview.headers.join(" | "));
    for row in &preview.rows {
        let _ = writeln!(out, "{}", row.join(" | "));
    }
    out
}

/// Execute the analyze command
pub fn analyze(
    file: PathBuf,
    mode: Mode,
    criteria: FilterCriteria,
    format: OutputFormat,
) -> AnalyzerResult<()> {
    let sheet = load_sheet(&file)?;
    let analysis = run_pipeline(&sheet.rows, mode, &criteria);

    if format == OutputFormat::Text {
        println!("{}", "📊 Poste - Work Order Analysis".bold().green());
        println!("   File: {}", file.display());
        println!("   Mode: {}\n", mode.label().bright_yellow());
    }
    print!("{}", render_analysis(&analysis, format)?);
    Ok(())
}

/// Render an analysis in the requested format
pub fn render_analysis(analysis: &Analysis, format: OutputFormat) -> AnalyzerResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(analysis)? + "\n"),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(analysis)?),
        OutputFormat::Text => Ok(render_text(analysis)),
    }
}

fn render_text(analysis: &Analysis) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} (showing {} of {} orders, max {})",
        "Orders:".bold().cyan(),
        analysis.filtered.len(),
        analysis.total_rows,
        DISPLAY_LIMIT
    );
    if analysis.filtered.is_empty() {
        let _ = writeln!(out, "   No matching orders");
    }
    for record in &analysis.filtered {
        let materials = record
            .materials
            .iter()
            .map(|m| format!("{} ({})", m.name, format_number(m.quantity)))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "   OT {} | Nodo {} | {} | Total {}",
            record.order_id.bright_blue(),
            record.node_id,
            materials,
            format_number(record.total_quantity()).bold()
        );
    }

    let _ = writeln!(out, "\n{}", "Materials chart:".bold().cyan());
    let max = analysis
        .chart
        .iter()
        .map(|d| d.quantity)
        .fold(0.0_f64, f64::max);
    for datum in &analysis.chart {
        let width = if max > 0.0 {
            ((datum.quantity / max) * 40.0).round().max(0.0) as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "   {:<30} {:>10} {}",
            datum.name,
            format_number(datum.quantity),
            "█".repeat(width).green()
        );
    }

    let layout = &analysis.layout;
    let _ = writeln!(
        out,
        "\n   Chart layout: {}x{}, labels {}°, tick font {}, bar size {}",
        layout.width,
        layout.height,
        layout.x_axis.angle,
        layout.x_axis.tick_font_size,
        format_number(layout.bar_size)
    );
    let _ = writeln!(out, "   Catalog: {} distinct materials", analysis.catalog.len());
    out
}

/// Execute the materials command
pub fn materials(file: PathBuf, mode: Mode) -> AnalyzerResult<()> {
    let sheet = load_sheet(&file)?;
    let normalized = normalize(&sheet.rows, mode);

    println!(
        "{} ({} in {} orders)",
        "🧰 Materials".bold().green(),
        normalized.catalog.len(),
        normalized.records.len()
    );
    for name in normalized.catalog.iter() {
        println!("   {}", name);
    }
    Ok(())
}

/// Execute the report command
pub fn report(
    file: PathBuf,
    output: PathBuf,
    mode: Mode,
    criteria: FilterCriteria,
    verbose: bool,
) -> AnalyzerResult<()> {
    println!("{}", "📊 Poste - Excel Report".bold().green());
    println!("   Input:  {}", file.display());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!("{}", "📖 Reading Excel file...".cyan());
    }
    let sheet = load_sheet(&file)?;
    let analysis = run_pipeline(&sheet.rows, mode, &criteria);

    if verbose {
        println!(
            "   {} orders, {} shown, {} materials\n",
            analysis.total_rows,
            analysis.filtered.len(),
            analysis.catalog.len()
        );
        println!("{}", "💾 Writing report...".cyan());
    }

    ReportExporter::new(&analysis).export(&output)?;

    println!("{}", "✅ Report Complete!".bold().green());
    println!("   Excel file: {}\n", output.display());
    Ok(())
}

/// Execute the process command: forward the workbook to the remote processor
pub fn process(
    file: PathBuf,
    mode: Mode,
    config: RemoteConfig,
    output_dir: PathBuf,
) -> AnalyzerResult<()> {
    println!("{}", "🚀 Poste - Remote Processing".bold().green());
    println!("   File: {}", file.display());
    println!("   Mode: {}", mode.label().bright_yellow());
    println!("   Endpoint: {}\n", config.url);

    let bytes = std::fs::read(&file)?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archivo.xlsx".to_string());
    // Processing works on the raw bytes; an undecodable sheet only loses the local preview
    let sheet = decode_workbook(&bytes).unwrap_or_else(|e| {
        warn!(file = %file.display(), error = %e, "could not decode workbook locally");
        DecodedSheet::default()
    });

    let session = Session::new(mode).apply(Event::FileLoaded {
        file: SelectedFile { name, bytes },
        sheet,
    });
    if let Some(preview) = session.preview() {
        println!(
            "   Local sheet: {} rows, {} orders normalized\n",
            preview.total_rows,
            session.normalized().records.len()
        );
    }

    let endpoint = HttpProcessingEndpoint::new(&config)?;
    let output_path = output_dir.join(&config.output_name);

    let runtime = tokio::runtime::Runtime::new()?;
    let session = runtime.block_on(submit_session(session, &endpoint, &output_path))?;

    match session.submit_status() {
        SubmitStatus::Saved(path) => {
            println!("{}", "✅ Processing Complete!".bold().green());
            println!("   Result: {}\n", path.display());
            Ok(())
        }
        SubmitStatus::Failed(message) => {
            println!("{} {}", "❌ Processing failed:".bold().red(), message);
            Err(AnalyzerError::Transport(message.clone()))
        }
        SubmitStatus::Idle | SubmitStatus::InFlight => Err(AnalyzerError::Validation(
            "Submit did not complete".to_string(),
        )),
    }
}

/// Drive one submit through the session: `SubmitStarted`, the remote call, `SubmitFinished`
async fn submit_session(
    session: Session,
    endpoint: &dyn ProcessingEndpoint,
    output_path: &Path,
) -> AnalyzerResult<Session> {
    if !session.can_submit() {
        return Err(AnalyzerError::Validation(
            "No file selected or a submit is already running".to_string(),
        ));
    }

    let session = session.apply(Event::SubmitStarted);
    let request = session
        .upload_request()
        .ok_or_else(|| AnalyzerError::Validation("No file selected".to_string()))?;
    let outcome = submit(endpoint, &request, output_path).await;

    Ok(session.apply(Event::SubmitFinished(outcome)))
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
