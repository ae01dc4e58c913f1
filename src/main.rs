use clap::{Parser, Subcommand};
use poste_analyzer::cli::{self, OutputFormat};
use poste_analyzer::error::AnalyzerResult;
use poste_analyzer::logging;
use poste_analyzer::remote::{RemoteConfig, DEFAULT_OUTPUT_NAME, DEFAULT_UPLOAD_URL};
use poste_analyzer::types::{FilterCriteria, Mode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "poste")]
#[command(about = "Utility-pole work-order analyzer for Excel sheets")]
#[command(long_about = "Poste - Utility-pole work-order analyzer

Reads the first worksheet of a work-order .xlsx file, normalizes each row
into (order, node, materials) and sums material quantities for a chart.

MODES:
  modernizacion  - '2.Nro de O.T.' / '1.NODO DEL POSTE.' columns
  mantenimiento  - '6.Nro.Orden Energis' / '5.Nodo' columns

COMMANDS:
  preview    - Show the first rows of the sheet
  analyze    - Filtered orders, chart totals and chart layout
  materials  - Distinct material catalog
  report     - Write the analysis to an Excel report
  process    - Send the workbook to the remote processor

EXAMPLES:
  poste analyze ordenes.xlsx --mode mantenimiento --node ND-1
  poste analyze ordenes.xlsx --material CRUCETA --material POSTE --format json
  poste process ordenes.xlsx --mode modernizacion --output-dir out/")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Filter flags shared by analyze and report
#[derive(clap::Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Keep orders whose node contains this text
    #[arg(long, default_value = "")]
    node: String,

    /// Keep orders whose OT contains this text
    #[arg(long, default_value = "")]
    order: String,

    /// Keep orders using this material (repeatable, exact normalized name)
    #[arg(short, long = "material")]
    materials: Vec<String>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            node_substring: args.node,
            order_substring: args.order,
            selected_materials: args.materials.into_iter().collect(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the first rows of the work-order sheet
    Preview {
        /// Path to the .xlsx file
        file: PathBuf,

        /// Number of rows to show
        #[arg(short, long, default_value_t = 5)]
        rows: usize,
    },

    #[command(long_about = "Normalize, filter and aggregate a work-order sheet.

At most 10 orders are listed. Chart totals are summed over the listed
orders only, in the order materials first appear.

Use --format json or --format yaml for machine-readable output.")]
    /// Analyze a work-order sheet
    Analyze {
        /// Path to the .xlsx file
        file: PathBuf,

        /// Sheet mode (modernizacion or mantenimiento)
        #[arg(long, default_value = "modernizacion", env = "POSTE_MODE")]
        mode: Mode,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output format (text, json, yaml)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the distinct normalized material names
    Materials {
        /// Path to the .xlsx file
        file: PathBuf,

        /// Sheet mode (modernizacion or mantenimiento)
        #[arg(long, default_value = "modernizacion", env = "POSTE_MODE")]
        mode: Mode,
    },

    /// Write orders, chart and catalog to an Excel report
    Report {
        /// Path to the input .xlsx file
        input: PathBuf,

        /// Path to the output report (.xlsx)
        output: PathBuf,

        /// Sheet mode (modernizacion or mantenimiento)
        #[arg(long, default_value = "modernizacion", env = "POSTE_MODE")]
        mode: Mode,

        #[command(flatten)]
        filters: FilterArgs,

        /// Show verbose progress
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Send the workbook, unmodified, to the remote processor.

The file goes out as multipart field 'files' with 'tipo_archivo' set to the
mode. The answer is saved as resultado.xlsx in the output directory.")]
    /// Process a workbook on the remote server
    Process {
        /// Path to the .xlsx file
        file: PathBuf,

        /// Sheet mode (modernizacion or mantenimiento)
        #[arg(long, default_value = "modernizacion", env = "POSTE_MODE")]
        mode: Mode,

        /// Processing endpoint URL
        #[arg(long, env = "POSTE_UPLOAD_URL", default_value = DEFAULT_UPLOAD_URL)]
        url: String,

        /// Directory the result workbook is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Request timeout in seconds (none by default)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

fn main() -> AnalyzerResult<()> {
    logging::init("warn");
    let cli = Cli::parse();

    match cli.command {
        Commands::Preview { file, rows } => cli::preview(file, rows),

        Commands::Analyze {
            file,
            mode,
            filters,
            format,
        } => cli::analyze(file, mode, filters.into(), format),

        Commands::Materials { file, mode } => cli::materials(file, mode),

        Commands::Report {
            input,
            output,
            mode,
            filters,
            verbose,
        } => cli::report(input, output, mode, filters.into(), verbose),

        Commands::Process {
            file,
            mode,
            url,
            output_dir,
            timeout_secs,
        } => {
            let config = RemoteConfig {
                url,
                output_name: DEFAULT_OUTPUT_NAME.to_string(),
                timeout_secs,
            };
            cli::process(file, mode, config, output_dir)
        }
    }
}
