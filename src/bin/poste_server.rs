//! Poste API Server binary
//!
//! HTTP REST API for work-order workbook analysis and remote processing.

use clap::Parser;
use poste_analyzer::api::{run_api_server, ApiConfig};
use poste_analyzer::remote::DEFAULT_UPLOAD_URL;

#[derive(Parser, Debug)]
#[command(name = "poste-server")]
#[command(version)]
#[command(about = "Poste API Server - HTTP API for utility-pole work-order workbooks")]
#[command(long_about = r#"
Poste API Server - HTTP REST API

Endpoints:
  - POST /api/v1/analyze   - Normalize, filter and chart an uploaded .xlsx
  - POST /api/v1/process   - Forward an uploaded .xlsx to the remote processor
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Uploads are multipart/form-data with fields 'files' and 'tipo_archivo'
(modernizacion or mantenimiento). Analyze also takes 'nodo', 'ot' and
repeated 'material' filters.

Example usage:
  poste-server                           # Start on localhost:8080
  poste-server --host 0.0.0.0 --port 3000

  curl -F files=@ordenes.xlsx -F tipo_archivo=mantenimiento \
    http://localhost:8080/api/v1/analyze
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "POSTE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "POSTE_PORT")]
    port: u16,

    /// Remote processor the process endpoint forwards to
    #[arg(long, default_value = DEFAULT_UPLOAD_URL, env = "POSTE_UPLOAD_URL")]
    upload_url: String,

    /// Remote request timeout in seconds (none by default)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        upload_url: args.upload_url,
        timeout_secs: args.timeout_secs,
    };

    run_api_server(config).await
}
