//! Poste API Server implementation
//!
//! HTTP REST API server using Axum. Uploads are analyzed in-process or
//! forwarded to the remote processor.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::handlers;
use crate::logging;
use crate::remote::{HttpProcessingEndpoint, ProcessingEndpoint, RemoteConfig, DEFAULT_UPLOAD_URL};

/// Largest accepted upload request
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024; // 25 MiB

/// API Server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Remote processor that `/api/v1/process` forwards to
    pub upload_url: String,
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            timeout_secs: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub version: String,
    pub endpoint: Arc<dyn ProcessingEndpoint>,
}

impl AppState {
    pub fn new(endpoint: Arc<dyn ProcessingEndpoint>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoint,
        }
    }
}

/// Routes and middleware, without binding a socket
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        .route("/api/v1/analyze", post(handlers::analyze_upload))
        .route("/api/v1/process", post(handlers::process_upload))
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    logging::init("poste_server=info,poste_analyzer=info,tower_http=info");

    let endpoint = HttpProcessingEndpoint::new(&RemoteConfig {
        url: config.upload_url.clone(),
        timeout_secs: config.timeout_secs,
        ..RemoteConfig::default()
    })?;
    let state = Arc::new(AppState::new(Arc::new(endpoint)));
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Poste API Server starting on http://{}", addr);
    info!("   Endpoints: /api/v1/analyze, /api/v1/process");
    info!("   Processor: {}", config.upload_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Poste API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
