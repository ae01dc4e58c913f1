//! Poste API Server module
//!
//! HTTP REST API for analyzing uploaded work-order workbooks and forwarding
//! them to the remote processor. Run with `poste-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
