//! API request handlers
//!
//! Uploads arrive as `multipart/form-data` with the same field names the
//! remote processor uses: `files` and `tipo_archivo`. The analyze endpoint
//! also accepts `nodo`, `ot` and repeated `material` filter fields.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::server::AppState;
use crate::core::{analyze, Analysis};
use crate::excel::decode_workbook;
use crate::remote::{UploadRequest, DEFAULT_OUTPUT_NAME, XLSX_MIME};
use crate::session::PREVIEW_ROWS;
use crate::types::{FilterCriteria, Mode, SheetPreview};

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::err(message))).into_response()
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Poste API Server".to_string(),
        version: state.version.clone(),
        description: "Utility-pole work-order analysis over HTTP".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new("/version", "GET", "Get server version"),
            EndpointInfo::new(
                "/api/v1/analyze",
                "POST",
                "Normalize, filter and chart an uploaded workbook",
            ),
            EndpointInfo::new(
                "/api/v1/process",
                "POST",
                "Forward an uploaded workbook to the remote processor",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec!["analyze".to_string(), "process".to_string()],
    }))
}

/// Fields read from an upload form
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file_name: Option<String>,
    pub bytes: Option<Vec<u8>>,
    pub mode: Mode,
    pub criteria: FilterCriteria,
}

impl UploadForm {
    /// Read every field of the form; unknown fields are ignored
    pub async fn read(multipart: &mut Multipart) -> Result<Self, String> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "files" => {
                    form.file_name = field.file_name().map(str::to_string);
                    let bytes = field.bytes().await.map_err(|e| e.to_string())?;
                    form.bytes = Some(bytes.to_vec());
                }
                "tipo_archivo" => {
                    let text = field.text().await.map_err(|e| e.to_string())?;
                    form.mode = Mode::from_str(&text).map_err(|e| e.to_string())?;
                }
                "nodo" => {
                    form.criteria.node_substring = field.text().await.map_err(|e| e.to_string())?;
                }
                "ot" => {
                    form.criteria.order_substring = field.text().await.map_err(|e| e.to_string())?;
                }
                "material" => {
                    let text = field.text().await.map_err(|e| e.to_string())?;
                    form.criteria.selected_materials.insert(text);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    fn file_name_or_default(&self) -> String {
        self.file_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "archivo.xlsx".to_string())
    }
}

/// Analyze response
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub file_name: String,
    pub sheet_name: String,
    pub preview: SheetPreview,
    pub analysis: Analysis,
}

/// POST /api/v1/analyze - Normalize, filter and aggregate an uploaded workbook
pub async fn analyze_upload(mut multipart: Multipart) -> Response {
    let form = match UploadForm::read(&mut multipart).await {
        Ok(form) => form,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };
    let file_name = form.file_name_or_default();
    let UploadForm {
        bytes,
        mode,
        criteria,
        ..
    } = form;
    let Some(bytes) = bytes else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'files' field");
    };

    // calamine parsing is CPU-bound
    let decoded = tokio::task::spawn_blocking(move || {
        decode_workbook(&bytes).map(|sheet| {
            let analysis = analyze(&sheet.rows, mode, &criteria);
            (sheet, analysis)
        })
    })
    .await;

    let (sheet, analysis) = match decoded {
        Ok(Ok(decoded)) => decoded,
        Ok(Err(e)) => {
            warn!(file = %file_name, error = %e, "rejected upload");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
        Err(e) => {
            error!(file = %file_name, error = %e, "decode task failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to decode workbook",
            );
        }
    };

    info!(
        file = %file_name,
        mode = %mode,
        rows = analysis.total_rows,
        shown = analysis.filtered.len(),
        "analyzed upload"
    );

    Json(ApiResponse::ok(AnalyzeResponse {
        file_name,
        sheet_name: sheet.name.clone(),
        preview: sheet.preview(PREVIEW_ROWS),
        analysis,
    }))
    .into_response()
}

/// POST /api/v1/process - Forward the upload to the remote processor
pub async fn process_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let form = match UploadForm::read(&mut multipart).await {
        Ok(form) => form,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };
    let file_name = form.file_name_or_default();
    let Some(bytes) = form.bytes else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'files' field");
    };

    let request = UploadRequest {
        file_name,
        bytes,
        mode: form.mode,
    };

    match state.endpoint.process(&request).await {
        Ok(body) => {
            info!(file = %request.file_name, bytes = body.len(), "relayed processing result");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, XLSX_MIME.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", DEFAULT_OUTPUT_NAME),
                    ),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => {
            warn!(file = %request.file_name, error = %e, "remote processing failed");
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}
