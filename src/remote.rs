//! Remote processing endpoint
//!
//! Forwards the original, unmodified workbook to the server-side processor and
//! stores the result workbook it answers with. This path never touches the
//! normalized records.

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::types::Mode;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

/// Default server-side processor
pub const DEFAULT_UPLOAD_URL: &str = "https://frontendfastapi.duckdns.org/upload/";

/// File name the result workbook is saved under
pub const DEFAULT_OUTPUT_NAME: &str = "resultado.xlsx";

/// Largest result workbook accepted from the processor
pub const MAX_RESPONSE_BYTES: usize = 50 * 1024 * 1024; // 50 MiB

/// Content type of .xlsx workbooks
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Remote processing configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub output_name: String,
    /// No timeout unless set
    pub timeout_secs: Option<u64>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPLOAD_URL.to_string(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            timeout_secs: None,
        }
    }
}

/// The file as the user selected it, plus the sheet mode
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mode: Mode,
}

/// Server-side processor of work-order workbooks
#[async_trait]
pub trait ProcessingEndpoint: Send + Sync {
    /// Send the workbook and return the result workbook bytes
    async fn process(&self, request: &UploadRequest) -> AnalyzerResult<Vec<u8>>;
}

/// Multipart HTTP client for the processor
pub struct HttpProcessingEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpProcessingEndpoint {
    pub fn new(config: &RemoteConfig) -> AnalyzerResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AnalyzerError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ProcessingEndpoint for HttpProcessingEndpoint {
    async fn process(&self, request: &UploadRequest) -> AnalyzerResult<Vec<u8>> {
        let part = Part::bytes(request.bytes.clone())
            .file_name(request.file_name.clone())
            .mime_str(XLSX_MIME)
            .map_err(|e| AnalyzerError::Transport(e.to_string()))?;
        let form = Form::new()
            .part("files", part)
            .text("tipo_archivo", request.mode.as_str());

        let mut response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AnalyzerError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| AnalyzerError::Transport(e.to_string()))?;

        read_body_with_limit(&mut response, MAX_RESPONSE_BYTES).await
    }
}

/// Read a response body into memory, failing once it exceeds `limit_bytes`
async fn read_body_with_limit(
    response: &mut reqwest::Response,
    limit_bytes: usize,
) -> AnalyzerResult<Vec<u8>> {
    if let Some(content_length) = response.content_length() {
        if content_length > limit_bytes as u64 {
            return Err(AnalyzerError::Transport(format!(
                "Response body too large (limit {} bytes, Content-Length {} bytes)",
                limit_bytes, content_length
            )));
        }
    }

    let mut out: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| AnalyzerError::Transport(e.to_string()))?
    {
        if out.len().saturating_add(chunk.len()) > limit_bytes {
            return Err(AnalyzerError::Transport(format!(
                "Response body too large (limit {} bytes)",
                limit_bytes
            )));
        }
        out.extend_from_slice(&chunk);
    }

    Ok(out)
}

/// How a submit ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Result workbook written to this path
    Saved(PathBuf),
    Failed(String),
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }
}

/// Send `request` and save the answer to `output_path`.
///
/// Failures are logged and reported in the outcome, never propagated.
pub async fn submit(
    endpoint: &dyn ProcessingEndpoint,
    request: &UploadRequest,
    output_path: &Path,
) -> SubmitOutcome {
    info!(
        file = %request.file_name,
        mode = %request.mode,
        bytes = request.bytes.len(),
        "submitting workbook for processing"
    );

    let result = match endpoint.process(request).await {
        Ok(body) => tokio::fs::write(output_path, &body)
            .await
            .map(|_| body.len())
            .map_err(AnalyzerError::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(len) => {
            info!(path = %output_path.display(), bytes = len, "saved processing result");
            SubmitOutcome::Saved(output_path.to_path_buf())
        }
        Err(e) => {
            error!(file = %request.file_name, error = %e, "processing request failed");
            SubmitOutcome::Failed(e.to_string())
        }
    }
}
