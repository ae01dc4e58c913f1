//! Remote processing client against a local fake processor

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Router,
};
use poste_analyzer::remote::{
    submit, HttpProcessingEndpoint, ProcessingEndpoint, RemoteConfig, SubmitOutcome,
    UploadRequest, DEFAULT_OUTPUT_NAME,
};
use poste_analyzer::types::Mode;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// One multipart field as the fake processor saw it
#[derive(Debug, Clone, PartialEq)]
struct SeenField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

type Seen = Arc<Mutex<Vec<SeenField>>>;

async fn record_upload(State(seen): State<Seen>, mut multipart: Multipart) -> Vec<u8> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let body = field.bytes().await.unwrap().to_vec();
        seen.lock().unwrap().push(SeenField {
            name,
            file_name,
            content_type,
            body,
        });
    }
    b"PK processed".to_vec()
}

async fn reject_upload() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

/// Serve `app` on an ephemeral port and return its upload URL
async fn spawn_processor(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/upload/", addr)
}

fn request(mode: Mode) -> UploadRequest {
    UploadRequest {
        file_name: "ordenes.xlsx".to_string(),
        bytes: b"PK\x03\x04 original workbook".to_vec(),
        mode,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// WIRE FORMAT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_upload_sends_original_file_and_mode() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/upload/", post(record_upload))
        .with_state(seen.clone());
    let url = spawn_processor(app).await;

    let endpoint = HttpProcessingEndpoint::new(&RemoteConfig {
        url,
        ..RemoteConfig::default()
    })
    .unwrap();
    let body = endpoint.process(&request(Mode::Maintenance)).await.unwrap();
    assert_eq!(body, b"PK processed");

    let fields = seen.lock().unwrap().clone();
    assert_eq!(fields.len(), 2);

    assert_eq!(fields[0].name, "files");
    assert_eq!(fields[0].file_name.as_deref(), Some("ordenes.xlsx"));
    assert_eq!(
        fields[0].content_type.as_deref(),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    );
    assert_eq!(fields[0].body, b"PK\x03\x04 original workbook");

    assert_eq!(fields[1].name, "tipo_archivo");
    assert_eq!(fields[1].body, b"mantenimiento");
}

#[tokio::test]
async fn test_modernization_mode_value() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/upload/", post(record_upload))
        .with_state(seen.clone());
    let url = spawn_processor(app).await;

    let endpoint = HttpProcessingEndpoint::new(&RemoteConfig {
        url,
        ..RemoteConfig::default()
    })
    .unwrap();
    endpoint.process(&request(Mode::Modernization)).await.unwrap();

    let fields = seen.lock().unwrap().clone();
    assert_eq!(fields[1].body, b"modernizacion");
}

// ═══════════════════════════════════════════════════════════════════════════
// SUBMIT TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_submit_saves_result_workbook() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/upload/", post(record_upload))
        .with_state(seen);
    let url = spawn_processor(app).await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join(DEFAULT_OUTPUT_NAME);

    let endpoint = HttpProcessingEndpoint::new(&RemoteConfig {
        url,
        timeout_secs: Some(10),
        ..RemoteConfig::default()
    })
    .unwrap();
    let outcome = submit(&endpoint, &request(Mode::Maintenance), &output).await;

    assert_eq!(outcome, SubmitOutcome::Saved(output.clone()));
    assert_eq!(std::fs::read(&output).unwrap(), b"PK processed");
}

#[tokio::test]
async fn test_submit_server_error_fails_without_file() {
    let app = Router::new().route("/upload/", post(reject_upload));
    let url = spawn_processor(app).await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join(DEFAULT_OUTPUT_NAME);

    let endpoint = HttpProcessingEndpoint::new(&RemoteConfig {
        url,
        ..RemoteConfig::default()
    })
    .unwrap();
    let outcome = submit(&endpoint, &request(Mode::Modernization), &output).await;

    match outcome {
        SubmitOutcome::Failed(message) => assert!(message.contains("500")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(!output.exists());
}

#[tokio::test]
async fn test_submit_unreachable_processor_fails() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join(DEFAULT_OUTPUT_NAME);

    let endpoint = HttpProcessingEndpoint::new(&RemoteConfig {
        url: "http://127.0.0.1:1/upload/".to_string(),
        ..RemoteConfig::default()
    })
    .unwrap();
    let outcome = submit(&endpoint, &request(Mode::Maintenance), &output).await;

    assert!(!outcome.is_saved());
    assert!(!output.exists());
}
