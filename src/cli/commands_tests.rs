use super::*;
use crate::types::{ChartDatum, WorkOrderRecord};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

/// Write a small maintenance workbook and return its path
fn write_maintenance_workbook(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("mantenimiento.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let headers = [
        "6.Nro.Orden Energis",
        "5.Nodo",
        "MATERIAL 1",
        "CANTIDAD MATERIAL 1",
        "MATERIAL 2",
        "CANTIDAD MATERIAL 2",
    ];
    for (col, h) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *h).unwrap();
    }

    sheet.write_number(1, 0, 9001.0).unwrap();
    sheet.write_string(1, 1, "ND-1").unwrap();
    sheet.write_string(1, 2, "cobre").unwrap();
    sheet.write_number(1, 3, 3.0).unwrap();

    sheet.write_number(2, 0, 9002.0).unwrap();
    sheet.write_string(2, 1, "ND-2").unwrap();
    sheet.write_string(2, 2, "Cobre ").unwrap();
    sheet.write_string(2, 3, "2").unwrap();
    sheet.write_string(2, 4, "aluminio").unwrap();
    sheet.write_number(2, 5, 1.0).unwrap();

    workbook.save(&path).unwrap();
    path
}

fn sample_analysis() -> Analysis {
    let records = vec![
        WorkOrderRecord::new("9001", "ND-1").with_material("COBRE", 3.0),
        WorkOrderRecord::new("9002", "ND-2")
            .with_material("COBRE", 2.0)
            .with_material("ALUMINIO", 1.5),
    ];
    Analysis::from_normalized(
        Mode::Maintenance,
        crate::types::NormalizedSheet {
            catalog: ["ALUMINIO".to_string(), "COBRE".to_string()]
                .into_iter()
                .collect(),
            records,
        },
        &FilterCriteria::new(),
    )
}

// =========================================================================
// format_number Tests
// =========================================================================

#[test]
fn test_format_number_integer() {
    assert_eq!(format_number(100.0), "100");
    assert_eq!(format_number(0.0), "0");
    assert_eq!(format_number(-50.0), "-50");
}

#[test]
fn test_format_number_decimal() {
    assert_eq!(format_number(37.5), "37.5");
    assert_eq!(format_number(0.25), "0.25");
}

#[test]
fn test_format_number_precision() {
    assert_eq!(format_number(0.123456789), "0.123457");
    assert_eq!(format_number(-0.0000001), "0");
}

// =========================================================================
// OutputFormat Tests
// =========================================================================

#[test]
fn test_output_format_parse() {
    assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
    assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
    assert!("csv".parse::<OutputFormat>().is_err());
}

// =========================================================================
// Rendering Tests
// =========================================================================

#[test]
fn test_render_text_lists_orders_and_chart() {
    let text = render_analysis(&sample_analysis(), OutputFormat::Text).unwrap();
    assert!(text.contains("9001"));
    assert!(text.contains("COBRE (3)"));
    assert!(text.contains("ALUMINIO (1.5)"));
    assert!(text.contains("3.5"));
    assert!(text.contains("Catalog: 2 distinct materials"));
}

#[test]
fn test_render_json_preserves_chart_order() {
    let json = render_analysis(&sample_analysis(), OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["mode"], "mantenimiento");
    assert_eq!(value["chart"][0]["name"], "COBRE");
    assert_eq!(value["chart"][0]["quantity"], 5.0);
    assert_eq!(value["chart"][1]["name"], "ALUMINIO");
    assert_eq!(value["catalog"], serde_json::json!(["ALUMINIO", "COBRE"]));
}

#[test]
fn test_render_yaml() {
    let yaml = render_analysis(&sample_analysis(), OutputFormat::Yaml).unwrap();
    assert!(yaml.contains("mode: mantenimiento"));
    assert!(yaml.contains("order_id: '9001'"));
}

#[test]
fn test_render_preview() {
    let preview = SheetPreview {
        headers: vec!["5.Nodo".to_string(), "MATERIAL 1".to_string()],
        rows: vec![vec!["ND-1".to_string(), "cobre".to_string()]],
        total_rows: 12,
    };
    let text = render_preview("Hoja1", &preview);
    assert!(text.contains("Hoja1 (12 rows, 2 columns)"));
    assert!(text.contains("5.Nodo | MATERIAL 1"));
    assert!(text.contains("ND-1 | cobre"));
}

// =========================================================================
// Command Tests
// =========================================================================

#[test]
fn test_analyze_missing_file() {
    let result = analyze(
        PathBuf::from("/nonexistent/ordenes.xlsx"),
        Mode::Modernization,
        FilterCriteria::new(),
        OutputFormat::Text,
    );
    assert!(matches!(result, Err(AnalyzerError::Io(_))));
}

#[test]
fn test_analyze_and_materials_succeed() {
    let dir = TempDir::new().unwrap();
    let path = write_maintenance_workbook(&dir);

    assert!(analyze(
        path.clone(),
        Mode::Maintenance,
        FilterCriteria::new().node("ND"),
        OutputFormat::Json
    )
    .is_ok());
    assert!(materials(path.clone(), Mode::Maintenance).is_ok());
    assert!(preview(path, 5).is_ok());
}

#[test]
fn test_report_writes_workbook() {
    let dir = TempDir::new().unwrap();
    let input = write_maintenance_workbook(&dir);
    let output = dir.path().join("reporte.xlsx");

    report(
        input,
        output.clone(),
        Mode::Maintenance,
        FilterCriteria::new(),
        true,
    )
    .unwrap();

    let decoded = crate::excel::ExcelImporter::new(&output).import().unwrap();
    assert_eq!(decoded.name, "Ordenes");
    assert_eq!(decoded.rows.len(), 2);
}

#[test]
fn test_pipeline_on_decoded_workbook() {
    let dir = TempDir::new().unwrap();
    let path = write_maintenance_workbook(&dir);
    let sheet = load_sheet(&path).unwrap();

    let analysis = run_pipeline(&sheet.rows, Mode::Maintenance, &FilterCriteria::new());
    assert_eq!(analysis.records[0].order_id, "9001");
    assert_eq!(
        analysis.chart,
        vec![ChartDatum::new("COBRE", 5.0), ChartDatum::new("ALUMINIO", 1.0)]
    );
}

#[test]
fn test_process_unreachable_endpoint_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_maintenance_workbook(&dir);
    let config = RemoteConfig {
        url: "http://127.0.0.1:1/upload/".to_string(),
        ..RemoteConfig::default()
    };

    let result = process(input, Mode::Maintenance, config, dir.path().to_path_buf());
    assert!(matches!(result, Err(AnalyzerError::Transport(_))));
    assert!(!dir.path().join("resultado.xlsx").exists());
}

// ═══════════════════════════════════════════════════════════════════════════
// SUBMIT LIFECYCLE TESTS
// ═══════════════════════════════════════════════════════════════════════════

/// Endpoint double with a fixed answer
struct StaticEndpoint(Result<Vec<u8>, String>);

#[async_trait::async_trait]
impl ProcessingEndpoint for StaticEndpoint {
    async fn process(
        &self,
        _request: &crate::remote::UploadRequest,
    ) -> AnalyzerResult<Vec<u8>> {
        self.0.clone().map_err(AnalyzerError::Transport)
    }
}

fn loaded_session(dir: &TempDir) -> Session {
    let input = write_maintenance_workbook(dir);
    let bytes = std::fs::read(&input).unwrap();
    let sheet = decode_workbook(&bytes).unwrap();
    Session::new(Mode::Maintenance).apply(Event::FileLoaded {
        file: SelectedFile {
            name: "ordenes.xlsx".to_string(),
            bytes,
        },
        sheet,
    })
}

#[tokio::test]
async fn test_submit_session_records_saved_result() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("resultado.xlsx");
    let endpoint = StaticEndpoint(Ok(b"PK result".to_vec()));

    let session = submit_session(loaded_session(&dir), &endpoint, &output)
        .await
        .unwrap();

    assert_eq!(session.submit_status(), &SubmitStatus::Saved(output.clone()));
    assert!(session.can_submit());
    assert_eq!(std::fs::read(&output).unwrap(), b"PK result");
}

#[tokio::test]
async fn test_submit_session_records_failure() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("resultado.xlsx");
    let endpoint = StaticEndpoint(Err("connection refused".to_string()));

    let session = submit_session(loaded_session(&dir), &endpoint, &output)
        .await
        .unwrap();

    match session.submit_status() {
        SubmitStatus::Failed(message) => assert!(message.contains("connection refused")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(session.can_submit());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_submit_session_requires_file() {
    let dir = TempDir::new().unwrap();
    let endpoint = StaticEndpoint(Ok(Vec::new()));

    let result = submit_session(
        Session::new(Mode::Maintenance),
        &endpoint,
        &dir.path().join("resultado.xlsx"),
    )
    .await;
    assert!(matches!(result, Err(AnalyzerError::Validation(_))));
}
