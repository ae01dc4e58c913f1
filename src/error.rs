use thiserror::Error;

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Spreadsheet decode error: {0}")]
    Decode(String),

    #[error("Report export error: {0}")]
    Export(String),

    #[error("Remote processing failed: {0}")]
    Transport(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
