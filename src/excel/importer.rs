//! Excel importer implementation - first worksheet (.xlsx) → decoded rows

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::types::{CellValue, DecodedSheet, RawRow};
use calamine::{Data, Range, Reader, Xlsx};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header used for blank header cells
const EMPTY_HEADER: &str = "__EMPTY";

/// Excel importer for work-order workbooks
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read the file and decode its first worksheet
    pub fn import(&self) -> AnalyzerResult<DecodedSheet> {
        let bytes = std::fs::read(&self.path)?;
        decode_workbook(&bytes)
    }
}

/// Decode the first worksheet of an in-memory .xlsx workbook
pub fn decode_workbook(bytes: &[u8]) -> AnalyzerResult<DecodedSheet> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| AnalyzerError::Decode(format!("Failed to open Excel file: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AnalyzerError::Decode("Workbook has no worksheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| AnalyzerError::Decode(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

    let sheet = decode_range(&sheet_name, &range);
    debug!(
        sheet = %sheet.name,
        columns = sheet.headers.len(),
        rows = sheet.rows.len(),
        "decoded worksheet"
    );
    Ok(sheet)
}

/// First row is the header; every later non-blank row becomes a [`RawRow`]
fn decode_range(sheet_name: &str, range: &Range<Data>) -> DecodedSheet {
    let mut rows_iter = range.rows();

    let Some(header_row) = rows_iter.next() else {
        return DecodedSheet::new(sheet_name, Vec::new(), Vec::new());
    };
    let headers = header_names(header_row);

    let rows = rows_iter
        .filter_map(|cells| {
            let row: RawRow = headers
                .iter()
                .zip(cells.iter())
                .filter_map(|(name, cell)| cell_value(cell).map(|v| (name.clone(), v)))
                .collect();
            (!row.is_empty()).then_some(row)
        })
        .collect();

    DecodedSheet::new(sheet_name, headers, rows)
}

/// Render header cells, naming blanks `__EMPTY` and suffixing repeats `_1`, `_2`, ...
///
/// A suffix already used by another column is skipped, so every name is unique.
fn header_names(cells: &[Data]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(cells.len());

    for cell in cells {
        let base = match cell_value(cell) {
            Some(value) => value.to_string(),
            None => EMPTY_HEADER.to_string(),
        };

        let name = if taken.contains(&base) {
            let n = suffixes.entry(base.clone()).or_insert(0);
            loop {
                *n += 1;
                let candidate = format!("{}_{}", base, n);
                if !taken.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            base
        };

        taken.insert(name.clone());
        names.push(name);
    }

    names
}

/// Convert a calamine cell; `None` for empty cells
fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(e) => Some(CellValue::Text(e.to_string())),
    }
}
