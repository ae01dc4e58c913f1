use crate::error::AnalyzerError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

//==============================================================================
// Sheet Mode
//==============================================================================

/// Column-naming convention of a work-order sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Pole modernization orders ("2.Nro de O.T.", "1.NODO DEL POSTE.")
    #[default]
    #[serde(rename = "modernizacion", alias = "modernization")]
    Modernization,
    /// Maintenance orders ("6.Nro.Orden Energis", "5.Nodo")
    #[serde(rename = "mantenimiento", alias = "maintenance")]
    Maintenance,
}

impl Mode {
    /// Wire value sent as `tipo_archivo` to the processing endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Modernization => "modernizacion",
            Mode::Maintenance => "mantenimiento",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Modernization => "Modernización",
            Mode::Maintenance => "Mantenimiento",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "modernizacion" | "modernización" | "modernization" => Ok(Mode::Modernization),
            "mantenimiento" | "maintenance" => Ok(Mode::Maintenance),
            other => Err(AnalyzerError::Validation(format!(
                "Unknown mode '{}' (expected 'modernizacion' or 'mantenimiento')",
                other
            ))),
        }
    }
}

//==============================================================================
// Decoded Sheet (input side)
//==============================================================================

/// A primitive spreadsheet cell value. Empty cells are not represented;
/// they are simply absent from the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Bool(b) => write!(f, "{}", b),
            // Float Display already drops the ".0" of integral values
            CellValue::Number(n) if *n == 0.0 => f.write_str("0"),
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// One decoded data row: column name → cell value
pub type RawRow = HashMap<String, CellValue>;

/// First worksheet of an uploaded workbook, header row resolved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedSheet {
    pub name: String,
    /// Column names in sheet order
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Columns hidden from the preview table
const HIDDEN_PREVIEW_COLUMNS: [&str; 2] = ["A", "0"];

/// Display-ready slice of a sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl DecodedSheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header plus the first `limit` rows, rendered as strings
    pub fn preview(&self, limit: usize) -> SheetPreview {
        let headers: Vec<String> = self
            .headers
            .iter()
            .filter(|h| !HIDDEN_PREVIEW_COLUMNS.contains(&h.as_str()))
            .cloned()
            .collect();

        let rows = self
            .rows
            .iter()
            .take(limit)
            .map(|row| {
                headers
                    .iter()
                    .map(|h| row.get(h).map(|c| c.to_string()).unwrap_or_default())
                    .collect()
            })
            .collect();

        SheetPreview {
            headers,
            rows,
            total_rows: self.rows.len(),
        }
    }
}

//==============================================================================
// Normalized Work Orders (output side)
//==============================================================================

/// One material/quantity pair taken from a row slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    /// Uppercased, trimmed material name
    pub name: String,
    pub quantity: f64,
}

impl MaterialEntry {
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Normalized form of one sheet row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderRecord {
    pub order_id: String,
    pub node_id: String,
    /// Slot-scan order (slot 1..10)
    pub materials: Vec<MaterialEntry>,
}

impl WorkOrderRecord {
    pub fn new(order_id: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            node_id: node_id.into(),
            materials: Vec::new(),
        }
    }

    pub fn with_material(mut self, name: impl Into<String>, quantity: f64) -> Self {
        self.materials.push(MaterialEntry::new(name, quantity));
        self
    }

    /// Sum of all material quantities on this order
    pub fn total_quantity(&self) -> f64 {
        self.materials.iter().map(|m| m.quantity).sum()
    }

    pub fn has_material_in(&self, names: &BTreeSet<String>) -> bool {
        self.materials.iter().any(|m| names.contains(&m.name))
    }
}

/// Sorted, deduplicated material names seen in a sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialCatalog(Vec<String>);

impl MaterialCatalog {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl From<BTreeSet<String>> for MaterialCatalog {
    fn from(names: BTreeSet<String>) -> Self {
        MaterialCatalog(names.into_iter().collect())
    }
}

impl FromIterator<String> for MaterialCatalog {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        iter.into_iter().collect::<BTreeSet<_>>().into()
    }
}

/// Result of one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSheet {
    pub records: Vec<WorkOrderRecord>,
    pub catalog: MaterialCatalog,
}

//==============================================================================
// Filtering & Charting
//==============================================================================

/// Transient filter state supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub node_substring: String,
    #[serde(default)]
    pub order_substring: String,
    #[serde(default)]
    pub selected_materials: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, substring: impl Into<String>) -> Self {
        self.node_substring = substring.into();
        self
    }

    pub fn order(mut self, substring: impl Into<String>) -> Self {
        self.order_substring = substring.into();
        self
    }

    pub fn material(mut self, name: impl Into<String>) -> Self {
        self.selected_materials.insert(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.node_substring.is_empty()
            && self.order_substring.is_empty()
            && self.selected_materials.is_empty()
    }
}

/// One bar of the material chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDatum {
    pub name: String,
    pub quantity: f64,
}

impl ChartDatum {
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartMargin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLayout {
    /// Label rotation in degrees
    pub angle: i32,
    pub dx: i32,
    pub dy: i32,
    pub height: u32,
    pub tick_font_size: u32,
}

/// Presentation parameters for the material bar chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub margin: ChartMargin,
    pub x_axis: AxisLayout,
    pub legend_padding_top: u32,
    pub bar_size: f64,
}
