//! Total cell coercions. None of these fail: malformed input degrades to a default.

use crate::types::CellValue;

/// Whether a cell counts as filled in.
///
/// Absent cells, empty text, `0`, `NaN` and `false` are all treated as blank.
pub fn is_present(cell: Option<&CellValue>) -> bool {
    match cell {
        Some(CellValue::Text(s)) => !s.is_empty(),
        Some(CellValue::Number(n)) => *n != 0.0 && !n.is_nan(),
        Some(CellValue::Bool(b)) => *b,
        None => false,
    }
}

/// Identifier form of a cell; blank cells become `""`
pub fn to_identifier(cell: Option<&CellValue>) -> String {
    match cell {
        Some(value) if is_present(cell) => value.to_string(),
        _ => String::new(),
    }
}

/// Numeric quantity of a cell; anything unparseable becomes `0`
pub fn to_quantity(cell: Option<&CellValue>) -> f64 {
    let value = match cell {
        Some(CellValue::Number(n)) => *n,
        Some(CellValue::Text(s)) => parse_leading_number(s).unwrap_or(0.0),
        Some(CellValue::Bool(_)) | None => 0.0,
    };

    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Dedup/aggregation key for a material name cell
pub fn normalize_material_name(cell: &CellValue) -> String {
    cell.to_string().trim().to_uppercase()
}

/// Parse the longest decimal prefix of `text` ("12.5 und" → 12.5).
fn parse_leading_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
