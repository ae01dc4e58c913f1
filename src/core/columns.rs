//! Source column names per sheet mode

use crate::core::coerce::is_present;
use crate::types::{CellValue, Mode, RawRow};

/// Number of material/quantity column pairs inspected per row
pub const MATERIAL_SLOTS: usize = 10;

/// Candidate column names for one material slot, in priority order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotColumns {
    pub slot: usize,
    pub material: Vec<String>,
    pub quantity: Vec<String>,
}

/// Column resolution for one mode, built once per normalization pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnScheme {
    pub mode: Mode,
    pub order_column: &'static str,
    pub node_column: &'static str,
    pub slots: Vec<SlotColumns>,
}

impl ColumnScheme {
    pub fn for_mode(mode: Mode) -> Self {
        let (order_column, node_column) = match mode {
            Mode::Modernization => ("2.Nro de O.T.", "1.NODO DEL POSTE."),
            Mode::Maintenance => ("6.Nro.Orden Energis", "5.Nodo"),
        };

        let slots = (1..=MATERIAL_SLOTS)
            .map(|i| {
                let (material, quantity) = match mode {
                    Mode::Modernization => (
                        vec![format!("MATERIAL {}", i), format!("Material {}", i)],
                        vec![
                            format!("CANTIDAD MATERIAL {}", i),
                            format!("CANTIDAD DE MATERIAL {}", i),
                        ],
                    ),
                    // Maintenance sheets only honor the uppercase variants
                    Mode::Maintenance => (
                        vec![format!("MATERIAL {}", i)],
                        vec![format!("CANTIDAD MATERIAL {}", i)],
                    ),
                };
                SlotColumns {
                    slot: i,
                    material,
                    quantity,
                }
            })
            .collect();

        Self {
            mode,
            order_column,
            node_column,
            slots,
        }
    }
}

/// First candidate column holding a filled-in cell
pub fn first_present<'a>(row: &'a RawRow, candidates: &[String]) -> Option<&'a CellValue> {
    candidates
        .iter()
        .map(|name| row.get(name))
        .find(|cell| is_present(*cell))
        .flatten()
}
