//! Row normalizer: raw sheet rows → work-order records + material catalog

use crate::core::coerce::{normalize_material_name, to_identifier, to_quantity};
use crate::core::columns::{first_present, ColumnScheme};
use crate::types::{MaterialEntry, Mode, NormalizedSheet, RawRow, WorkOrderRecord};
use std::collections::BTreeSet;
use tracing::debug;

/// Row-local normalizer for one sheet mode
pub struct RowNormalizer {
    scheme: ColumnScheme,
}

impl RowNormalizer {
    pub fn new(mode: Mode) -> Self {
        Self {
            scheme: ColumnScheme::for_mode(mode),
        }
    }

    pub fn mode(&self) -> Mode {
        self.scheme.mode
    }

    /// Normalize every row, preserving input order
    pub fn normalize(&self, rows: &[RawRow]) -> NormalizedSheet {
        let mut names = BTreeSet::new();
        let records: Vec<WorkOrderRecord> = rows
            .iter()
            .map(|row| {
                let record = self.normalize_row(row);
                names.extend(record.materials.iter().map(|m| m.name.clone()));
                record
            })
            .collect();

        debug!(
            mode = %self.scheme.mode,
            rows = rows.len(),
            materials = names.len(),
            "normalized work-order sheet"
        );

        NormalizedSheet {
            records,
            catalog: names.into(),
        }
    }

    /// Normalize a single row. Never fails; blank identifiers become `""`.
    pub fn normalize_row(&self, row: &RawRow) -> WorkOrderRecord {
        let mut record = WorkOrderRecord::new(
            to_identifier(row.get(self.scheme.order_column)),
            to_identifier(row.get(self.scheme.node_column)),
        );

        for slot in &self.scheme.slots {
            let material = first_present(row, &slot.material);
            let quantity = first_present(row, &slot.quantity);

            // Both cells must be filled in; a missing quantity skips the slot
            let (Some(material), Some(quantity)) = (material, quantity) else {
                continue;
            };

            let name = normalize_material_name(material);
            if name.is_empty() {
                continue;
            }

            record.materials.push(MaterialEntry {
                name,
                quantity: to_quantity(Some(quantity)),
            });
        }

        record
    }
}

/// Normalize `rows` under `mode`
pub fn normalize(rows: &[RawRow], mode: Mode) -> NormalizedSheet {
    RowNormalizer::new(mode).normalize(rows)
}
