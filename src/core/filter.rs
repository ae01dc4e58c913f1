//! Record filtering for the results table

use crate::types::{FilterCriteria, WorkOrderRecord};

/// Maximum number of records shown after filtering
pub const DISPLAY_LIMIT: usize = 10;

impl FilterCriteria {
    /// Node, order and material predicates must all hold.
    ///
    /// Substring matching is case-sensitive; an empty substring or an empty
    /// material selection matches everything.
    pub fn matches(&self, record: &WorkOrderRecord) -> bool {
        record.node_id.contains(self.node_substring.as_str())
            && record.order_id.contains(self.order_substring.as_str())
            && (self.selected_materials.is_empty()
                || record.has_material_in(&self.selected_materials))
    }
}

/// Records passing `criteria`, in input order, capped at [`DISPLAY_LIMIT`]
pub fn filter_records(
    records: &[WorkOrderRecord],
    criteria: &FilterCriteria,
) -> Vec<WorkOrderRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .take(DISPLAY_LIMIT)
        .cloned()
        .collect()
}
