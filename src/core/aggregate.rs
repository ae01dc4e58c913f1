//! Chart aggregation: material quantities summed across records

use crate::types::{ChartDatum, WorkOrderRecord};
use std::collections::HashMap;

/// Sum quantities per material name.
///
/// Bars come out in order of first appearance, not sorted.
pub fn aggregate_chart(records: &[WorkOrderRecord]) -> Vec<ChartDatum> {
    let mut chart: Vec<ChartDatum> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for material in records.iter().flat_map(|r| r.materials.iter()) {
        match index.get(material.name.as_str()) {
            Some(&pos) => chart[pos].quantity += material.quantity,
            None => {
                index.insert(material.name.as_str(), chart.len());
                chart.push(ChartDatum::new(material.name.clone(), material.quantity));
            }
        }
    }

    chart
}
