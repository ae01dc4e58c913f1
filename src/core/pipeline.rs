//! End-to-end analysis of one decoded sheet

use crate::core::{aggregate_chart, chart_layout, filter_records, normalize};
use crate::types::{
    ChartDatum, ChartLayout, FilterCriteria, MaterialCatalog, Mode, NormalizedSheet, RawRow,
    WorkOrderRecord,
};
use serde::Serialize;

/// Everything the results view needs for one (sheet, mode, criteria) triple
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub mode: Mode,
    pub total_rows: usize,
    pub records: Vec<WorkOrderRecord>,
    pub catalog: MaterialCatalog,
    pub filtered: Vec<WorkOrderRecord>,
    pub chart: Vec<ChartDatum>,
    pub layout: ChartLayout,
}

impl Analysis {
    /// Filter, aggregate and lay out an already-normalized sheet
    pub fn from_normalized(
        mode: Mode,
        normalized: NormalizedSheet,
        criteria: &FilterCriteria,
    ) -> Self {
        let filtered = filter_records(&normalized.records, criteria);
        let chart = aggregate_chart(&filtered);
        let layout = chart_layout(chart.len());

        Self {
            mode,
            total_rows: normalized.records.len(),
            records: normalized.records,
            catalog: normalized.catalog,
            filtered,
            chart,
            layout,
        }
    }
}

/// `normalize → filter → aggregate → layout`
pub fn analyze(rows: &[RawRow], mode: Mode, criteria: &FilterCriteria) -> Analysis {
    Analysis::from_normalized(mode, normalize(rows, mode), criteria)
}
