//! Excel exporter implementation - analysis → report workbook

use crate::core::Analysis;
use crate::error::{AnalyzerError, AnalyzerResult};
use rust_xlsxwriter::{Chart, ChartType, Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

const ORDERS_SHEET: &str = "Ordenes";
const MATERIALS_SHEET: &str = "Materiales";
const CATALOG_SHEET: &str = "Catalogo";

fn export_err(context: &'static str) -> impl Fn(XlsxError) -> AnalyzerError {
    move |e| AnalyzerError::Export(format!("{}: {}", context, e))
}

/// Writes the filtered orders, chart totals and material catalog of an
/// [`Analysis`] to an .xlsx report
pub struct ReportExporter<'a> {
    analysis: &'a Analysis,
}

impl<'a> ReportExporter<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        Self { analysis }
    }

    /// Export the report to a file
    pub fn export(&self, output_path: &Path) -> AnalyzerResult<()> {
        let mut workbook = self.build()?;
        workbook
            .save(output_path)
            .map_err(export_err("Failed to save Excel file"))
    }

    /// Export the report to memory
    pub fn to_bytes(&self) -> AnalyzerResult<Vec<u8>> {
        let mut workbook = self.build()?;
        workbook
            .save_to_buffer()
            .map_err(export_err("Failed to create Excel file"))
    }

    fn build(&self) -> AnalyzerResult<Workbook> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        self.write_orders(workbook.add_worksheet(), &header)?;
        self.write_materials(workbook.add_worksheet(), &header)?;
        self.write_catalog(workbook.add_worksheet(), &header)?;

        Ok(workbook)
    }

    /// One row per filtered order: OT, node, "NAME (qty)" list, total
    fn write_orders(&self, worksheet: &mut Worksheet, header: &Format) -> AnalyzerResult<()> {
        worksheet
            .set_name(ORDERS_SHEET)
            .map_err(export_err("Failed to set worksheet name"))?;

        for (col, title) in ["OT", "Nodo", "Materiales", "Cantidad Total"].iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *title, header)
                .map_err(export_err("Failed to write header"))?;
        }

        for (idx, record) in self.analysis.filtered.iter().enumerate() {
            let row = (idx + 1) as u32;
            let materials = record
                .materials
                .iter()
                .map(|m| format!("{} ({})", m.name, m.quantity))
                .collect::<Vec<_>>()
                .join(", ");

            worksheet
                .write_string(row, 0, &record.order_id)
                .map_err(export_err("Failed to write order"))?;
            worksheet
                .write_string(row, 1, &record.node_id)
                .map_err(export_err("Failed to write node"))?;
            worksheet
                .write_string(row, 2, &materials)
                .map_err(export_err("Failed to write materials"))?;
            worksheet
                .write_number(row, 3, record.total_quantity())
                .map_err(export_err("Failed to write total"))?;
        }

        worksheet
            .set_column_width(2, 60)
            .map_err(export_err("Failed to set column width"))?;
        Ok(())
    }

    /// Aggregated chart data plus a native column chart over it
    fn write_materials(&self, worksheet: &mut Worksheet, header: &Format) -> AnalyzerResult<()> {
        worksheet
            .set_name(MATERIALS_SHEET)
            .map_err(export_err("Failed to set worksheet name"))?;
        worksheet
            .write_string_with_format(0, 0, "Material", header)
            .map_err(export_err("Failed to write header"))?;
        worksheet
            .write_string_with_format(0, 1, "Cantidad", header)
            .map_err(export_err("Failed to write header"))?;

        for (idx, datum) in self.analysis.chart.iter().enumerate() {
            let row = (idx + 1) as u32;
            worksheet
                .write_string(row, 0, &datum.name)
                .map_err(export_err("Failed to write material"))?;
            worksheet
                .write_number(row, 1, datum.quantity)
                .map_err(export_err("Failed to write quantity"))?;
        }

        if self.analysis.chart.is_empty() {
            return Ok(());
        }

        let last_row = self.analysis.chart.len() as u32;
        let mut chart = Chart::new(ChartType::Column);
        chart
            .add_series()
            .set_name("Cantidad")
            .set_categories((MATERIALS_SHEET, 1, 0, last_row, 0))
            .set_values((MATERIALS_SHEET, 1, 1, last_row, 1));
        chart
            .set_width(self.analysis.layout.width)
            .set_height(self.analysis.layout.height);

        worksheet
            .insert_chart(1, 3, &chart)
            .map_err(export_err("Failed to insert chart"))?;
        Ok(())
    }

    fn write_catalog(&self, worksheet: &mut Worksheet, header: &Format) -> AnalyzerResult<()> {
        worksheet
            .set_name(CATALOG_SHEET)
            .map_err(export_err("Failed to set worksheet name"))?;
        worksheet
            .write_string_with_format(0, 0, "Material", header)
            .map_err(export_err("Failed to write header"))?;

        for (idx, name) in self.analysis.catalog.iter().enumerate() {
            worksheet
                .write_string((idx + 1) as u32, 0, name)
                .map_err(export_err("Failed to write catalog entry"))?;
        }
        Ok(())
    }
}
