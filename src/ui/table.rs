use eframe::egui::{Align, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{CellValue, Dataset};

const HEADER_HEIGHT: f32 = 22.0;
const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Sheet table (central panel)
// ---------------------------------------------------------------------------

/// Render `dataset` as a table; an empty dataset shows a notice instead.
pub fn data_table(ui: &mut Ui, dataset: &Dataset) {
    if dataset.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data available");
        });
        return;
    }

    let columns = dataset.columns();

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(60.0).clip(true), columns.len())
            .header(HEADER_HEIGHT, |mut header| {
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, dataset.len(), |mut row| {
                    let record = &dataset.rows()[row.index()];
                    for col in columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell_text(record.get(col)));
                        });
                    }
                });
            });
    });
}

/// Null and missing cells get a dimmed italic `NULL` so they never look
/// like empty strings.
fn cell_text(value: Option<&CellValue>) -> RichText {
    match value {
        None | Some(CellValue::Null) => RichText::new(cell_label(value)).italics().weak(),
        Some(_) => RichText::new(cell_label(value)),
    }
}

fn cell_label(value: Option<&CellValue>) -> String {
    value.unwrap_or(&CellValue::Null).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_cells_share_the_marker() {
        assert_eq!(cell_label(None), "NULL");
        assert_eq!(cell_label(Some(&CellValue::Null)), "NULL");
        assert_eq!(cell_label(Some(&CellValue::String(String::new()))), "");
        assert_eq!(cell_label(Some(&CellValue::Integer(3))), "3");
    }
}
