use eframe::egui::{self, Align2, Color32, RichText, ScrollArea, Ui};

use crate::data::export::ExportFormat;
use crate::data::filter::{Operation, OperationType};
use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – filter form
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter");
    ui.separator();

    let form = &mut state.filter_form;

    ui.label("Primary column");
    ui.add(egui::TextEdit::singleline(&mut form.primary_column).hint_text("e.g. ID"));

    ui.label("Operation columns");
    ui.add(
        egui::TextEdit::singleline(&mut form.operation_columns).hint_text("e.g. EMAIL, PHONE"),
    );

    ui.horizontal(|ui: &mut Ui| {
        egui::ComboBox::from_id_salt("operation_type")
            .selected_text(form.operation_type.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for ty in [OperationType::And, OperationType::Or] {
                    ui.selectable_value(&mut form.operation_type, ty, ty.to_string());
                }
            });
        egui::ComboBox::from_id_salt("operation")
            .selected_text(form.operation.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for op in [Operation::Null, Operation::NotNull] {
                    ui.selectable_value(&mut form.operation, op, op.to_string());
                }
            });
    });

    ui.add_space(4.0);
    if ui.button("Apply").clicked() {
        state.apply_filter();
    }

    ui.separator();
    column_list(ui, state);
}

/// Columns of the original dataset with their null counts.
/// Clicking a name fills the form.
fn column_list(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Columns");

    let original = state.store.original();
    if original.columns().is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    let entries: Vec<(String, usize)> = original
        .columns()
        .iter()
        .map(|col| (col.clone(), original.null_count(col)))
        .collect();
    let total = original.len();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (col, nulls) in &entries {
                ui.horizontal(|ui: &mut Ui| {
                    if ui
                        .small_button("P")
                        .on_hover_text("Use as primary column")
                        .clicked()
                    {
                        state.filter_form.primary_column = col.clone();
                    }
                    if ui
                        .small_button("+")
                        .on_hover_text("Add to operation columns")
                        .clicked()
                    {
                        add_operation_column(&mut state.filter_form.operation_columns, col);
                    }
                    ui.label(format!("{col}  ({nulls}/{total} null)"));
                });
            }
        });
}

fn add_operation_column(input: &mut String, column: &str) {
    if input.trim().is_empty() {
        *input = column.to_string();
    } else {
        input.push_str(", ");
        input.push_str(column);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export…").clicked() {
                state.export_form.open = true;
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading() {
            ui.spinner();
        } else if let Some(source) = &state.source {
            ui.label(format!(
                "{}: {} rows loaded, {} visible",
                source.display(),
                state.store.original().len(),
                state.store.filtered().len()
            ));
        }

        match &state.status {
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            Some(Status::Info(msg)) => {
                ui.label(msg);
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// Dialogs
// ---------------------------------------------------------------------------

/// Export dialog: filename and format, written on confirm.
pub fn export_window(ctx: &egui::Context, state: &mut AppState) {
    if !state.export_form.open {
        return;
    }

    let mut open = true;
    let mut confirmed = false;
    let mut cancelled = false;

    egui::Window::new("Download")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            let form = &mut state.export_form;
            ui.label("Filename");
            ui.add(
                egui::TextEdit::singleline(&mut form.filename)
                    .hint_text(state.config.default_filename.as_str()),
            );
            ui.horizontal(|ui: &mut Ui| {
                for format in [ExportFormat::Xlsx, ExportFormat::Csv] {
                    ui.radio_value(&mut form.format, format, format.to_string());
                }
            });
            ui.label(format!("{} rows will be written.", state.store.filtered().len()));
            ui.horizontal(|ui: &mut Ui| {
                confirmed = ui.button("Download").clicked();
                cancelled = ui.button("Cancel").clicked();
            });
        });

    if confirmed {
        state.export();
    } else if cancelled || !open {
        state.export_form.open = false;
    }
}

/// Blocking alert for rejected filter input; input behind it is ignored
/// until dismissed.
pub fn alert_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = state.alert.clone() else {
        return;
    };

    let response = egui::Modal::new(egui::Id::new("invalid_filter")).show(ctx, |ui: &mut Ui| {
        ui.heading("Invalid filter");
        ui.label(message);
        ui.button("OK").clicked()
    });

    if response.inner || response.should_close() {
        state.alert = None;
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open spreadsheet")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Excel", &["xlsx", "xlsm", "xlsb", "xls"])
        .add_filter("OpenDocument", &["ods"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.begin_load(path);
    }
}
