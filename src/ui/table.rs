use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use xcms_packager::state::AppState;

// ---------------------------------------------------------------------------
// Sample metadata table (central panel)
// ---------------------------------------------------------------------------

/// Render one editable row per uploaded file: name, size, class, batch.
pub fn metadata_table(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sample Metadata");
    ui.separator();

    if state.files.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Add LC-MS files  (File → Add files…, or drop them here)");
        });
        return;
    }

    legend(ui, state);
    ui.add_space(4.0);

    // Snapshot names so the sheet can be edited while iterating.
    let rows: Vec<(String, usize)> = state
        .files
        .iter()
        .map(|f| (f.name.clone(), f.len()))
        .collect();

    let mut changed = false;
    let mut remove = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(200.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::initial(160.0).at_least(80.0))
        .column(Column::initial(80.0).at_least(40.0))
        .column(Column::remainder())
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("filename");
            });
            header.col(|ui| {
                ui.strong("size");
            });
            header.col(|ui| {
                ui.strong("class");
            });
            header.col(|ui| {
                ui.strong("batch");
            });
            header.col(|_ui| {});
        })
        .body(|mut body| {
            for (idx, (name, len)) in rows.iter().enumerate() {
                let color = state
                    .sheet
                    .get(name)
                    .map(|m| state.color_map.color_for(&m.class))
                    .unwrap_or(Color32::GRAY);

                body.row(24.0, |mut row| {
                    row.col(|ui| {
                        ui.label(name);
                    });
                    row.col(|ui| {
                        ui.label(format_size(*len));
                    });
                    row.col(|ui| {
                        let meta = state.metadata_mut(name);
                        let edit = egui::TextEdit::singleline(&mut meta.class)
                            .id_salt(("class", idx))
                            .text_color(color);
                        changed |= ui.add(edit).changed();
                    });
                    row.col(|ui| {
                        let meta = state.metadata_mut(name);
                        let edit = egui::TextEdit::singleline(&mut meta.batch)
                            .id_salt(("batch", idx))
                            .desired_width(60.0);
                        changed |= ui.add(edit).changed();
                    });
                    row.col(|ui| {
                        if ui.small_button("Remove").clicked() {
                            remove = Some(idx);
                        }
                    });
                });
            }
        });

    if let Some(idx) = remove {
        state.remove_upload(idx);
    } else if changed {
        state.inputs_changed();
    }
}

/// Class colour legend above the table.
fn legend(ui: &mut Ui, state: &AppState) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("Classes:");
        for (class, color) in state.color_map.legend_entries() {
            ui.label(RichText::new(format!("■ {class}")).color(color));
        }
    });
}

fn format_size(len: usize) -> String {
    const KB: f64 = 1024.0;
    let len = len as f64;
    if len < KB {
        format!("{len} B")
    } else if len < KB * KB {
        format!("{:.1} KB", len / KB)
    } else {
        format!("{:.1} MB", len / (KB * KB))
    }
}
