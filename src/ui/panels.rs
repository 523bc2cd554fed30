use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use xcms_packager::data::loader::ACCEPTED_EXTENSIONS;
use xcms_packager::package::PACKAGE_MIME;
use xcms_packager::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – preset and processing parameters
// ---------------------------------------------------------------------------

/// Render the left parameter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Processing Parameters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Preset selector ----
            ui.strong("Instrument / chromatography preset");
            let current = state.parameters.preset.clone();
            let mut chosen = None;
            egui::ComboBox::from_id_salt("preset")
                .selected_text(&current)
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for preset in &state.config.presets {
                        if ui
                            .selectable_label(current == preset.preset, &preset.preset)
                            .clicked()
                        {
                            chosen = Some(preset.preset.clone());
                        }
                    }
                });
            if let Some(name) = chosen {
                state.select_preset(&name);
            }
            ui.separator();

            // ---- Field overrides ----
            let mut changed = false;
            egui::Grid::new("parameter_grid")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui: &mut Ui| {
                    let p = &mut state.parameters;

                    ui.label("ppm");
                    changed |= ui.add(DragValue::new(&mut p.ppm).speed(1)).changed();
                    ui.end_row();

                    ui.label("Peak width (min,max)");
                    changed |= ui
                        .add(egui::TextEdit::singleline(&mut p.peakwidth).desired_width(90.0))
                        .changed();
                    ui.end_row();

                    ui.label("Signal-to-noise threshold");
                    changed |= ui.add(DragValue::new(&mut p.snthresh).speed(1)).changed();
                    ui.end_row();

                    ui.label("Bandwidth (bw)");
                    changed |= ui.add(DragValue::new(&mut p.bw).speed(1)).changed();
                    ui.end_row();

                    ui.label("mzwid");
                    changed |= ui
                        .add(DragValue::new(&mut p.mzwid).speed(0.001).max_decimals(4))
                        .changed();
                    ui.end_row();

                    ui.label("minfrac");
                    changed |= ui
                        .add(
                            DragValue::new(&mut p.minfrac)
                                .speed(0.01)
                                .range(0.0..=1.0)
                                .max_decimals(3),
                        )
                        .changed();
                    ui.end_row();
                });
            if changed {
                state.inputs_changed();
            }

            // Flag bad values before the user hits the button.
            if let Err(e) = state.parameters.validate() {
                ui.label(RichText::new(e.to_string()).color(Color32::YELLOW));
            }

            ui.separator();

            // ---- Package actions ----
            ui.add_enabled_ui(!state.files.is_empty(), |ui: &mut Ui| {
                if ui.button("Create Upload Package").clicked() {
                    state.create_package();
                }
            });
            if state.files.is_empty() {
                ui.label("Add at least one file to create a package.");
            }

            if let Some(package) = &state.package {
                ui.label(format!(
                    "{} entries, {:.1} MB ({PACKAGE_MIME})",
                    package.entries().len(),
                    package.len() as f64 / 1_048_576.0
                ));
                if ui.button("Save Upload Package (ZIP)…").clicked() {
                    save_file_dialog(state);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Add files…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.files.is_empty(), egui::Button::new("Clear files"))
                .clicked()
            {
                state.clear_uploads();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        let total: usize = state.files.iter().map(|f| f.len()).sum();
        ui.label(format!(
            "{} files, {:.1} MB",
            state.files.len(),
            total as f64 / 1_048_576.0
        ));

        ui.separator();

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Add LC-MS files")
        .add_filter("LC-MS files (mzML / mzXML / NetCDF)", &ACCEPTED_EXTENSIONS)
        .add_filter("mzML", &["mzML"])
        .add_filter("mzXML", &["mzXML"])
        .add_filter("NetCDF", &["cdf", "CDF"])
        .pick_files();

    if let Some(paths) = files {
        let added = state.add_paths(&paths);
        log::info!("Added {added} of {} selected files", paths.len());
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save upload package")
        .set_file_name(&state.config.package_file_name)
        .add_filter("ZIP archive", &["zip"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.save_package(&path) {
            log::error!("Failed to save package: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
