use eframe::egui;

use xcms_packager::config::AppConfig;
use xcms_packager::data::loader::upload_from_bytes;
use xcms_packager::state::AppState;

use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PackagerApp {
    pub state: AppState,
}

impl PackagerApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }

    /// Add any files dropped onto the window this frame.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }

        let mut paths = Vec::new();
        for file in dropped {
            if let Some(path) = file.path {
                paths.push(path);
            } else if let Some(bytes) = file.bytes {
                match upload_from_bytes(&file.name, bytes) {
                    Ok(upload) => {
                        self.state.add_upload(upload);
                    }
                    Err(e) => {
                        log::error!("Failed to add dropped file: {e:#}");
                        self.state.status_message = Some(format!("Error: {e:#}"));
                    }
                }
            }
        }
        if !paths.is_empty() {
            self.state.add_paths(&paths);
        }
    }
}

impl eframe::App for PackagerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: preset and parameters ----
        egui::SidePanel::left("parameter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: sample metadata ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::metadata_table(ui, &mut self.state);
        });
    }
}
