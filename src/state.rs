use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::model::{SampleMetadata, SampleSheet, UploadedFile};
use crate::data::params::ParameterSet;
use crate::package::{Package, build_package};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Presets, defaults and output name.
    pub config: AppConfig,

    /// Added files in upload order.
    pub files: Vec<UploadedFile>,

    /// Class / batch per file, keyed by file name.
    pub sheet: SampleSheet,

    /// Current parameters: the selected preset plus any field overrides.
    pub parameters: ParameterSet,

    /// Colours for the class column (rebuilt on metadata change).
    pub color_map: ColorMap,

    /// Last package built, cleared whenever the inputs change.
    pub package: Option<Package>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let parameters = config.initial_parameters();
        Self {
            config,
            files: Vec::new(),
            sheet: SampleSheet::new(),
            parameters,
            color_map: ColorMap::default(),
            package: None,
            status_message: None,
        }
    }

    /// Add a file to the session, seeding its metadata with the defaults.
    ///
    /// A file whose name is already present is refused; it would collide
    /// with the existing entry in the archive.
    pub fn add_upload(&mut self, file: UploadedFile) -> bool {
        if self.files.iter().any(|f| f.name == file.name) {
            log::warn!("Refusing duplicate upload {}", file.name);
            self.status_message = Some(format!("{} is already in the package.", file.name));
            return false;
        }

        log::info!("Added {} ({} bytes)", file.name, file.len());
        self.sheet
            .entry_or(&file.name, self.config.default_metadata.clone());
        self.files.push(file);
        self.inputs_changed();
        true
    }

    /// Read files from disk and add them. Failures are reported in the
    /// status line; the remaining files are still added.
    pub fn add_paths(&mut self, paths: &[PathBuf]) -> usize {
        let mut added = 0;
        let mut failures = Vec::new();
        for path in paths {
            match crate::data::loader::load_upload(path) {
                Ok(file) => {
                    if self.add_upload(file) {
                        added += 1;
                    }
                }
                Err(e) => {
                    log::error!("Failed to add file: {e:#}");
                    failures.push(format!("{e:#}"));
                }
            }
        }
        if !failures.is_empty() {
            self.status_message = Some(format!("Error: {}", failures.join("; ")));
        } else if added > 0 && added == paths.len() {
            self.status_message = Some(format!("Added {added} file(s)."));
        }
        added
    }

    /// Remove the file at `index` together with its metadata.
    pub fn remove_upload(&mut self, index: usize) {
        if index >= self.files.len() {
            return;
        }
        let file = self.files.remove(index);
        self.sheet.remove(&file.name);
        log::info!("Removed {}", file.name);
        self.inputs_changed();
    }

    /// Drop every file and its metadata.
    pub fn clear_uploads(&mut self) {
        self.files.clear();
        self.sheet.clear();
        self.inputs_changed();
    }

    /// Select a preset by name, replacing all six fields with its defaults.
    pub fn select_preset(&mut self, name: &str) {
        match self.config.preset(name) {
            Some(preset) => {
                self.parameters.reset_to(preset);
                self.inputs_changed();
            }
            None => log::warn!("Unknown preset {name}"),
        }
    }

    /// Metadata for the file named `filename`, created with defaults if absent.
    pub fn metadata_mut(&mut self, filename: &str) -> &mut SampleMetadata {
        self.sheet
            .entry_or(filename, self.config.default_metadata.clone())
    }

    /// Invalidate the last package and refresh derived state. Call after
    /// editing `parameters` or sheet fields directly.
    pub fn inputs_changed(&mut self) {
        // The "Package ready" status no longer describes anything.
        if self.package.take().is_some() {
            self.status_message = None;
        }
        self.color_map = ColorMap::new(
            self.files
                .iter()
                .filter_map(|f| self.sheet.get(&f.name))
                .map(|m| m.class.as_str()),
        );
    }

    /// Build the package from the current inputs.
    ///
    /// Errors end up in the status line, never as a panic.
    pub fn create_package(&mut self) -> Option<&Package> {
        match build_package(&self.files, &self.parameters, &self.sheet) {
            Ok(package) => {
                self.status_message = Some(format!(
                    "Package ready: {} files, {} bytes.",
                    self.files.len(),
                    package.len()
                ));
                self.package = Some(package);
            }
            Err(e) => {
                if e.is_user_error() {
                    log::warn!("Package not created: {e}");
                } else {
                    log::error!("Failed to build package: {e}");
                }
                self.status_message = Some(format!("Error: {e}"));
                self.package = None;
            }
        }
        self.package.as_ref()
    }

    /// Save the last built package to `path`.
    pub fn save_package(&mut self, path: &Path) -> Result<PathBuf> {
        let package = self
            .package
            .as_ref()
            .context("No package to save; create one first")?;
        let saved = package
            .save(path)
            .with_context(|| format!("saving package to {}", path.display()))?;
        self.status_message = Some(format!("Saved {}", saved.display()));
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageError;

    fn upload(name: &str) -> UploadedFile {
        UploadedFile::new(name, name.as_bytes().to_vec())
    }

    #[test]
    fn test_add_seeds_metadata() {
        let mut state = AppState::default();
        assert!(state.add_upload(upload("a.mzML")));
        assert_eq!(state.sheet.get("a.mzML"), Some(&SampleMetadata::default()));
        assert_eq!(state.color_map.len(), 1);
    }

    #[test]
    fn test_duplicate_upload_refused() {
        let mut state = AppState::default();
        assert!(state.add_upload(upload("a.mzML")));
        assert!(!state.add_upload(upload("a.mzML")));
        assert_eq!(state.files.len(), 1);
        assert!(state.status_message.as_deref().unwrap().contains("already"));
    }

    #[test]
    fn test_create_without_files_reports_error() {
        let mut state = AppState::default();
        assert!(state.create_package().is_none());
        assert_eq!(
            state.status_message.as_deref(),
            Some(format!("Error: {}", PackageError::EmptyInput).as_str())
        );
    }

    #[test]
    fn test_select_preset_discards_overrides() {
        let mut state = AppState::default();
        state.parameters.ppm = 42;
        state.select_preset("HILIC-QTOF (default)");
        assert_eq!(state.parameters.ppm, 15);
        assert_eq!(state.parameters.peakwidth, "10,60");

        state.select_preset("missing");
        assert_eq!(state.parameters.preset, "HILIC-QTOF (default)");
    }

    #[test]
    fn test_edit_invalidates_package() {
        let mut state = AppState::default();
        state.add_upload(upload("a.mzML"));
        assert!(state.create_package().is_some());

        state.metadata_mut("a.mzML").class = "QC".to_string();
        state.inputs_changed();
        assert!(state.package.is_none());
        assert_eq!(state.color_map.color_for("QC"), state.color_map.legend_entries()[0].1);
    }

    #[test]
    fn test_edit_clears_package_ready_status() {
        let mut state = AppState::default();
        state.add_upload(upload("a.mzML"));
        state.create_package();
        assert!(state.status_message.as_deref().unwrap().starts_with("Package ready"));

        state.parameters.ppm = 9;
        state.inputs_changed();
        assert!(state.package.is_none());
        assert!(state.status_message.is_none());

        // Error messages survive edits when no package was built.
        state.parameters.peakwidth = "wide".to_string();
        state.create_package();
        state.inputs_changed();
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }

    #[test]
    fn test_add_paths_success_replaces_old_error() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("S2.mzML");
        std::fs::write(&good, b"data").unwrap();

        let mut state = AppState::default();
        state.status_message = Some("Error: earlier failure".to_string());
        assert_eq!(state.add_paths(&[good]), 1);
        assert_eq!(state.status_message.as_deref(), Some("Added 1 file(s)."));
    }

    #[test]
    fn test_remove_upload_drops_metadata() {
        let mut state = AppState::default();
        state.add_upload(upload("a.mzML"));
        state.add_upload(upload("b.mzML"));
        state.remove_upload(0);
        state.remove_upload(5);

        assert_eq!(state.files.len(), 1);
        assert_eq!(state.files[0].name, "b.mzML");
        assert!(state.sheet.get("a.mzML").is_none());
    }

    #[test]
    fn test_add_paths_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("S1.mzXML");
        let bad = dir.path().join("notes.txt");
        std::fs::write(&good, b"data").unwrap();
        std::fs::write(&bad, b"data").unwrap();

        let mut state = AppState::default();
        assert_eq!(state.add_paths(&[good, bad]), 1);
        assert!(state.status_message.as_deref().unwrap().contains("notes.txt"));
    }

    #[test]
    fn test_save_requires_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pkg.zip");

        let mut state = AppState::default();
        assert!(state.save_package(&path).is_err());

        state.add_upload(upload("a.mzML"));
        state.create_package();
        assert_eq!(state.save_package(&path).unwrap(), path);
        assert!(path.exists());
    }
}
