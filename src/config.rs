use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::data::model::{DEFAULT_BATCH, DEFAULT_CLASS, SampleMetadata};
use crate::data::params::ParameterSet;
use crate::package::PACKAGE_FILE_NAME;

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_ENV: &str = "XCMS_PACKAGER_CONFIG";

// ---------------------------------------------------------------------------
// On-disk layout
// ---------------------------------------------------------------------------

/// Expected JSON schema (every key optional):
///
/// ```json
/// {
///   "presets": [
///     { "name": "Lab QTOF", "ppm": 10, "peakwidth": "8,45", "snthresh": 8,
///       "bw": 8, "mzwid": 0.02, "minfrac": 0.5 }
///   ],
///   "default_preset": "Lab QTOF",
///   "default_class": "Group1",
///   "default_batch": "1",
///   "package_file_name": "xcms_upload_package.zip"
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    presets: Vec<ParameterSet>,
    default_preset: Option<String>,
    default_class: Option<String>,
    default_batch: Option<String>,
    package_file_name: Option<String>,
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Resolved configuration: built-in presets plus any custom ones.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Built-ins first, then custom presets in file order.
    pub presets: Vec<ParameterSet>,
    /// Index into `presets` selected at start-up.
    pub default_preset: usize,
    /// Metadata seeded for each newly added file.
    pub default_metadata: SampleMetadata,
    /// File name proposed by the save dialog.
    pub package_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            presets: ParameterSet::builtin_presets(),
            default_preset: 0,
            default_metadata: SampleMetadata::new(DEFAULT_CLASS, DEFAULT_BATCH),
            package_file_name: PACKAGE_FILE_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the file named by [`CONFIG_ENV`], falling back to the
    /// built-in defaults when unset or broken.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::load(Path::new(&path)) {
            Ok(config) => {
                log::info!(
                    "Loaded configuration from {} ({} presets)",
                    Path::new(&path).display(),
                    config.presets.len()
                );
                config
            }
            Err(e) => {
                log::error!("Ignoring configuration: {e:#}");
                Self::default()
            }
        }
    }

    /// Read and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in config {}", path.display()))
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(text).context("parsing JSON")?;
        let mut config = Self::default();

        let mut names: BTreeSet<String> =
            config.presets.iter().map(|p| p.preset.clone()).collect();
        for preset in file.presets {
            if preset.preset.trim().is_empty() {
                bail!("Preset names must not be empty");
            }
            if !names.insert(preset.preset.clone()) {
                bail!("Duplicate preset name: {}", preset.preset);
            }
            preset
                .validate()
                .with_context(|| format!("preset '{}'", preset.preset))?;
            config.presets.push(preset);
        }

        if let Some(name) = file.default_preset {
            config.default_preset = config
                .presets
                .iter()
                .position(|p| p.preset == name)
                .with_context(|| format!("Unknown default preset: {name}"))?;
        }
        if let Some(class) = file.default_class {
            config.default_metadata.class = class;
        }
        if let Some(batch) = file.default_batch {
            config.default_metadata.batch = batch;
        }
        if let Some(name) = file.package_file_name {
            if !name.ends_with(".zip") || name.contains(['/', '\\']) {
                bail!("package_file_name must be a plain file name ending in .zip, got {name}");
            }
            config.package_file_name = name;
        }

        Ok(config)
    }

    /// The preset selected at start-up.
    pub fn initial_parameters(&self) -> ParameterSet {
        self.presets
            .get(self.default_preset)
            .cloned()
            .unwrap_or_default()
    }

    pub fn preset(&self, name: &str) -> Option<&ParameterSet> {
        self.presets.iter().find(|p| p.preset == name)
    }
}
