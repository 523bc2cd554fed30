//! Upload package builder
//!
//! Bundles the session into a single ZIP archive laid out for XCMS Online:
//! - `manifest.csv` - one `filename,class,batch` row per file, upload order
//! - `xcms_parameters.txt` - preset name and processing parameters
//! - every uploaded file under its original name, byte-for-byte
//!
//! Entries carry a fixed timestamp, so identical inputs give identical bytes.

pub mod error;
pub mod manifest;

use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::data::model::{SampleSheet, UploadedFile};
use crate::data::params::ParameterSet;

pub use error::{PackageError, PackageResult};

/// Archive entry holding the sample manifest.
pub const MANIFEST_ENTRY: &str = "manifest.csv";

/// Archive entry holding the parameter summary.
pub const PARAMETERS_ENTRY: &str = "xcms_parameters.txt";

/// File name proposed when saving a package.
pub const PACKAGE_FILE_NAME: &str = "xcms_upload_package.zip";

/// Content type of a package.
pub const PACKAGE_MIME: &str = "application/zip";

// =============================================================================
// Package
// =============================================================================

/// A finished upload package held in memory
#[derive(Clone, PartialEq, Eq)]
pub struct Package {
    bytes: Vec<u8>,
    entries: Vec<String>,
}

impl Package {
    /// Complete ZIP archive bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Entry names in archive order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Archive size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the archive to `path`
    ///
    /// The bytes go to a uniquely named temporary file in the target
    /// directory and are renamed into place, so a failed save never leaves a
    /// truncated archive behind. The temporary file is removed on failure.
    pub fn save(&self, path: &Path) -> PackageResult<PathBuf> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(&self.bytes)?;
        temp.as_file().sync_all()?;
        // A failed persist hands the temp file back; dropping it deletes it.
        temp.persist(path).map_err(|e| e.error)?;

        log::info!("Saved package ({} bytes) to {}", self.bytes.len(), path.display());
        Ok(path.to_path_buf())
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("len", &self.bytes.len())
            .field("entries", &self.entries)
            .finish()
    }
}

// =============================================================================
// Build
// =============================================================================

/// Bundle files, parameters and sample metadata into one ZIP archive
///
/// # Errors
///
/// - `EmptyInput` when `files` is empty
/// - `DuplicateFilename` / `ReservedFilename` when entry names would collide
/// - `InvalidParameter` when `parameters` fails validation
/// - Archive or serialization failures
pub fn build_package(
    files: &[UploadedFile],
    parameters: &ParameterSet,
    metadata: &SampleSheet,
) -> PackageResult<Package> {
    check_files(files)?;
    parameters.validate()?;

    let manifest = manifest::manifest_csv(files, metadata)?;
    let summary = parameters.to_summary();

    let mut builder = ArchiveBuilder::new();
    builder.add_file(MANIFEST_ENTRY, &manifest)?;
    builder.add_file(PARAMETERS_ENTRY, summary.as_bytes())?;
    for file in files {
        builder.add_file(&file.name, &file.bytes)?;
    }
    let package = builder.finish()?;

    log::info!(
        "Built package: {} files, preset '{}', {} bytes",
        files.len(),
        parameters.preset,
        package.len()
    );
    Ok(package)
}

/// Reject inputs that cannot be laid out in the archive.
fn check_files(files: &[UploadedFile]) -> PackageResult<()> {
    if files.is_empty() {
        return Err(PackageError::EmptyInput);
    }

    let mut seen = HashSet::with_capacity(files.len());
    for file in files {
        if file.name == MANIFEST_ENTRY || file.name == PARAMETERS_ENTRY {
            return Err(PackageError::ReservedFilename(file.name.clone()));
        }
        if !seen.insert(file.name.as_str()) {
            return Err(PackageError::DuplicateFilename(file.name.clone()));
        }
    }
    Ok(())
}

/// In-memory ZIP writer with reproducible entry metadata.
struct ArchiveBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: Vec<String>,
}

impl ArchiveBuilder {
    fn new() -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            // Reproducible output: every entry is stamped with the ZIP epoch
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options,
            entries: Vec::new(),
        }
    }

    fn add_file(&mut self, name: &str, data: &[u8]) -> PackageResult<()> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(data)?;
        self.entries.push(name.to_string());
        Ok(())
    }

    fn finish(self) -> PackageResult<Package> {
        let cursor = self.zip.finish()?;
        Ok(Package {
            bytes: cursor.into_inner(),
            entries: self.entries,
        })
    }
}
