use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::UploadedFile;

// ---------------------------------------------------------------------------
// Accepted file types
// ---------------------------------------------------------------------------

/// Extensions offered in the file dialog.
///
/// Matching is case-insensitive and purely by extension; file contents are
/// never inspected.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["mzML", "mzXML", "cdf", "CDF"];

/// Whether `name` carries one of the [`ACCEPTED_EXTENSIONS`].
pub fn is_accepted(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a raw instrument file from disk.
///
/// The file name (final path component) becomes the archive entry name.
pub fn load_upload(path: &Path) -> Result<UploadedFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?;

    if !is_accepted(name) {
        bail!(
            "Unsupported file type: {name} (expected {})",
            ACCEPTED_EXTENSIONS.join(", ")
        );
    }

    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    log::debug!("Read {name} ({} bytes)", bytes.len());

    Ok(UploadedFile::new(name, bytes))
}

/// Build an upload from an in-memory payload (e.g. a file dropped on the
/// window without a backing path).
pub fn upload_from_bytes(name: &str, bytes: impl Into<std::sync::Arc<[u8]>>) -> Result<UploadedFile> {
    // Dropped payloads may carry a full path as their name.
    let name = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .context("dropped file has no name")?;

    if !is_accepted(name) {
        bail!(
            "Unsupported file type: {name} (expected {})",
            ACCEPTED_EXTENSIONS.join(", ")
        );
    }

    Ok(UploadedFile::new(name, bytes))
}
