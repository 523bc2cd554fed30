use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Default sample class for a freshly added file.
pub const DEFAULT_CLASS: &str = "Group1";

/// Default batch label for a freshly added file.
pub const DEFAULT_BATCH: &str = "1";

// ---------------------------------------------------------------------------
// UploadedFile – one raw instrument file held in memory
// ---------------------------------------------------------------------------

/// A raw LC-MS file added to the session.
///
/// The payload is never inspected; it is copied into the package as-is.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Final path component, used verbatim as the archive entry name.
    pub name: String,
    /// Raw file contents.
    pub bytes: Arc<[u8]>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Payloads can be hundreds of megabytes; keep debug output to the size.
impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SampleMetadata – class / batch for one file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMetadata {
    pub class: String,
    pub batch: String,
}

impl SampleMetadata {
    pub fn new(class: impl Into<String>, batch: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            batch: batch.into(),
        }
    }
}

impl Default for SampleMetadata {
    fn default() -> Self {
        Self::new(DEFAULT_CLASS, DEFAULT_BATCH)
    }
}

// ---------------------------------------------------------------------------
// SampleSheet – metadata keyed by filename
// ---------------------------------------------------------------------------

/// Per-file metadata, keyed by filename rather than by position.
///
/// Row order in the manifest comes from the upload order of the files, so
/// the sheet itself does not need to be ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSheet {
    entries: BTreeMap<String, SampleMetadata>,
}

impl SampleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the metadata for `filename`.
    pub fn set(&mut self, filename: impl Into<String>, metadata: SampleMetadata) {
        self.entries.insert(filename.into(), metadata);
    }

    pub fn get(&self, filename: &str) -> Option<&SampleMetadata> {
        self.entries.get(filename)
    }

    /// Entry for `filename`, created from `default` if absent.
    pub fn entry_or(&mut self, filename: &str, default: SampleMetadata) -> &mut SampleMetadata {
        self.entries.entry(filename.to_string()).or_insert(default)
    }

    pub fn remove(&mut self, filename: &str) -> Option<SampleMetadata> {
        self.entries.remove(filename)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, SampleMetadata)> for SampleSheet {
    fn from_iter<I: IntoIterator<Item = (K, SampleMetadata)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// MetadataRecord – one manifest row
// ---------------------------------------------------------------------------

/// One row of `manifest.csv`. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MetadataRecord<'a> {
    pub filename: &'a str,
    pub class: &'a str,
    pub batch: &'a str,
}
