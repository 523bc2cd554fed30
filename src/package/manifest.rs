use crate::data::model::{MetadataRecord, SampleMetadata, SampleSheet, UploadedFile};

use super::error::PackageResult;

/// Serialize the sample sheet to CSV, one row per file in upload order.
///
/// Files missing from the sheet get the default class and batch, so the row
/// count always equals the file count. Sheet entries for files that were not
/// uploaded are skipped.
pub fn manifest_csv(files: &[UploadedFile], sheet: &SampleSheet) -> PackageResult<Vec<u8>> {
    let fallback = SampleMetadata::default();

    for orphan in sheet
        .filenames()
        .filter(|name| !files.iter().any(|f| f.name == *name))
    {
        log::warn!("Ignoring metadata for {orphan}: no such file in the package");
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    // Header comes from the record's field names.
    for file in files {
        let meta = sheet.get(&file.name).unwrap_or(&fallback);
        writer.serialize(MetadataRecord {
            filename: &file.name,
            class: &meta.class,
            batch: &meta.batch,
        })?;
    }

    writer
        .into_inner()
        .map_err(|e| e.into_error().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<UploadedFile> {
        names
            .iter()
            .map(|n| UploadedFile::new(*n, b"x".to_vec()))
            .collect()
    }

    fn as_text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_manifest_follows_upload_order() {
        let files = files(&["b.mzML", "a.mzML"]);
        let sheet: SampleSheet = [
            ("a.mzML", SampleMetadata::new("Control", "1")),
            ("b.mzML", SampleMetadata::new("Treated", "2")),
        ]
        .into_iter()
        .collect();

        let text = as_text(manifest_csv(&files, &sheet).unwrap());
        assert_eq!(
            text,
            "filename,class,batch\nb.mzML,Treated,2\na.mzML,Control,1\n"
        );
    }

    #[test]
    fn test_missing_metadata_uses_defaults() {
        let files = files(&["a.mzML"]);
        let text = as_text(manifest_csv(&files, &SampleSheet::new()).unwrap());
        assert_eq!(text, "filename,class,batch\na.mzML,Group1,1\n");
    }

    #[test]
    fn test_orphan_metadata_is_skipped() {
        let files = files(&["a.mzML"]);
        let mut sheet = SampleSheet::new();
        sheet.set("removed.mzML", SampleMetadata::new("QC", "9"));

        let text = as_text(manifest_csv(&files, &sheet).unwrap());
        assert!(!text.contains("removed.mzML"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let files = files(&["a.mzML"]);
        let mut sheet = SampleSheet::new();
        sheet.set("a.mzML", SampleMetadata::new("Dose 1,5", "1"));

        let text = as_text(manifest_csv(&files, &sheet).unwrap());
        assert!(text.contains("a.mzML,\"Dose 1,5\",1\n"));
    }
}
