//! End-to-end checks on the archive produced by `build_package`

use std::io::{Cursor, Read};

use proptest::prelude::*;
use xcms_packager::package::{MANIFEST_ENTRY, PARAMETERS_ENTRY};
use xcms_packager::{
    build_package, PackageError, ParameterSet, SampleMetadata, SampleSheet, UploadedFile,
};

fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut entry = archive.by_name(name).expect("entry present");
    let mut out = Vec::new();
    entry.read_to_end(&mut out).expect("readable entry");
    out
}

fn read_text(bytes: &[u8], name: &str) -> String {
    String::from_utf8(read_entry(bytes, name)).expect("utf-8 entry")
}

fn preset(name: &str) -> ParameterSet {
    ParameterSet::builtin_presets()
        .into_iter()
        .find(|p| p.preset == name)
        .expect("built-in preset")
}

#[test]
fn test_full_package_layout() {
    let files = vec![
        UploadedFile::new("QC_01.mzML", b"<indexedmzML>...</indexedmzML>".to_vec()),
        UploadedFile::new("Ctrl_A.mzXML", b"<mzXML/>".to_vec()),
        UploadedFile::new("Trt_B.cdf", vec![0x43, 0x44, 0x46, 0x01, 0x00, 0xff]),
    ];
    let sheet: SampleSheet = [
        ("QC_01.mzML", SampleMetadata::new("QC", "1")),
        ("Ctrl_A.mzXML", SampleMetadata::new("Control", "1")),
        ("Trt_B.cdf", SampleMetadata::new("Treated", "2")),
    ]
    .into_iter()
    .collect();

    let package = build_package(&files, &preset("HILIC-QTOF (default)"), &sheet).unwrap();

    assert_eq!(
        read_text(package.bytes(), MANIFEST_ENTRY),
        "filename,class,batch\n\
         QC_01.mzML,QC,1\n\
         Ctrl_A.mzXML,Control,1\n\
         Trt_B.cdf,Treated,2\n"
    );
    assert_eq!(
        read_text(package.bytes(), PARAMETERS_ENTRY),
        "XCMS Parameters:\n\
         Preset: HILIC-QTOF (default)\n\
         ppm: 15\n\
         peakwidth: 10,60\n\
         snthresh: 8\n\
         bw: 10\n\
         mzwid: 0.025\n\
         minfrac: 0.5\n"
    );
    for file in &files {
        assert_eq!(read_entry(package.bytes(), &file.name), &*file.bytes);
    }
}

#[test]
fn test_generic_preset_echo() {
    let files = vec![UploadedFile::new("a.mzML", b"a".to_vec())];
    let package = build_package(&files, &preset("Generic LC-MS"), &SampleSheet::new()).unwrap();

    let text = read_text(package.bytes(), PARAMETERS_ENTRY);
    for line in [
        "Preset: Generic LC-MS",
        "ppm: 25",
        "peakwidth: 5,40",
        "snthresh: 6",
        "bw: 5",
        "mzwid: 0.02",
        "minfrac: 0.3",
    ] {
        assert!(text.lines().any(|l| l == line), "missing line {line:?} in\n{text}");
    }
}

#[test]
fn test_empty_input_yields_no_archive() {
    let result = build_package(&[], &ParameterSet::default(), &SampleSheet::new());
    assert!(matches!(result, Err(PackageError::EmptyInput)));
}

#[test]
fn test_metadata_keyed_by_name_not_position() {
    let files = vec![
        UploadedFile::new("first.mzML", b"1".to_vec()),
        UploadedFile::new("second.mzML", b"2".to_vec()),
    ];
    let mut sheet = SampleSheet::new();
    // Inserted in the opposite order to the uploads.
    sheet.set("second.mzML", SampleMetadata::new("B", "2"));
    sheet.set("first.mzML", SampleMetadata::new("A", "1"));

    let package = build_package(&files, &ParameterSet::default(), &sheet).unwrap();
    let manifest = read_text(package.bytes(), MANIFEST_ENTRY);
    let rows: Vec<&str> = manifest.lines().skip(1).collect();
    assert_eq!(rows, vec!["first.mzML,A,1", "second.mzML,B,2"]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_manifest_has_one_row_per_file(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..8)
    ) {
        let files: Vec<UploadedFile> = payloads
            .iter()
            .enumerate()
            .map(|(i, bytes)| UploadedFile::new(format!("sample_{i:02}.mzML"), bytes.clone()))
            .collect();

        let package = build_package(&files, &ParameterSet::default(), &SampleSheet::new()).unwrap();
        let manifest = read_text(package.bytes(), MANIFEST_ENTRY);
        let names: Vec<&str> = manifest
            .lines()
            .skip(1)
            .map(|row| row.split(',').next().unwrap_or(""))
            .collect();

        let expected: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        prop_assert_eq!(names, expected);

        for file in &files {
            prop_assert_eq!(read_entry(package.bytes(), &file.name), file.bytes.to_vec());
        }
    }
}
