use std::fs;
use std::io::{ErrorKind, Write};

use tempfile::{Builder, NamedTempFile};
use vsmedit::codec::{EnumValue, FieldValue};
use vsmedit::error::InvalidReason;
use vsmedit::field::{BYTE_ORDERING, CATEGORY, FILE_VERSION, HEADER_LEN, LOCALIZED_NAME, PLUGIN_TYPE, UNIVERSAL_NAME};
use vsmedit::{Compatibility, EditOptions, Error, ExtensionKind, PluginEditor, PluginFile, Validity};

use encoding_rs::{UTF_8, WINDOWS_1252};

fn put_pascal(buf: &mut [u8], offset: usize, text: &str) {
    buf[offset] = text.len() as u8;
    buf[offset + 1..offset + 1 + text.len()].copy_from_slice(text.as_bytes());
}

fn header(universal: &str, version: u8) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_LEN as usize + 32];
    buf[..4].copy_from_slice(b"MCVS");
    buf[4] = 1;
    buf[5] = b'I';
    put_pascal(&mut buf, 6, universal);
    put_pascal(&mut buf, 70, "Tools and Things");
    buf[134] = version;
    put_pascal(&mut buf, 162, "Mein Werkzeug");
    buf
}

fn write_fixture(bytes: &[u8], suffix: &str) -> NamedTempFile {
    let mut tmp = Builder::new().suffix(suffix).tempfile().unwrap();
    tmp.write_all(bytes).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn fixture(universal: &str, version: u8) -> NamedTempFile {
    write_fixture(&header(universal, version), ".vst")
}

// ── Validation ───────────────────────────────────────────────────────────────

#[test]
fn test_validate_rejects_short_file() {
    let tmp = write_fixture(b"MCV", ".vsm");
    let file = PluginFile::open(tmp.path()).unwrap();
    assert_eq!(file.validate().unwrap(), Validity::Invalid(InvalidReason::TooShort { len: 3 }));
}

#[test]
fn test_validate_rejects_bad_magic() {
    let tmp = write_fixture(b"PK\x03\x04 not a plugin", ".vsm");
    let file = PluginFile::open(tmp.path()).unwrap();
    assert_eq!(
        file.validate().unwrap(),
        Validity::Invalid(InvalidReason::BadMagic { found: *b"PK\x03\x04" })
    );
}

#[test]
fn test_validate_accepts_magic() {
    let tmp = fixture("MyTool", 13);
    assert!(PluginFile::open(tmp.path()).unwrap().validate().unwrap().is_valid());

    let bare = write_fixture(b"MCVS", ".vsm");
    assert_eq!(PluginFile::open(bare.path()).unwrap().validate().unwrap(), Validity::Valid);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    match PluginFile::open(dir.path().join("absent.vsm")) {
        Err(Error::Io(e)) => assert_eq!(e.kind(), ErrorKind::NotFound),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

// ── Field transactions ───────────────────────────────────────────────────────

#[test]
fn test_read_then_write_round_trip() {
    let tmp = fixture("MyTool", 13);
    let file = PluginFile::open(tmp.path()).unwrap();

    assert_eq!(file.read_field(&UNIVERSAL_NAME, UTF_8).unwrap(), FieldValue::Text("MyTool".into()));

    let outcome = file.write_field(&CATEGORY, "Lighting", UTF_8).unwrap();
    assert_eq!(outcome.bytes_written, 9);
    assert!(!outcome.truncated);
    assert_eq!(file.read_field(&CATEGORY, UTF_8).unwrap(), FieldValue::Text("Lighting".into()));
}

#[test]
fn test_write_is_not_padded() {
    let tmp = fixture("MyTool", 13);
    let file = PluginFile::open(tmp.path()).unwrap();
    let before = fs::read(tmp.path()).unwrap();

    file.write_field(&CATEGORY, "Hi", UTF_8).unwrap();
    let after = fs::read(tmp.path()).unwrap();

    assert_eq!(&after[70..73], b"\x02Hi");
    // Stale payload beyond the new length is left in place.
    assert_eq!(&after[73..134], &before[73..134]);
    assert_eq!(file.read_field(&CATEGORY, UTF_8).unwrap().to_string(), "Hi");
}

#[test]
fn test_read_only_field_is_never_written() {
    let tmp = fixture("MyTool", 13);
    let file = PluginFile::open(tmp.path()).unwrap();
    let before = fs::read(tmp.path()).unwrap();

    for field in [&PLUGIN_TYPE, &FILE_VERSION] {
        match file.write_field(field, "2", UTF_8) {
            Err(Error::ReadOnlyField(name)) => assert_eq!(name, field.name()),
            other => panic!("expected ReadOnlyField, got {other:?}"),
        }
    }
    assert_eq!(fs::read(tmp.path()).unwrap(), before);
}

#[test]
fn test_long_value_is_truncated_within_capacity() {
    let tmp = fixture("MyTool", 13);
    let file = PluginFile::open(tmp.path()).unwrap();
    let long = "L".repeat(100);

    let outcome = file.write_field(&UNIVERSAL_NAME, &long, UTF_8).unwrap();
    assert!(outcome.truncated);
    assert_eq!(outcome.stored.len(), 63);

    let raw = fs::read(tmp.path()).unwrap();
    assert!(raw[6] <= 63);
    // The neighbouring field is intact.
    assert_eq!(file.read_field(&CATEGORY, UTF_8).unwrap().to_string(), "Tools and Things");
}

#[test]
fn test_short_read_at_end_of_file() {
    // File ends 3 bytes into UniversalName's payload.
    let mut bytes = header("MyTool", 13);
    bytes.truncate(10);
    let tmp = write_fixture(&bytes, ".vst");
    let file = PluginFile::open(tmp.path()).unwrap();

    assert_eq!(file.read_raw(&UNIVERSAL_NAME).unwrap().len(), 4);
    assert_eq!(file.read_field(&UNIVERSAL_NAME, UTF_8).unwrap().to_string(), "MyT");
    assert_eq!(file.read_field(&LOCALIZED_NAME, UTF_8).unwrap(), FieldValue::Text(String::new()));
    assert_eq!(file.version().unwrap().ordinal, 0);
}

#[test]
fn test_unmappable_text_is_refused_without_writing() {
    let tmp = fixture("MyTool", 13);
    let file = PluginFile::open(tmp.path()).unwrap();
    let before = fs::read(tmp.path()).unwrap();

    match file.write_field(&CATEGORY, "日本", WINDOWS_1252) {
        Err(Error::InvalidValue { field, value }) => {
            assert_eq!(field, "Category");
            assert_eq!(value, "日本");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
    assert_eq!(fs::read(tmp.path()).unwrap(), before);
}

#[test]
fn test_unrecognized_byte_order_marker() {
    let mut bytes = header("MyTool", 13);
    bytes[5] = 0;
    let tmp = write_fixture(&bytes, ".vst");
    let file = PluginFile::open(tmp.path()).unwrap();

    let value = file.read_field(&BYTE_ORDERING, UTF_8).unwrap();
    assert_eq!(
        value,
        FieldValue::Enum(EnumValue::Unrecognized { code: 0, label: "Unknown byte order" })
    );
    assert_eq!(value.to_string(), "Unknown byte order");
}

// ── Editor ───────────────────────────────────────────────────────────────────

#[test]
fn test_editor_get_and_set() {
    let tmp = fixture("MyTool", 13);
    let editor = PluginEditor::open(tmp.path(), EditOptions::default()).unwrap();

    assert_eq!(editor.extension_kind(), ExtensionKind::Tool);
    assert_eq!(editor.version().compatibility, Compatibility::Known);
    assert_eq!(editor.get("universal").unwrap().to_string(), "UniversalName: 'MyTool'");

    editor.set("categ", "Lighting").unwrap();
    assert_eq!(editor.get("Category").unwrap().value, FieldValue::Text("Lighting".into()));

    assert_eq!(
        editor.get("PluginType").unwrap().value,
        FieldValue::Enum(EnumValue::Known { code: 1, label: "Tool command" })
    );
    let all = editor.read_all().unwrap();
    assert_eq!(all.len(), 6);
    assert_eq!(all[2].raw.len(), 64);
    assert_eq!(&all[2].raw[..7], b"\x06MyTool");
    assert_eq!(all[4].raw, vec![13]);
}

#[test]
fn test_editor_name_resolution_errors() {
    let tmp = fixture("MyTool", 13);
    let editor = PluginEditor::open(tmp.path(), EditOptions::default()).unwrap();

    match editor.get("Name") {
        Err(Error::FieldAmbiguous { candidates, .. }) => {
            assert_eq!(candidates, vec!["UniversalName", "LocalizedName"]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
    assert!(matches!(editor.get("Icon"), Err(Error::FieldNotFound(_))));
    assert!(matches!(editor.set("ByteOrdering", "M"), Err(Error::ReadOnlyField("ByteOrdering"))));
}

#[test]
fn test_editor_version_gate() {
    let old = fixture("MyTool", 0);
    assert!(matches!(
        PluginEditor::open(old.path(), EditOptions::default()),
        Err(Error::UnsupportedVersion(0))
    ));

    let newer = fixture("MyTool", 200);
    let editor = PluginEditor::open(newer.path(), EditOptions::default()).unwrap();
    assert_eq!(editor.version().compatibility, Compatibility::Newer);
    assert_eq!(editor.get("Universal").unwrap().value.to_string(), "MyTool");
}

#[test]
fn test_editor_rejects_invalid_file() {
    let tmp = write_fixture(b"XXXX and some more bytes", ".vso");
    assert!(matches!(
        PluginEditor::open(tmp.path(), EditOptions::default()),
        Err(Error::InvalidFile(InvalidReason::BadMagic { .. }))
    ));
}

#[test]
fn test_editor_legacy_encoding() {
    let tmp = fixture("MyTool", 9);
    let options = EditOptions::with_encoding_label("windows-1252").unwrap();
    assert_eq!(options.encoding, WINDOWS_1252);
    let editor = PluginEditor::open(tmp.path(), options).unwrap();

    let outcome = editor.set("Localized", "Café").unwrap();
    assert_eq!(outcome.bytes_written, 5);
    assert_eq!(&fs::read(tmp.path()).unwrap()[162..167], b"\x04Caf\xe9");
    assert_eq!(editor.get("Localized").unwrap().value.to_string(), "Café");

    assert!(EditOptions::with_encoding_label("no-such-encoding").is_none());
}

#[test]
fn test_non_byte_encodings_are_not_offered() {
    assert!(EditOptions::with_encoding_label("utf-16le").is_none());
    assert!(EditOptions::with_encoding_label("UTF-16").is_none());
    assert!(EditOptions::with_encoding_label("iso-2022-kr").is_none());
    assert!(EditOptions::with_encoding_label(" macintosh ").is_some());
}

#[test]
fn test_editor_set_refuses_unmappable_text() {
    let tmp = fixture("MyTool", 9);
    let editor = PluginEditor::open(tmp.path(), EditOptions::with_encoding_label("windows-1252").unwrap()).unwrap();

    assert!(matches!(editor.set("Universal", "日本"), Err(Error::InvalidValue { field: "UniversalName", .. })));
    assert_eq!(editor.get("Universal").unwrap().value.to_string(), "MyTool");
}
