mod common;

use std::io::Cursor;

use wiz8_core::riff::{MagicVariant, RiffFile, TAG_LEVELS, TAG_PARTY_STATE};

#[test]
fn parses_sample_container() {
    let bytes = common::build_sample_save();
    let file = RiffFile::parse(Cursor::new(bytes.clone())).expect("parse failed");

    assert_eq!(file.magic(), MagicVariant::Riff);
    assert_eq!(file.chunks().len(), 3);
    assert_eq!(file.chunk_index("GVER"), Some(0));
    assert_eq!(file.chunk_index(TAG_PARTY_STATE), Some(1));
    assert!(file.chunk("NOPE").is_none());
    assert_eq!(file.chunk_at(2).expect("missing chunk").tag(), TAG_LEVELS);

    assert_eq!(file.to_bytes().expect("emit failed"), bytes);
}

#[test]
fn accepts_wiz8_magic_variant() {
    let mut bytes = common::build_sample_save();
    bytes[..4].copy_from_slice(b"WIZ8");

    let file = RiffFile::parse(Cursor::new(bytes)).expect("parse failed");
    assert_eq!(file.magic(), MagicVariant::Wiz8);
}

#[test]
fn lists_level_sub_chunks() {
    let bytes = common::build_sample_save();
    let file = RiffFile::parse(Cursor::new(bytes)).expect("parse failed");

    let subs = file
        .chunk(TAG_LEVELS)
        .expect("missing LVLS")
        .sub_chunks()
        .expect("bad mini-directory");
    assert_eq!(subs.len(), 2);
    assert_eq!(subs[0].tag(), "ARNK");
    assert_eq!(subs[0].payload(), [1, 2, 3, 4]);
    assert_eq!(subs[1].tag(), "TRYN");
}

#[test]
fn rejects_non_ascii_chunk_tag() {
    let mut bytes = common::build_sample_save();
    // First chunk tag starts right after the 16-byte prologue.
    bytes[16] = 0xFF;
    assert!(RiffFile::parse(Cursor::new(bytes)).is_err());
}
