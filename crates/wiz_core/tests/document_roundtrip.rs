mod common;

use std::io::Cursor;

use wiz8_core::save::types::Profession;
use wiz8_core::save::{Document, SaveGame};

#[test]
fn unmodified_document_roundtrips_byte_exact() {
    let bytes = common::build_sample_save();
    let doc = Document::parse_with_layout(Cursor::new(bytes.clone())).expect("parse failed");

    assert!(doc.supports_editing());
    assert_eq!(doc.save.party.gold, common::GOLD);
    assert_eq!(doc.save.party.level_name, common::LEVEL_NAME);
    assert_eq!(doc.save.party.game_time_minutes, common::GAME_TIME_MINUTES);
    assert_eq!(doc.save.characters[0].name, "Vima");
    assert_eq!(doc.save.characters[0].profession, Profession::Mage);
    assert_eq!(doc.save.characters[1].name, "Brund");
    assert!(!doc.save.characters[2].in_use);

    let emitted = doc.to_bytes_unmodified().expect("emit failed");
    assert_eq!(emitted, bytes);
}

#[test]
fn modified_emit_without_edits_is_identical() {
    let bytes = common::build_sample_save();
    let doc = Document::parse_with_layout(Cursor::new(bytes.clone())).expect("parse failed");

    let emitted = doc.to_bytes_modified().expect("emit failed");
    assert_eq!(emitted, bytes);
}

#[test]
fn gold_edit_changes_only_known_offsets() {
    let bytes = common::build_sample_save();
    let mut doc = Document::parse_with_layout(Cursor::new(bytes.clone())).expect("parse failed");

    doc.set_gold(9999).expect("edit failed");

    // The pristine copy is untouched by the edit.
    assert_eq!(doc.to_bytes_unmodified().expect("emit failed"), bytes);

    let emitted = doc.to_bytes_modified().expect("emit failed");
    assert_eq!(emitted.len(), bytes.len());
    assert_ne!(emitted, bytes);

    let reparsed = SaveGame::parse(Cursor::new(emitted)).expect("reparse failed");
    assert_eq!(reparsed.party.gold, 9999);
    assert_eq!(reparsed.party.level_name, common::LEVEL_NAME);
    assert_eq!(reparsed.characters[0].name, "Vima");
}

#[test]
fn name_edit_roundtrips_and_respects_capacity() {
    let bytes = common::build_sample_save();
    let mut doc = Document::parse_with_layout(Cursor::new(bytes)).expect("parse failed");

    doc.set_character_name(0, "Vi of Trynton").expect("edit failed");
    let emitted = doc.to_bytes_modified().expect("emit failed");
    let reparsed = SaveGame::parse(Cursor::new(emitted)).expect("reparse failed");
    assert_eq!(reparsed.characters[0].name, "Vi of Trynton");

    let err = doc
        .set_character_name(0, "An Impractically Long Name")
        .expect_err("over-capacity name must be rejected");
    assert!(err.to_string().contains("UTF-16"));
}

#[test]
fn rejects_corrupt_record_size_prefix() {
    let mut bytes = common::build_sample_save();
    // GSTA payload starts after the prologue (16), the GVER chunk (14),
    // and the GSTA chunk header (10); its first u32 is the party record
    // size prefix.
    let prefix_offset = 16 + 14 + 10;
    bytes[prefix_offset..prefix_offset + 4].copy_from_slice(&0x1000u32.to_le_bytes());

    let err = Document::parse_with_layout(Cursor::new(bytes)).expect_err("must reject");
    assert!(err.to_string().contains("party record size prefix"));
}

#[test]
fn rejects_missing_gsta_chunk() {
    let mut body = Vec::new();
    body.extend_from_slice(b"GVER");
    body.extend_from_slice(&[0u8; 2]);
    body.extend_from_slice(&4u32.to_le_bytes());
    body.extend_from_slice(&12u32.to_le_bytes());

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"WIZ8");
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&body);

    let err = Document::parse_with_layout(Cursor::new(bytes)).expect_err("must reject");
    assert!(err.to_string().contains("GSTA"));
}

#[test]
fn rejects_truncated_fixture() {
    let mut bytes = common::build_sample_save();
    bytes.truncate(128);
    assert!(Document::parse_with_layout(Cursor::new(bytes)).is_err());
}

#[test]
fn edits_on_empty_slots_are_rejected() {
    let bytes = common::build_sample_save();
    let mut doc = Document::parse_with_layout(Cursor::new(bytes)).expect("parse failed");

    let err = doc.set_level(3, 10).expect_err("slot 3 is empty");
    assert!(err.to_string().contains("empty"));

    let err = doc.set_level(11, 10).expect_err("slot 11 does not exist");
    assert!(err.to_string().contains("invalid character index"));
}

#[test]
fn level_directory_lists_nested_chunks() {
    let bytes = common::build_sample_save();
    let doc = Document::parse_with_layout(Cursor::new(bytes)).expect("parse failed");
    assert_eq!(doc.level_tags().expect("bad level directory"), ["ARNK", "TRYN"]);
}
