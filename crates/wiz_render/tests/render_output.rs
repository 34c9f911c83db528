use wiz8_core::core_api::{Engine, Session};
use wiz8_render::{
    FieldSelection, JsonStyle, render_character_sheet, render_json_full, render_json_selected,
    render_party_overview,
};

fn put_i32(blob: &mut [u8], offset: usize, value: i32) {
    blob[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_utf16(blob: &mut [u8], offset: usize, value: &str) {
    for (i, unit) in value.encode_utf16().enumerate() {
        blob[offset + i * 2..offset + i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
    }
}

fn append_record(payload: &mut Vec<u8>, record: &[u8]) {
    payload.extend_from_slice(&(record.len() as u32).to_le_bytes());
    payload.extend_from_slice(record);
}

/// Minimal one-character save: a level 3 human Priest named Sana.
fn sample_save() -> Vec<u8> {
    let mut party = vec![0u8; 0x49C2];
    put_i32(&mut party, 0x00, 0);
    for slot in 1..8usize {
        put_i32(&mut party, slot * 4, -1);
    }
    put_i32(&mut party, 0x20, 1);
    put_i32(&mut party, 0x24, 400);
    put_utf16(&mut party, 0x38, "Monastery");

    let mut priest = vec![0u8; 0x1862];
    put_i32(&mut priest, 0x00, 1);
    put_utf16(&mut priest, 0x04, "Sana");
    put_i32(&mut priest, 0x24, 1); // female
    put_i32(&mut priest, 0x28, 0); // Human
    put_i32(&mut priest, 0x2C, 10); // Priest
    put_i32(&mut priest, 0x3C, 3); // level
    for (i, value) in [50, 55, 80, 60, 50, 50, 55].iter().enumerate() {
        put_i32(&mut priest, 0x48 + i * 4, *value);
    }
    put_i32(&mut priest, 0x80 + 18 * 4, 20); // Divinity
    put_i32(&mut priest, 0x1B8, 18);
    put_i32(&mut priest, 0x1BC, 18);
    for slot in 0..10usize {
        put_i32(&mut priest, 0x27C + slot * 16, -1);
    }
    for slot in 0..8usize {
        put_i32(&mut priest, 0x31C + slot * 16, -1);
    }

    let mut empty = vec![0u8; 0x1862];
    for slot in 0..10usize {
        put_i32(&mut empty, 0x27C + slot * 16, -1);
    }
    for slot in 0..8usize {
        put_i32(&mut empty, 0x31C + slot * 16, -1);
    }

    let mut extra = vec![0u8; 0x106];
    put_i32(&mut extra, 0x00, 1);
    put_i32(&mut extra, 0x04, -1);
    let empty_extra = {
        let mut blob = vec![0u8; 0x106];
        put_i32(&mut blob, 0x04, -1);
        blob
    };

    let mut gsta = Vec::new();
    append_record(&mut gsta, &party);
    append_record(&mut gsta, &priest);
    for _ in 1..8 {
        append_record(&mut gsta, &empty);
    }
    append_record(&mut gsta, &extra);
    for _ in 1..8 {
        append_record(&mut gsta, &empty_extra);
    }

    let mut body = Vec::new();
    body.extend_from_slice(b"GSTA");
    body.extend_from_slice(&[0u8; 2]);
    body.extend_from_slice(&(gsta.len() as u32).to_le_bytes());
    body.extend_from_slice(&gsta);

    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&body);
    out
}

fn sample_session() -> Session {
    Engine::new()
        .open_bytes(sample_save())
        .expect("fixture should parse")
}

#[test]
fn full_json_has_party_and_characters() {
    let session = sample_session();
    let value = render_json_full(&session, JsonStyle::CanonicalV1).expect("render failed");
    let root = value.as_object().expect("json should be an object");

    assert_eq!(root["gold"], 400);
    assert_eq!(root["level_name"], "Monastery");

    let characters = root["characters"].as_array().expect("characters array");
    assert_eq!(characters.len(), 1);
    assert_eq!(characters[0]["summary"]["name"], "Sana");
    assert_eq!(characters[0]["summary"]["profession"], "Priest");
    assert_eq!(characters[0]["attributes"][2]["base"], 80);
}

#[test]
fn selected_json_requires_character_for_per_character_fields() {
    let session = sample_session();
    let fields = FieldSelection {
        gold: true,
        attributes: true,
        ..FieldSelection::default()
    };

    assert!(render_json_selected(&session, &fields, None, JsonStyle::CanonicalV1).is_err());

    let value = render_json_selected(&session, &fields, Some(0), JsonStyle::CanonicalV1)
        .expect("render failed");
    let root = value.as_object().expect("json should be an object");
    assert_eq!(root["gold"], 400);
    assert_eq!(root["character"]["attributes"][2]["name"], "Piety");
}

#[test]
fn party_overview_mentions_location_and_members() {
    let session = sample_session();
    let text = render_party_overview(&session);

    assert!(text.contains("Monastery"));
    assert!(text.contains("Gold"));
    assert!(text.contains("Sana"));
    assert!(text.contains("Priest"));
}

#[test]
fn character_sheet_renders_pools_and_attributes() {
    let session = sample_session();
    let sheet = render_character_sheet(&session, 0).expect("render failed");

    assert!(sheet.contains("Sana"));
    assert!(sheet.contains("Hit Points"));
    assert!(sheet.contains("18/18"));
    assert!(sheet.contains("Piety"));

    assert!(render_character_sheet(&session, 5).is_err());
}
