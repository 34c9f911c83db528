//! Synthetic save fixture builder.
//!
//! Byte layout is written out by hand here, independent of the production
//! writer, so codec tests exercise real decoding rather than a
//! write-then-read identity.
#![allow(dead_code)]

use wiz8_core::save::types::{
    CHARACTER_EXTRA_RECORD_SIZE, CHARACTER_RECORD_SIZE, PARTY_RECORD_SIZE,
};

pub const GOLD: i32 = 2500;
pub const LEVEL_NAME: &str = "Arnika";
pub const GAME_TIME_MINUTES: u32 = 5000;

fn put_i32(blob: &mut [u8], offset: usize, value: i32) {
    blob[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_f32(blob: &mut [u8], offset: usize, value: f32) {
    blob[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_utf16(blob: &mut [u8], offset: usize, value: &str) {
    for (i, unit) in value.encode_utf16().enumerate() {
        blob[offset + i * 2..offset + i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
    }
}

fn put_item(blob: &mut [u8], offset: usize, id: i32, count: i32, charges: i32, flags: u32) {
    put_i32(blob, offset, id);
    put_i32(blob, offset + 4, count);
    put_i32(blob, offset + 8, charges);
    put_i32(blob, offset + 12, flags as i32);
}

pub fn party_record() -> Vec<u8> {
    let mut blob = vec![0u8; PARTY_RECORD_SIZE];
    // Slots 0 and 1 occupied, rest empty.
    for slot in 0..8usize {
        let value = if slot < 2 { slot as i32 } else { -1 };
        put_i32(&mut blob, slot * 4, value);
    }
    put_i32(&mut blob, 0x20, 2); // member count
    put_i32(&mut blob, 0x24, GOLD);
    put_f32(&mut blob, 0x28, 10.0);
    put_f32(&mut blob, 0x2C, 0.0);
    put_f32(&mut blob, 0x30, -4.5);
    put_f32(&mut blob, 0x34, 1.5);
    put_utf16(&mut blob, 0x38, LEVEL_NAME);
    put_i32(&mut blob, 0x58, GAME_TIME_MINUTES as i32);
    blob
}

/// Slot 0: "Vima", female Elf Mage, level 5.
pub fn mage_record() -> Vec<u8> {
    let mut blob = vec![0u8; CHARACTER_RECORD_SIZE];
    put_i32(&mut blob, 0x00, 1); // in use
    put_utf16(&mut blob, 0x04, "Vima");
    put_i32(&mut blob, 0x24, 1); // female
    put_i32(&mut blob, 0x28, 1); // Elf
    put_i32(&mut blob, 0x2C, 14); // Mage
    put_i32(&mut blob, 0x3C, 5); // level
    put_i32(&mut blob, 0x40, 4000); // experience
    // Attributes base: STR INT PIE VIT DEX SPD SEN.
    for (i, value) in [45, 85, 55, 60, 70, 65, 50].iter().enumerate() {
        put_i32(&mut blob, 0x48 + i * 4, *value);
    }
    // Skill bases: Wizardry 40, Fire Magic 25, Mental Magic 30.
    put_i32(&mut blob, 0x80 + 17 * 4, 40);
    put_i32(&mut blob, 0x80 + 26 * 4, 25);
    put_i32(&mut blob, 0x80 + 30 * 4, 30);
    // Stored pools.
    put_i32(&mut blob, 0x1B8, 20); // hp base
    put_i32(&mut blob, 0x1BC, 18); // hp current
    put_i32(&mut blob, 0x1C0, 18); // stamina base
    put_i32(&mut blob, 0x1C4, 18); // stamina current
    // Equipped quarterstaff (identified), three carried potions.
    put_item(&mut blob, 0x27C, 30, 1, 0, 0x01);
    put_item(&mut blob, 0x31C, 120, 3, 0, 0x01);
    // Remaining item slots are empty.
    for slot in 1..10usize {
        put_i32(&mut blob, 0x27C + slot * 16, -1);
    }
    for slot in 1..8usize {
        put_i32(&mut blob, 0x31C + slot * 16, -1);
    }
    blob
}

/// Slot 1: "Brund", male Dwarf Fighter, level 6, poisoned, tower shield.
pub fn fighter_record() -> Vec<u8> {
    let mut blob = vec![0u8; CHARACTER_RECORD_SIZE];
    put_i32(&mut blob, 0x00, 1);
    put_utf16(&mut blob, 0x04, "Brund");
    put_i32(&mut blob, 0x24, 0); // male
    put_i32(&mut blob, 0x28, 2); // Dwarf
    put_i32(&mut blob, 0x2C, 0); // Fighter
    put_i32(&mut blob, 0x3C, 6);
    put_i32(&mut blob, 0x40, 9000);
    for (i, value) in [90, 40, 40, 85, 60, 55, 45].iter().enumerate() {
        put_i32(&mut blob, 0x48 + i * 4, *value);
    }
    put_i32(&mut blob, 0x80, 35); // Sword base
    put_i32(&mut blob, 0x1B8, 60);
    put_i32(&mut blob, 0x1BC, 60);
    put_i32(&mut blob, 0x1C0, 55);
    put_i32(&mut blob, 0x1C4, 50);
    // Poisoned for 3 rounds.
    put_i32(&mut blob, 0x234 + 10 * 4, 3);
    // Equipped tower shield.
    put_item(&mut blob, 0x27C, 64, 1, 0, 0x01);
    for slot in 1..10usize {
        put_i32(&mut blob, 0x27C + slot * 16, -1);
    }
    for slot in 0..8usize {
        put_i32(&mut blob, 0x31C + slot * 16, -1);
    }
    blob
}

pub fn empty_character_record() -> Vec<u8> {
    let mut blob = vec![0u8; CHARACTER_RECORD_SIZE];
    for slot in 0..10usize {
        put_i32(&mut blob, 0x27C + slot * 16, -1);
    }
    for slot in 0..8usize {
        put_i32(&mut blob, 0x31C + slot * 16, -1);
    }
    blob
}

pub fn extra_record(in_party: bool, rpc_id: i32) -> Vec<u8> {
    let mut blob = vec![0u8; CHARACTER_EXTRA_RECORD_SIZE];
    put_i32(&mut blob, 0x00, in_party as i32);
    put_i32(&mut blob, 0x04, rpc_id);
    put_i32(&mut blob, 0x08, (rpc_id >= 0) as i32);
    blob
}

pub fn gsta_payload() -> Vec<u8> {
    let mut payload = Vec::new();
    append_record(&mut payload, &party_record());
    append_record(&mut payload, &mage_record());
    append_record(&mut payload, &fighter_record());
    for _ in 2..8 {
        append_record(&mut payload, &empty_character_record());
    }
    append_record(&mut payload, &extra_record(true, -1));
    append_record(&mut payload, &extra_record(true, 3));
    for _ in 2..8 {
        append_record(&mut payload, &extra_record(false, -1));
    }
    payload
}

fn append_record(payload: &mut Vec<u8>, record: &[u8]) {
    payload.extend_from_slice(&(record.len() as u32).to_le_bytes());
    payload.extend_from_slice(record);
}

fn append_chunk(body: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
    body.extend_from_slice(tag);
    body.extend_from_slice(&[0u8; 2]);
    body.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    body.extend_from_slice(payload);
}

pub fn levels_payload() -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&2u32.to_le_bytes());
    append_chunk(&mut payload, b"ARNK", &[1, 2, 3, 4]);
    append_chunk(&mut payload, b"TRYN", &[9, 9]);
    payload
}

/// Full synthetic save: GVER + GSTA + LVLS chunks under a RIFF prologue.
pub fn build_sample_save() -> Vec<u8> {
    let mut body = Vec::new();
    append_chunk(&mut body, b"GVER", &12u32.to_le_bytes());
    append_chunk(&mut body, b"GSTA", &gsta_payload());
    append_chunk(&mut body, b"LVLS", &levels_payload());

    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&3u32.to_le_bytes());
    out.extend_from_slice(&body);
    out
}
