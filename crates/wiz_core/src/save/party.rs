//! Party record codec.
//!
//! One record is 0x49C2 bytes; known fields occupy the fixed offsets
//! below and the remainder is preserved verbatim.

use std::io::{self, Cursor};

use log::warn;

use crate::reader::LittleEndianReader;

use super::types::{NAME_CAPACITY_UNITS, PARTY_RECORD_SIZE, PARTY_SLOT_COUNT};

pub const MEMBER_INDICES_OFFSET: usize = 0x0000;
pub const MEMBER_COUNT_OFFSET: usize = 0x0020;
pub const GOLD_OFFSET: usize = 0x0024;
pub const POSITION_OFFSET: usize = 0x0028;
pub const HEADING_OFFSET: usize = 0x0034;
pub const LEVEL_NAME_OFFSET: usize = 0x0038;
pub const GAME_TIME_OFFSET: usize = 0x0058;

pub const MEMBER_SLOT_EMPTY: i32 = -1;

#[derive(Debug, Clone)]
pub struct PartyData {
    pub member_indices: [i32; PARTY_SLOT_COUNT],
    pub member_count: i32,
    pub gold: i32,
    pub position: [f32; 3],
    pub heading: f32,
    pub level_name: String,
    pub game_time_minutes: u32,
}

impl PartyData {
    pub fn parse(blob: &[u8]) -> io::Result<Self> {
        if blob.len() != PARTY_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "party record must be {PARTY_RECORD_SIZE} bytes, got {}",
                    blob.len()
                ),
            ));
        }

        let mut r = LittleEndianReader::new(Cursor::new(blob));

        let member_indices = r.read_i32_array::<PARTY_SLOT_COUNT>()?;
        for (slot, &index) in member_indices.iter().enumerate() {
            if index != MEMBER_SLOT_EMPTY && !(0..PARTY_SLOT_COUNT as i32).contains(&index) {
                warn!("party slot {slot} references out-of-range character index {index}");
            }
        }

        let member_count = r.read_i32()?;
        let occupied = member_indices
            .iter()
            .filter(|&&i| i != MEMBER_SLOT_EMPTY)
            .count() as i32;
        if member_count != occupied {
            warn!("party member count {member_count} disagrees with {occupied} occupied slots");
        }

        let gold = r.read_i32()?;
        let position = [r.read_f32()?, r.read_f32()?, r.read_f32()?];
        let heading = r.read_f32()?;
        let level_name = r.read_utf16_string(NAME_CAPACITY_UNITS)?;
        let game_time_minutes = r.read_u32()?;

        Ok(Self {
            member_indices,
            member_count,
            gold,
            position,
            heading,
            level_name,
            game_time_minutes,
        })
    }

    pub fn member_character_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.member_indices
            .iter()
            .filter(|&&i| (0..PARTY_SLOT_COUNT as i32).contains(&i))
            .map(|&i| i as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::{GOLD_OFFSET, PartyData};
    use crate::save::types::PARTY_RECORD_SIZE;

    #[test]
    fn parses_gold_and_members() {
        let mut blob = vec![0u8; PARTY_RECORD_SIZE];
        for slot in 0..8usize {
            let v: i32 = if slot < 2 { slot as i32 } else { -1 };
            blob[slot * 4..slot * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }
        blob[0x20..0x24].copy_from_slice(&2i32.to_le_bytes());
        blob[GOLD_OFFSET..GOLD_OFFSET + 4].copy_from_slice(&1234i32.to_le_bytes());

        let data = PartyData::parse(&blob).unwrap();
        assert_eq!(data.gold, 1234);
        assert_eq!(data.member_count, 2);
        assert_eq!(data.member_character_indices().collect::<Vec<_>>(), [0, 1]);
    }

    #[test]
    fn rejects_wrong_record_length() {
        assert!(PartyData::parse(&[0u8; 100]).is_err());
    }
}
