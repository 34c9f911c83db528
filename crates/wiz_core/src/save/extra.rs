//! Character-extra record codec: party-membership and RPC-identity flags.
//!
//! One record is 0x106 bytes; only the leading flag block is understood.

use std::io::{self, Cursor};

use crate::reader::LittleEndianReader;

use super::types::CHARACTER_EXTRA_RECORD_SIZE;

pub const IN_PARTY_OFFSET: usize = 0x0000;
pub const RPC_ID_OFFSET: usize = 0x0004;
pub const RECRUITED_OFFSET: usize = 0x0008;
pub const AWAY_OFFSET: usize = 0x000C;

/// RPC id for player-created characters.
pub const RPC_ID_NONE: i32 = -1;

#[derive(Debug, Clone, Copy)]
pub struct CharacterExtraData {
    pub in_party: bool,
    pub rpc_id: i32,
    pub recruited: bool,
    pub away: bool,
}

impl CharacterExtraData {
    pub fn parse(blob: &[u8]) -> io::Result<Self> {
        if blob.len() != CHARACTER_EXTRA_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "character-extra record must be {CHARACTER_EXTRA_RECORD_SIZE} bytes, got {}",
                    blob.len()
                ),
            ));
        }

        let mut r = LittleEndianReader::new(Cursor::new(blob));
        let in_party = r.read_u32()? != 0;
        let rpc_id = r.read_i32()?;
        let recruited = r.read_u32()? != 0;
        let away = r.read_u32()? != 0;

        Ok(Self {
            in_party,
            rpc_id,
            recruited,
            away,
        })
    }

    pub fn is_rpc(&self) -> bool {
        self.rpc_id != RPC_ID_NONE
    }
}

#[cfg(test)]
mod tests {
    use super::CharacterExtraData;
    use crate::save::types::CHARACTER_EXTRA_RECORD_SIZE;

    #[test]
    fn parses_flags() {
        let mut blob = vec![0u8; CHARACTER_EXTRA_RECORD_SIZE];
        blob[0] = 1;
        blob[4..8].copy_from_slice(&12i32.to_le_bytes());

        let data = CharacterExtraData::parse(&blob).unwrap();
        assert!(data.in_party);
        assert!(data.is_rpc());
        assert_eq!(data.rpc_id, 12);
        assert!(!data.recruited);
    }

    #[test]
    fn rejects_wrong_record_length() {
        assert!(CharacterExtraData::parse(&[0u8; 8]).is_err());
    }
}
