//! Character record codec.
//!
//! One record is 0x1862 bytes. Known fields sit at the fixed offsets
//! below; everything outside them is opaque and preserved verbatim by the
//! blob-patching write path.

use std::io::{self, Cursor, Read, Seek};

use log::warn;

use crate::gender::Gender;
use crate::reader::LittleEndianReader;

use super::types::{
    ATTRIBUTE_COUNT, CHARACTER_RECORD_SIZE, CONDITION_COUNT, CONDITION_DURATION_PERMANENT,
    CARRY_SLOT_COUNT, EQUIP_SLOT_COUNT, NAME_CAPACITY_UNITS, Profession, REALM_COUNT, Race,
    SKILL_COUNT, condition_is_permanent_only,
};

pub const IN_USE_OFFSET: usize = 0x0000;
pub const NAME_OFFSET: usize = 0x0004;
pub const GENDER_OFFSET: usize = 0x0024;
pub const RACE_OFFSET: usize = 0x0028;
pub const PROFESSION_OFFSET: usize = 0x002C;
pub const PORTRAIT_OFFSET: usize = 0x0030;
pub const PERSONALITY_OFFSET: usize = 0x0034;
pub const VOICE_OFFSET: usize = 0x0038;
pub const LEVEL_OFFSET: usize = 0x003C;
pub const EXPERIENCE_OFFSET: usize = 0x0040;
pub const UNSPENT_POINTS_OFFSET: usize = 0x0044;
pub const ATTRIBUTES_BASE_OFFSET: usize = 0x0048;
pub const ATTRIBUTES_CURRENT_OFFSET: usize = 0x0064;
pub const SKILLS_BASE_OFFSET: usize = 0x0080;
pub const SKILLS_CURRENT_OFFSET: usize = 0x011C;
pub const HP_BASE_OFFSET: usize = 0x01B8;
pub const HP_CURRENT_OFFSET: usize = 0x01BC;
pub const STAMINA_BASE_OFFSET: usize = 0x01C0;
pub const STAMINA_CURRENT_OFFSET: usize = 0x01C4;
pub const MANA_BASE_OFFSET: usize = 0x01C8;
pub const MANA_CURRENT_OFFSET: usize = 0x01E0;
pub const AC_BASE_OFFSET: usize = 0x01F8;
pub const AC_MOD_OFFSET: usize = 0x01FC;
pub const HP_RECOVERY_OFFSET: usize = 0x0200;
pub const STAMINA_RECOVERY_OFFSET: usize = 0x0204;
pub const SP_RECOVERY_OFFSET: usize = 0x0208;
pub const ABSORPTION_OFFSET: usize = 0x020C;
pub const MAGIC_RESIST_OFFSET: usize = 0x0210;
pub const CARRY_CAPACITY_OFFSET: usize = 0x0228;
pub const PERSONAL_LOAD_OFFSET: usize = 0x022C;
pub const ENCUMBRANCE_OFFSET: usize = 0x0230;
pub const CONDITIONS_OFFSET: usize = 0x0234;
pub const EQUIPMENT_OFFSET: usize = 0x027C;
pub const CARRIED_OFFSET: usize = 0x031C;

pub const ITEM_SLOT_WIDTH: usize = 16;
pub const ITEM_ID_OFFSET: usize = 0x0;
pub const ITEM_COUNT_OFFSET: usize = 0x4;
pub const ITEM_CHARGES_OFFSET: usize = 0x8;
pub const ITEM_FLAGS_OFFSET: usize = 0xC;

pub const ITEM_ID_EMPTY: i32 = -1;

pub const ITEM_FLAG_IDENTIFIED: u32 = 0x01;
pub const ITEM_FLAG_CURSED: u32 = 0x02;
pub const ITEM_FLAG_EQUIPPABLE_BROKEN: u32 = 0x04;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSlot {
    pub id: i32,
    pub count: i32,
    pub charges: i32,
    pub flags: u32,
}

impl ItemSlot {
    pub const EMPTY: ItemSlot = ItemSlot {
        id: ITEM_ID_EMPTY,
        count: 0,
        charges: 0,
        flags: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.id < 0
    }

    pub fn is_identified(&self) -> bool {
        self.flags & ITEM_FLAG_IDENTIFIED != 0
    }
}

#[derive(Debug, Clone)]
pub struct CharacterData {
    pub in_use: bool,
    pub name: String,
    pub gender: Gender,
    pub race_raw: i32,
    pub race: Race,
    pub profession_raw: i32,
    pub profession: Profession,
    pub portrait: i32,
    pub personality: i32,
    pub voice: i32,
    pub level: i32,
    pub experience: i32,
    pub unspent_points: i32,
    pub attributes_base: [i32; ATTRIBUTE_COUNT],
    pub attributes_current: [i32; ATTRIBUTE_COUNT],
    pub skills_base: [i32; SKILL_COUNT],
    pub skills_current: [i32; SKILL_COUNT],
    pub hp_base: i32,
    pub hp_current: i32,
    pub stamina_base: i32,
    pub stamina_current: i32,
    pub mana_base: [i32; REALM_COUNT],
    pub mana_current: [i32; REALM_COUNT],
    pub ac_base: i32,
    pub ac_mod: i32,
    pub hp_recovery: i32,
    pub stamina_recovery: i32,
    pub sp_recovery: i32,
    pub damage_absorption: i32,
    pub magic_resist: [i32; REALM_COUNT],
    pub carry_capacity_tenths: i32,
    pub personal_load_tenths: i32,
    pub encumbrance: i32,
    pub conditions: [i32; CONDITION_COUNT],
    pub equipment: [ItemSlot; EQUIP_SLOT_COUNT],
    pub carried: [ItemSlot; CARRY_SLOT_COUNT],
}

impl CharacterData {
    pub fn parse(blob: &[u8]) -> io::Result<Self> {
        if blob.len() != CHARACTER_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "character record must be {CHARACTER_RECORD_SIZE} bytes, got {}",
                    blob.len()
                ),
            ));
        }

        let mut r = LittleEndianReader::new(Cursor::new(blob));

        let in_use = r.read_u32()? != 0;
        let name = r.read_utf16_string(NAME_CAPACITY_UNITS)?;

        let gender_raw = r.read_i32()?;
        let gender = Gender::from_raw(gender_raw);
        if matches!(gender, Gender::Unknown(_)) {
            warn!("character {name:?}: unknown gender value {gender_raw}, keeping raw");
        }

        let race_raw = r.read_i32()?;
        let race = Race::from_raw(race_raw).unwrap_or_else(|| {
            warn!(
                "character {name:?}: invalid race {race_raw}, falling back to {}",
                Race::DEFAULT.as_str()
            );
            Race::DEFAULT
        });

        let profession_raw = r.read_i32()?;
        let profession = Profession::from_raw(profession_raw).unwrap_or_else(|| {
            warn!(
                "character {name:?}: invalid profession {profession_raw}, falling back to {}",
                Profession::DEFAULT.as_str()
            );
            Profession::DEFAULT
        });

        let portrait = r.read_i32()?;
        let personality = r.read_i32()?;
        let voice = r.read_i32()?;
        let level = r.read_i32()?;
        let experience = r.read_i32()?;
        let unspent_points = r.read_i32()?;

        let attributes_base = r.read_i32_array::<ATTRIBUTE_COUNT>()?;
        let attributes_current = r.read_i32_array::<ATTRIBUTE_COUNT>()?;
        let skills_base = r.read_i32_array::<SKILL_COUNT>()?;
        let skills_current = r.read_i32_array::<SKILL_COUNT>()?;

        let hp_base = r.read_i32()?;
        let hp_current = r.read_i32()?;
        let stamina_base = r.read_i32()?;
        let stamina_current = r.read_i32()?;
        let mana_base = r.read_i32_array::<REALM_COUNT>()?;
        let mana_current = r.read_i32_array::<REALM_COUNT>()?;

        let ac_base = r.read_i32()?;
        let ac_mod = r.read_i32()?;
        let hp_recovery = r.read_i32()?;
        let stamina_recovery = r.read_i32()?;
        let sp_recovery = r.read_i32()?;
        let damage_absorption = r.read_i32()?;
        let magic_resist = r.read_i32_array::<REALM_COUNT>()?;
        let carry_capacity_tenths = r.read_i32()?;
        let personal_load_tenths = r.read_i32()?;
        let encumbrance = r.read_i32()?;

        let mut conditions = r.read_i32_array::<CONDITION_COUNT>()?;
        for (index, duration) in conditions.iter_mut().enumerate() {
            if condition_is_permanent_only(index) && *duration > 0 {
                warn!(
                    "character {name:?}: timed duration {duration} for permanent-only condition index {index}, treating as permanent"
                );
                *duration = CONDITION_DURATION_PERMANENT;
            }
        }

        let equipment = parse_item_slots::<_, EQUIP_SLOT_COUNT>(&mut r)?;
        let carried = parse_item_slots::<_, CARRY_SLOT_COUNT>(&mut r)?;

        Ok(Self {
            in_use,
            name,
            gender,
            race_raw,
            race,
            profession_raw,
            profession,
            portrait,
            personality,
            voice,
            level,
            experience,
            unspent_points,
            attributes_base,
            attributes_current,
            skills_base,
            skills_current,
            hp_base,
            hp_current,
            stamina_base,
            stamina_current,
            mana_base,
            mana_current,
            ac_base,
            ac_mod,
            hp_recovery,
            stamina_recovery,
            sp_recovery,
            damage_absorption,
            magic_resist,
            carry_capacity_tenths,
            personal_load_tenths,
            encumbrance,
            conditions,
            equipment,
            carried,
        })
    }

    pub fn condition_duration(&self, index: usize) -> Option<i32> {
        self.conditions.get(index).copied()
    }

    pub fn active_conditions(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.conditions
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d != 0)
            .map(|(i, &d)| (i, d))
    }

    pub fn item_slots(&self) -> impl Iterator<Item = &ItemSlot> {
        self.equipment.iter().chain(self.carried.iter())
    }
}

fn parse_item_slots<R: Read + Seek, const N: usize>(
    r: &mut LittleEndianReader<R>,
) -> io::Result<[ItemSlot; N]> {
    let mut slots = [ItemSlot::EMPTY; N];
    for slot in &mut slots {
        let id = r.read_i32()?;
        let count = r.read_i32()?;
        let charges = r.read_i32()?;
        let flags = r.read_u32()?;
        *slot = ItemSlot {
            id,
            count,
            charges,
            flags,
        };
    }
    Ok(slots)
}

/// Byte offset of an item slot within the record.
pub fn item_slot_offset(equipped: bool, slot: usize) -> usize {
    let base = if equipped { EQUIPMENT_OFFSET } else { CARRIED_OFFSET };
    base + slot * ITEM_SLOT_WIDTH
}

#[cfg(test)]
mod tests {
    use super::{CharacterData, CONDITIONS_OFFSET, GENDER_OFFSET, PROFESSION_OFFSET, RACE_OFFSET};
    use crate::gender::Gender;
    use crate::save::types::{CHARACTER_RECORD_SIZE, COND_DEAD, Profession, Race};

    fn blank_record() -> Vec<u8> {
        let mut blob = vec![0u8; CHARACTER_RECORD_SIZE];
        // Mark in use and give it a name so warnings are attributable.
        blob[0] = 1;
        for (i, u) in "Vi".encode_utf16().enumerate() {
            blob[4 + i * 2..6 + i * 2].copy_from_slice(&u.to_le_bytes());
        }
        blob
    }

    #[test]
    fn rejects_wrong_record_length() {
        assert!(CharacterData::parse(&[0u8; 16]).is_err());
    }

    #[test]
    fn invalid_enums_fall_back_but_keep_raw() {
        let mut blob = blank_record();
        blob[GENDER_OFFSET..GENDER_OFFSET + 4].copy_from_slice(&7i32.to_le_bytes());
        blob[RACE_OFFSET..RACE_OFFSET + 4].copy_from_slice(&99i32.to_le_bytes());
        blob[PROFESSION_OFFSET..PROFESSION_OFFSET + 4].copy_from_slice(&(-3i32).to_le_bytes());

        let data = CharacterData::parse(&blob).unwrap();
        assert_eq!(data.gender, Gender::Unknown(7));
        assert_eq!(data.race, Race::Human);
        assert_eq!(data.race_raw, 99);
        assert_eq!(data.profession, Profession::Fighter);
        assert_eq!(data.profession_raw, -3);
        assert_eq!(data.name, "Vi");
    }

    #[test]
    fn permanent_only_conditions_normalize_timed_durations() {
        let mut blob = blank_record();
        let dead = CONDITIONS_OFFSET + COND_DEAD * 4;
        blob[dead..dead + 4].copy_from_slice(&5i32.to_le_bytes());

        let data = CharacterData::parse(&blob).unwrap();
        assert_eq!(data.conditions[COND_DEAD], -1);
    }
}
