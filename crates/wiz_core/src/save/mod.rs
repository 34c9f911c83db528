pub mod character;
pub mod extra;
pub mod items;
pub mod party;
pub mod stats;
pub mod types;

use std::io::{self, Cursor, Read, Seek};

use log::warn;

use crate::gender::Gender;
use crate::reader::LittleEndianReader;
use crate::riff::{MagicVariant, RiffFile, TAG_LEVELS, TAG_PARTY_STATE};

use character::{CharacterData, ItemSlot};
use extra::CharacterExtraData;
use party::PartyData;
use types::{
    ATTRIBUTE_COUNT, ATTRIBUTE_MAX, ATTRIBUTE_MIN, CHARACTER_EXTRA_RECORD_SIZE,
    CHARACTER_RECORD_SIZE, CONDITION_COUNT, CONDITION_DURATION_PERMANENT, CARRY_SLOT_COUNT,
    EQUIP_SLOT_COUNT, MAX_LEVEL, NAME_CAPACITY_UNITS, PARTY_RECORD_SIZE, PARTY_SLOT_COUNT,
    Profession, REALM_COUNT, Race, SKILL_COUNT, SKILL_MAX, condition_is_permanent_only,
};

const I32_WIDTH: usize = 4;

#[derive(Debug)]
pub struct SaveGame {
    pub magic: MagicVariant,
    pub party: PartyData,
    pub characters: Vec<CharacterData>,
    pub extras: Vec<CharacterExtraData>,
}

impl SaveGame {
    pub fn parse<R: Read + Seek>(reader: R) -> io::Result<Self> {
        let riff = RiffFile::parse(reader)?;
        let records = split_gsta(gsta_payload(&riff)?)?;
        Ok(Self {
            magic: riff.magic(),
            party: PartyData::parse(&records.party)?,
            characters: parse_characters(&records.characters)?,
            extras: parse_extras(&records.extras)?,
        })
    }
}

/// Editable save document. The container and every record blob are
/// retained so unedited bytes round-trip verbatim; setters overwrite only
/// the known offsets of the fields they change.
#[derive(Debug)]
pub struct Document {
    pub save: SaveGame,
    riff: RiffFile,
    original_riff: RiffFile,
    party_blob: Vec<u8>,
    character_blobs: Vec<Vec<u8>>,
    extra_blobs: Vec<Vec<u8>>,
    gsta_tail: Vec<u8>,
}

struct GstaRecords {
    party: Vec<u8>,
    characters: Vec<Vec<u8>>,
    extras: Vec<Vec<u8>>,
    tail: Vec<u8>,
}

impl Document {
    pub fn parse_with_layout<R: Read + Seek>(reader: R) -> io::Result<Self> {
        let riff = RiffFile::parse(reader)?;
        let records = split_gsta(gsta_payload(&riff)?)?;

        let save = SaveGame {
            magic: riff.magic(),
            party: PartyData::parse(&records.party)?,
            characters: parse_characters(&records.characters)?,
            extras: parse_extras(&records.extras)?,
        };

        Ok(Self {
            save,
            original_riff: riff.clone(),
            riff,
            party_blob: records.party,
            character_blobs: records.characters,
            extra_blobs: records.extras,
            gsta_tail: records.tail,
        })
    }

    pub fn magic(&self) -> MagicVariant {
        self.riff.magic()
    }

    pub fn supports_editing(&self) -> bool {
        true
    }

    /// Tags of the per-level sub-chunks nested in the `LVLS` directory.
    pub fn level_tags(&self) -> io::Result<Vec<String>> {
        match self.riff.chunk(TAG_LEVELS) {
            Some(chunk) => Ok(chunk
                .sub_chunks()?
                .iter()
                .map(|sub| sub.tag().to_string())
                .collect()),
            None => Ok(Vec::new()),
        }
    }

    pub fn to_bytes_unmodified(&self) -> io::Result<Vec<u8>> {
        self.original_riff.to_bytes()
    }

    pub fn to_bytes_modified(&self) -> io::Result<Vec<u8>> {
        let mut riff = self.riff.clone();
        let payload = build_gsta(
            &self.party_blob,
            &self.character_blobs,
            &self.extra_blobs,
            &self.gsta_tail,
        )?;
        let chunk = riff.chunk_mut(TAG_PARTY_STATE).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("missing {TAG_PARTY_STATE} chunk"),
            )
        })?;
        chunk.set_payload(payload);
        riff.to_bytes()
    }

    // --- Party setters ---

    pub fn set_gold(&mut self, gold: i32) -> io::Result<()> {
        if gold < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid gold amount {gold}, expected >= 0"),
            ));
        }
        patch_i32_in_blob(&mut self.party_blob, party::GOLD_OFFSET, gold, "party record", "gold")?;
        self.save.party.gold = gold;
        Ok(())
    }

    pub fn set_game_time_minutes(&mut self, minutes: u32) -> io::Result<()> {
        patch_i32_in_blob(
            &mut self.party_blob,
            party::GAME_TIME_OFFSET,
            minutes as i32,
            "party record",
            "game time",
        )?;
        self.save.party.game_time_minutes = minutes;
        Ok(())
    }

    pub fn set_level_name(&mut self, name: &str) -> io::Result<()> {
        patch_utf16_in_blob(
            &mut self.party_blob,
            party::LEVEL_NAME_OFFSET,
            NAME_CAPACITY_UNITS,
            name,
            "party record",
            "level name",
        )?;
        self.save.party.level_name = name.to_string();
        Ok(())
    }

    // --- Character setters ---

    pub fn set_character_name(&mut self, index: usize, name: &str) -> io::Result<()> {
        self.check_character(index)?;
        patch_utf16_in_blob(
            &mut self.character_blobs[index],
            character::NAME_OFFSET,
            NAME_CAPACITY_UNITS,
            name,
            "character record",
            "name",
        )?;
        self.save.characters[index].name = name.to_string();
        Ok(())
    }

    pub fn set_gender(&mut self, index: usize, gender: Gender) -> io::Result<()> {
        self.check_character(index)?;
        let raw = gender.raw();
        patch_i32_in_blob(
            &mut self.character_blobs[index],
            character::GENDER_OFFSET,
            raw,
            "character record",
            "gender",
        )?;
        self.save.characters[index].gender = Gender::from_raw(raw);
        Ok(())
    }

    pub fn set_race(&mut self, index: usize, race: Race) -> io::Result<()> {
        self.check_character(index)?;
        patch_i32_in_blob(
            &mut self.character_blobs[index],
            character::RACE_OFFSET,
            race.raw(),
            "character record",
            "race",
        )?;
        let data = &mut self.save.characters[index];
        data.race = race;
        data.race_raw = race.raw();
        self.recompute(index)
    }

    pub fn set_profession(&mut self, index: usize, profession: Profession) -> io::Result<()> {
        self.check_character(index)?;
        patch_i32_in_blob(
            &mut self.character_blobs[index],
            character::PROFESSION_OFFSET,
            profession.raw(),
            "character record",
            "profession",
        )?;
        let data = &mut self.save.characters[index];
        data.profession = profession;
        data.profession_raw = profession.raw();
        self.recompute(index)
    }

    pub fn set_level(&mut self, index: usize, level: i32) -> io::Result<()> {
        self.check_character(index)?;
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid level {level}, expected 1..={MAX_LEVEL}"),
            ));
        }
        patch_i32_in_blob(
            &mut self.character_blobs[index],
            character::LEVEL_OFFSET,
            level,
            "character record",
            "level",
        )?;
        self.save.characters[index].level = level;
        self.recompute(index)
    }

    pub fn set_experience(&mut self, index: usize, experience: i32) -> io::Result<()> {
        self.check_character(index)?;
        if experience < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid experience {experience}, expected >= 0"),
            ));
        }
        patch_i32_in_blob(
            &mut self.character_blobs[index],
            character::EXPERIENCE_OFFSET,
            experience,
            "character record",
            "experience",
        )?;
        self.save.characters[index].experience = experience;
        Ok(())
    }

    pub fn set_unspent_points(&mut self, index: usize, points: i32) -> io::Result<()> {
        self.check_character(index)?;
        if points < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid unspent points {points}, expected >= 0"),
            ));
        }
        patch_i32_in_blob(
            &mut self.character_blobs[index],
            character::UNSPENT_POINTS_OFFSET,
            points,
            "character record",
            "unspent points",
        )?;
        self.save.characters[index].unspent_points = points;
        Ok(())
    }

    pub fn set_attribute_base(&mut self, index: usize, attribute: usize, value: i32) -> io::Result<()> {
        self.check_character(index)?;
        if attribute >= ATTRIBUTE_COUNT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid attribute index {attribute}, expected 0..{ATTRIBUTE_COUNT}"),
            ));
        }
        if !(ATTRIBUTE_MIN..=ATTRIBUTE_MAX).contains(&value) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid attribute value {value}, expected {ATTRIBUTE_MIN}..={ATTRIBUTE_MAX}"),
            ));
        }
        patch_i32_in_blob(
            &mut self.character_blobs[index],
            character::ATTRIBUTES_BASE_OFFSET + attribute * I32_WIDTH,
            value,
            "character record",
            "attribute base",
        )?;
        self.save.characters[index].attributes_base[attribute] = value;
        self.recompute(index)
    }

    pub fn set_skill_base(&mut self, index: usize, skill: usize, value: i32) -> io::Result<()> {
        self.check_character(index)?;
        if skill >= SKILL_COUNT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid skill index {skill}, expected 0..{SKILL_COUNT}"),
            ));
        }
        if !(0..=SKILL_MAX).contains(&value) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid skill value {value}, expected 0..={SKILL_MAX}"),
            ));
        }
        patch_i32_in_blob(
            &mut self.character_blobs[index],
            character::SKILLS_BASE_OFFSET + skill * I32_WIDTH,
            value,
            "character record",
            "skill base",
        )?;
        self.save.characters[index].skills_base[skill] = value;
        self.recompute(index)
    }

    pub fn set_hp_current(&mut self, index: usize, hp: i32) -> io::Result<()> {
        self.check_character(index)?;
        if hp < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid hp {hp}, expected >= 0"),
            ));
        }
        self.save.characters[index].hp_current = hp;
        // The cascade clamps to the freshly computed base and writes back.
        self.recompute(index)
    }

    pub fn set_stamina_current(&mut self, index: usize, stamina: i32) -> io::Result<()> {
        self.check_character(index)?;
        if stamina < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid stamina {stamina}, expected >= 0"),
            ));
        }
        self.save.characters[index].stamina_current = stamina;
        self.recompute(index)
    }

    pub fn set_mana_current(&mut self, index: usize, realm: usize, mana: i32) -> io::Result<()> {
        self.check_character(index)?;
        if realm >= REALM_COUNT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid realm index {realm}, expected 0..{REALM_COUNT}"),
            ));
        }
        if mana < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid mana {mana}, expected >= 0"),
            ));
        }
        self.save.characters[index].mana_current[realm] = mana;
        self.recompute(index)
    }

    pub fn set_condition(&mut self, index: usize, condition: usize, duration: i32) -> io::Result<()> {
        self.check_character(index)?;
        if condition >= CONDITION_COUNT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid condition index {condition}, expected 0..{CONDITION_COUNT}"),
            ));
        }
        if duration < CONDITION_DURATION_PERMANENT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid condition duration {duration}, expected >= -1"),
            ));
        }

        let mut duration = duration;
        if condition_is_permanent_only(condition) && duration > 0 {
            warn!(
                "condition {:?} is permanent-only, storing duration as permanent",
                types::CONDITION_NAMES[condition]
            );
            duration = CONDITION_DURATION_PERMANENT;
        }

        patch_i32_in_blob(
            &mut self.character_blobs[index],
            character::CONDITIONS_OFFSET + condition * I32_WIDTH,
            duration,
            "character record",
            "condition duration",
        )?;
        self.save.characters[index].conditions[condition] = duration;
        self.recompute(index)
    }

    pub fn set_item(
        &mut self,
        index: usize,
        equipped: bool,
        slot: usize,
        item: ItemSlot,
    ) -> io::Result<()> {
        self.check_character(index)?;
        self.check_item_slot(equipped, slot)?;
        if item.count < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid item count {}, expected >= 0", item.count),
            ));
        }

        self.patch_item_slot(index, equipped, slot, item)?;
        let data = &mut self.save.characters[index];
        if equipped {
            data.equipment[slot] = item;
        } else {
            data.carried[slot] = item;
        }
        self.recompute(index)
    }

    pub fn clear_item(&mut self, index: usize, equipped: bool, slot: usize) -> io::Result<()> {
        self.check_character(index)?;
        self.check_item_slot(equipped, slot)?;
        self.patch_item_slot(index, equipped, slot, ItemSlot::EMPTY)?;
        let data = &mut self.save.characters[index];
        if equipped {
            data.equipment[slot] = ItemSlot::EMPTY;
        } else {
            data.carried[slot] = ItemSlot::EMPTY;
        }
        self.recompute(index)
    }

    // --- Internals ---

    fn check_character(&self, index: usize) -> io::Result<()> {
        if index >= self.save.characters.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "invalid character index {index}, expected 0..{}",
                    self.save.characters.len()
                ),
            ));
        }
        if !self.save.characters[index].in_use {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("character slot {index} is empty"),
            ));
        }
        Ok(())
    }

    fn check_item_slot(&self, equipped: bool, slot: usize) -> io::Result<()> {
        let limit = if equipped { EQUIP_SLOT_COUNT } else { CARRY_SLOT_COUNT };
        if slot >= limit {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid item slot {slot}, expected 0..{limit}"),
            ));
        }
        Ok(())
    }

    fn patch_item_slot(
        &mut self,
        index: usize,
        equipped: bool,
        slot: usize,
        item: ItemSlot,
    ) -> io::Result<()> {
        let base = character::item_slot_offset(equipped, slot);
        let blob = &mut self.character_blobs[index];
        patch_i32_in_blob(blob, base + character::ITEM_ID_OFFSET, item.id, "character record", "item id")?;
        patch_i32_in_blob(blob, base + character::ITEM_COUNT_OFFSET, item.count, "character record", "item count")?;
        patch_i32_in_blob(blob, base + character::ITEM_CHARGES_OFFSET, item.charges, "character record", "item charges")?;
        patch_i32_in_blob(
            blob,
            base + character::ITEM_FLAGS_OFFSET,
            item.flags as i32,
            "character record",
            "item flags",
        )
    }

    fn recompute(&mut self, index: usize) -> io::Result<()> {
        stats::recompute_character(
            &mut self.save.characters[index],
            &mut self.character_blobs[index],
        )
    }
}

fn gsta_payload(riff: &RiffFile) -> io::Result<&[u8]> {
    riff.chunk(TAG_PARTY_STATE)
        .map(|chunk| chunk.payload())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("missing {TAG_PARTY_STATE} chunk"),
            )
        })
}

fn split_gsta(payload: &[u8]) -> io::Result<GstaRecords> {
    let mut r = LittleEndianReader::new(Cursor::new(payload));

    let party = read_sized_record(&mut r, PARTY_RECORD_SIZE, "party")?;

    let mut characters = Vec::with_capacity(PARTY_SLOT_COUNT);
    for slot in 0..PARTY_SLOT_COUNT {
        characters.push(read_sized_record(
            &mut r,
            CHARACTER_RECORD_SIZE,
            &format!("character {slot}"),
        )?);
    }

    let mut extras = Vec::with_capacity(PARTY_SLOT_COUNT);
    for slot in 0..PARTY_SLOT_COUNT {
        extras.push(read_sized_record(
            &mut r,
            CHARACTER_EXTRA_RECORD_SIZE,
            &format!("character-extra {slot}"),
        )?);
    }

    let consumed = r.position()? as usize;
    let tail = payload[consumed..].to_vec();

    Ok(GstaRecords {
        party,
        characters,
        extras,
        tail,
    })
}

fn read_sized_record<R: Read + Seek>(
    r: &mut LittleEndianReader<R>,
    expected: usize,
    label: &str,
) -> io::Result<Vec<u8>> {
    let size = r.read_u32()? as usize;
    if size != expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{label} record size prefix {size:#X}, expected {expected:#X}"),
        ));
    }
    r.read_bytes(size)
}

fn build_gsta(
    party: &[u8],
    characters: &[Vec<u8>],
    extras: &[Vec<u8>],
    tail: &[u8],
) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    emit_sized_record(&mut out, party, PARTY_RECORD_SIZE, "party")?;
    for (slot, blob) in characters.iter().enumerate() {
        emit_sized_record(&mut out, blob, CHARACTER_RECORD_SIZE, &format!("character {slot}"))?;
    }
    for (slot, blob) in extras.iter().enumerate() {
        emit_sized_record(
            &mut out,
            blob,
            CHARACTER_EXTRA_RECORD_SIZE,
            &format!("character-extra {slot}"),
        )?;
    }
    out.extend_from_slice(tail);
    Ok(out)
}

fn emit_sized_record(
    out: &mut Vec<u8>,
    blob: &[u8],
    expected: usize,
    label: &str,
) -> io::Result<()> {
    if blob.len() != expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "{label} record drifted to {} bytes, expected {expected:#X}",
                blob.len()
            ),
        ));
    }
    out.extend_from_slice(&(expected as u32).to_le_bytes());
    out.extend_from_slice(blob);
    Ok(())
}

fn parse_characters(blobs: &[Vec<u8>]) -> io::Result<Vec<CharacterData>> {
    blobs.iter().map(|blob| CharacterData::parse(blob)).collect()
}

fn parse_extras(blobs: &[Vec<u8>]) -> io::Result<Vec<CharacterExtraData>> {
    blobs.iter().map(|blob| CharacterExtraData::parse(blob)).collect()
}

pub(crate) fn patch_i32_in_blob(
    blob: &mut [u8],
    offset: usize,
    raw: i32,
    record_label: &str,
    field_label: &str,
) -> io::Result<()> {
    if blob.len() < offset + I32_WIDTH {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "{record_label} too short for {field_label} patch: len={}, need at least {}",
                blob.len(),
                offset + I32_WIDTH
            ),
        ));
    }

    blob[offset..offset + I32_WIDTH].copy_from_slice(&raw.to_le_bytes());
    Ok(())
}

fn patch_utf16_in_blob(
    blob: &mut [u8],
    offset: usize,
    capacity_units: usize,
    value: &str,
    record_label: &str,
    field_label: &str,
) -> io::Result<()> {
    let units: Vec<u16> = value.encode_utf16().collect();
    if units.len() >= capacity_units {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{field_label} {value:?} needs {} UTF-16 units, capacity is {} plus terminator",
                units.len(),
                capacity_units - 1
            ),
        ));
    }

    let width = capacity_units * 2;
    if blob.len() < offset + width {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "{record_label} too short for {field_label} patch: len={}, need at least {}",
                blob.len(),
                offset + width
            ),
        ));
    }

    let field = &mut blob[offset..offset + width];
    field.fill(0);
    for (i, unit) in units.iter().enumerate() {
        field[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
    }
    Ok(())
}
