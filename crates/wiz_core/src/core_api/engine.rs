use std::io::Cursor;

use crate::gender::Gender;
use crate::riff::MagicVariant;
use crate::save::character::ItemSlot;
use crate::save::items::item_name;
use crate::save::types::{
    ATTRIBUTE_NAMES, CONDITION_NAMES, Profession, REALM_NAMES, Race, SKILL_NAMES,
};
use crate::save::Document;

use super::error::{CoreError, CoreErrorCode};
use super::types::{
    AttributeEntry, Capabilities, CharacterSummary, ConditionEntry, ItemEntry, LoadSummary,
    PoolEntry, ResistanceEntry, SaveVariant, SkillEntry, Snapshot,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

#[derive(Debug)]
pub struct Session {
    snapshot: Snapshot,
    capabilities: Capabilities,
    document: Document,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let document = Document::parse_with_layout(Cursor::new(bytes.as_ref())).map_err(|e| {
            CoreError::new(CoreErrorCode::Parse, format!("failed to parse save: {e}"))
        })?;

        let snapshot = build_snapshot(&document)?;

        Ok(Session {
            snapshot,
            capabilities: Capabilities::editable(Vec::new()),
            document,
        })
    }
}

impl Session {
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn character_count(&self) -> usize {
        self.document.save.characters.len()
    }

    pub fn attributes(&self, index: usize) -> Result<Vec<AttributeEntry>, CoreError> {
        let data = self.character(index)?;
        Ok(ATTRIBUTE_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| AttributeEntry {
                index: i,
                name: (*name).to_string(),
                base: data.attributes_base[i],
                current: data.attributes_current[i],
            })
            .collect())
    }

    pub fn skills(&self, index: usize) -> Result<Vec<SkillEntry>, CoreError> {
        let data = self.character(index)?;
        Ok(SKILL_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| SkillEntry {
                index: i,
                name: (*name).to_string(),
                base: data.skills_base[i],
                current: data.skills_current[i],
            })
            .collect())
    }

    pub fn nonzero_skills(&self, index: usize) -> Result<Vec<SkillEntry>, CoreError> {
        Ok(self
            .skills(index)?
            .into_iter()
            .filter(|entry| entry.base > 0 || entry.current > 0)
            .collect())
    }

    pub fn pools(&self, index: usize) -> Result<Vec<PoolEntry>, CoreError> {
        let data = self.character(index)?;
        let mut out = vec![
            PoolEntry {
                name: "Hit Points".to_string(),
                current: data.hp_current,
                base: data.hp_base,
            },
            PoolEntry {
                name: "Stamina".to_string(),
                current: data.stamina_current,
                base: data.stamina_base,
            },
        ];
        for (realm, name) in REALM_NAMES.iter().enumerate() {
            out.push(PoolEntry {
                name: format!("{name} Mana"),
                current: data.mana_current[realm],
                base: data.mana_base[realm],
            });
        }
        Ok(out)
    }

    pub fn resistances(&self, index: usize) -> Result<Vec<ResistanceEntry>, CoreError> {
        let data = self.character(index)?;
        Ok(REALM_NAMES
            .iter()
            .enumerate()
            .map(|(realm, name)| ResistanceEntry {
                realm,
                name: (*name).to_string(),
                value: data.magic_resist[realm],
            })
            .collect())
    }

    pub fn active_conditions(&self, index: usize) -> Result<Vec<ConditionEntry>, CoreError> {
        let data = self.character(index)?;
        Ok(data
            .active_conditions()
            .map(|(i, duration)| ConditionEntry {
                index: i,
                name: CONDITION_NAMES[i].to_string(),
                duration,
            })
            .collect())
    }

    pub fn items(&self, index: usize) -> Result<Vec<ItemEntry>, CoreError> {
        let data = self.character(index)?;
        let mut out = Vec::new();
        for (slot, item) in data.equipment.iter().enumerate() {
            push_item_entry(&mut out, slot, true, item);
        }
        for (slot, item) in data.carried.iter().enumerate() {
            push_item_entry(&mut out, slot, false, item);
        }
        Ok(out)
    }

    pub fn load_summary(&self, index: usize) -> Result<LoadSummary, CoreError> {
        let data = self.character(index)?;
        Ok(LoadSummary {
            carry_capacity_tenths: data.carry_capacity_tenths,
            personal_load_tenths: data.personal_load_tenths,
            encumbrance: data.encumbrance,
        })
    }

    pub fn armor_class(&self, index: usize) -> Result<(i32, i32), CoreError> {
        let data = self.character(index)?;
        Ok((data.ac_base, data.ac_mod))
    }

    pub fn to_bytes_unmodified(&self) -> Result<Vec<u8>, CoreError> {
        self.document.to_bytes_unmodified().map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to emit unmodified bytes: {e}"),
            )
        })
    }

    pub fn to_bytes_modified(&self) -> Result<Vec<u8>, CoreError> {
        self.document.to_bytes_modified().map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to emit modified bytes: {e}"),
            )
        })
    }

    // --- Edits ---

    pub fn set_gold(&mut self, gold: i32) -> Result<(), CoreError> {
        self.apply("set gold", |doc| doc.set_gold(gold))
    }

    pub fn set_game_time_minutes(&mut self, minutes: u32) -> Result<(), CoreError> {
        self.apply("set game time", |doc| doc.set_game_time_minutes(minutes))
    }

    pub fn set_level_name(&mut self, name: &str) -> Result<(), CoreError> {
        self.apply("set level name", |doc| doc.set_level_name(name))
    }

    pub fn set_character_name(&mut self, index: usize, name: &str) -> Result<(), CoreError> {
        self.apply("set name", |doc| doc.set_character_name(index, name))
    }

    pub fn set_gender(&mut self, index: usize, gender: Gender) -> Result<(), CoreError> {
        self.apply("set gender", |doc| doc.set_gender(index, gender))
    }

    pub fn set_race(&mut self, index: usize, race: Race) -> Result<(), CoreError> {
        self.apply("set race", |doc| doc.set_race(index, race))
    }

    pub fn set_profession(&mut self, index: usize, profession: Profession) -> Result<(), CoreError> {
        self.apply("set profession", |doc| doc.set_profession(index, profession))
    }

    pub fn set_level(&mut self, index: usize, level: i32) -> Result<(), CoreError> {
        self.apply("set level", |doc| doc.set_level(index, level))
    }

    pub fn set_experience(&mut self, index: usize, experience: i32) -> Result<(), CoreError> {
        self.apply("set experience", |doc| doc.set_experience(index, experience))
    }

    pub fn set_attribute_base(
        &mut self,
        index: usize,
        attribute: usize,
        value: i32,
    ) -> Result<(), CoreError> {
        self.apply("set attribute", |doc| {
            doc.set_attribute_base(index, attribute, value)
        })
    }

    pub fn set_skill_base(&mut self, index: usize, skill: usize, value: i32) -> Result<(), CoreError> {
        self.apply("set skill", |doc| doc.set_skill_base(index, skill, value))
    }

    pub fn set_hp_current(&mut self, index: usize, hp: i32) -> Result<(), CoreError> {
        self.apply("set hp", |doc| doc.set_hp_current(index, hp))
    }

    pub fn set_stamina_current(&mut self, index: usize, stamina: i32) -> Result<(), CoreError> {
        self.apply("set stamina", |doc| doc.set_stamina_current(index, stamina))
    }

    pub fn set_mana_current(&mut self, index: usize, realm: usize, mana: i32) -> Result<(), CoreError> {
        self.apply("set mana", |doc| doc.set_mana_current(index, realm, mana))
    }

    pub fn set_condition(
        &mut self,
        index: usize,
        condition: usize,
        duration: i32,
    ) -> Result<(), CoreError> {
        self.apply("set condition", |doc| {
            doc.set_condition(index, condition, duration)
        })
    }

    pub fn set_item(
        &mut self,
        index: usize,
        equipped: bool,
        slot: usize,
        item: ItemSlot,
    ) -> Result<(), CoreError> {
        self.apply("set item", |doc| doc.set_item(index, equipped, slot, item))
    }

    pub fn clear_item(&mut self, index: usize, equipped: bool, slot: usize) -> Result<(), CoreError> {
        self.apply("clear item", |doc| doc.clear_item(index, equipped, slot))
    }

    // --- Internals ---

    fn character(&self, index: usize) -> Result<&crate::save::character::CharacterData, CoreError> {
        self.document.save.characters.get(index).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::InvalidArgument,
                format!(
                    "invalid character index {index}, expected 0..{}",
                    self.document.save.characters.len()
                ),
            )
        })
    }

    fn apply<F>(&mut self, action: &str, edit: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut Document) -> std::io::Result<()>,
    {
        edit(&mut self.document).map_err(|e| {
            let code = if e.kind() == std::io::ErrorKind::InvalidInput {
                CoreErrorCode::InvalidArgument
            } else {
                CoreErrorCode::UnsupportedOperation
            };
            CoreError::new(code, format!("failed to {action}: {e}"))
        })?;

        self.snapshot = build_snapshot(&self.document)?;
        Ok(())
    }
}

fn push_item_entry(out: &mut Vec<ItemEntry>, slot: usize, equipped: bool, item: &ItemSlot) {
    if item.is_empty() {
        return;
    }
    out.push(ItemEntry {
        slot,
        equipped,
        id: item.id,
        name: item_name(item.id).map(str::to_string),
        count: item.count,
        charges: item.charges,
        identified: item.is_identified(),
    });
}

fn build_snapshot(document: &Document) -> Result<Snapshot, CoreError> {
    let save = &document.save;
    let level_tags = document.level_tags().map_err(|e| {
        CoreError::new(CoreErrorCode::Parse, format!("bad level directory: {e}"))
    })?;

    let characters = save
        .characters
        .iter()
        .zip(save.extras.iter())
        .enumerate()
        .filter(|(_, (data, _))| data.in_use)
        .map(|(index, (data, extra))| CharacterSummary {
            index,
            name: data.name.clone(),
            gender: data.gender,
            race: data.race.as_str().to_string(),
            profession: data.profession.as_str().to_string(),
            level: data.level,
            experience: data.experience,
            hp_current: data.hp_current,
            hp_base: data.hp_base,
            in_party: extra.in_party,
            is_rpc: extra.is_rpc(),
        })
        .collect();

    Ok(Snapshot {
        variant: match save.magic {
            MagicVariant::Riff => SaveVariant::Riff,
            MagicVariant::Wiz8 => SaveVariant::Wiz8,
        },
        gold: save.party.gold,
        level_name: save.party.level_name.clone(),
        game_time_minutes: save.party.game_time_minutes,
        position: save.party.position,
        heading: save.party.heading,
        member_count: save.party.member_count,
        characters,
        level_tags,
    })
}
