//! Derived-stat recompute cascade.
//!
//! Stage order is load-bearing: each stage reads the "current" values the
//! stages before it just wrote. Controlling attributes feed skills, both
//! feed pools, pools and skills feed AC/recovery/absorption/resistance,
//! and carry capacity must exist before personal load can grade
//! encumbrance.

use std::io;

use super::character::{CharacterData, ItemSlot};
use super::items::{item_absorption, item_ac, item_weight_tenths};
use super::types::{
    ATTR_INTELLIGENCE, ATTR_NONE, ATTR_PIETY, ATTR_STRENGTH, ATTR_VITALITY, ATTRIBUTE_COUNT,
    ATTRIBUTE_MAX, ATTRIBUTE_MIN, COND_ASLEEP, COND_DEAD, COND_DISEASED, COND_DRAINED,
    COND_INSANE, COND_KNOCKED_OUT, COND_NAUSEATED, COND_PARALYZED, COND_UNCONSCIOUS, COND_WEBBED,
    CastingKind, Profession, REALM_COUNT, REALM_SKILL_BASE, RESIST_MAX, SKILL_CONTROLLERS,
    SKILL_COUNT, SKILL_IRON_SKIN, SKILL_IRON_WILL, SKILL_MAX, SKILL_REFLEXION,
};
use super::{character, patch_i32_in_blob};

/// Mental realm index within resistance arrays.
const REALM_MENTAL: usize = 4;

pub fn recompute_character(data: &mut CharacterData, blob: &mut [u8]) -> io::Result<()> {
    recompute_controlling_attributes(data);
    recompute_hp_stamina(data);
    recompute_mana_pools(data);
    recompute_ac_mod(data);
    recompute_recovery_rates(data);
    recompute_absorption(data);
    recompute_magic_resistance(data);
    recompute_carry_capacity(data);
    recompute_personal_load(data);
    patch_derived(data, blob)
}

// --- Stage 1: controlling attributes (attribute currents, then skill currents) ---

fn recompute_controlling_attributes(data: &mut CharacterData) {
    for index in 0..ATTRIBUTE_COUNT {
        let mut value = data.attributes_base[index];
        if data.conditions[COND_DRAINED] != 0 {
            value -= 10;
        }
        if index == ATTR_VITALITY && data.conditions[COND_DISEASED] != 0 {
            value -= 15;
        }
        if index == ATTR_STRENGTH && data.conditions[COND_NAUSEATED] != 0 {
            value -= 5;
        }
        data.attributes_current[index] = value.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX);
    }

    for index in 0..SKILL_COUNT {
        let (primary, secondary) = SKILL_CONTROLLERS[index];
        let control = if secondary == ATTR_NONE {
            data.attributes_current[primary]
        } else {
            (data.attributes_current[primary] + data.attributes_current[secondary as usize]) / 2
        };
        let bonus = (control - 50).max(0) / 5;
        data.skills_current[index] = (data.skills_base[index] + bonus).clamp(0, SKILL_MAX);
    }
}

// --- Stage 2: HP / stamina pools ---

/// Percentage multiplier bands for pool growth.
fn vigor_percent(attribute: i32) -> i32 {
    match attribute {
        ..30 => 70,
        30..50 => 85,
        50..80 => 100,
        80..100 => 115,
        _ => 130,
    }
}

fn recompute_hp_stamina(data: &mut CharacterData) {
    let vitality = data.attributes_current[ATTR_VITALITY];
    let strength = data.attributes_current[ATTR_STRENGTH];

    data.hp_base = (data.level * data.profession.hp_growth() * vigor_percent(vitality) / 100).max(1);
    data.stamina_base = (data.level
        * data.profession.stamina_growth()
        * ((vigor_percent(vitality) + vigor_percent(strength)) / 2)
        / 100)
        .max(1);

    if data.conditions[COND_DEAD] != 0 {
        data.hp_current = 0;
    }
    data.hp_current = data.hp_current.clamp(0, data.hp_base);
    data.stamina_current = data.stamina_current.clamp(0, data.stamina_base);
}

// --- Stage 3: mana pools (casters only) ---

fn casting_attribute_value(data: &CharacterData) -> i32 {
    if data.profession == Profession::Bishop {
        return data.attributes_current[ATTR_INTELLIGENCE]
            .max(data.attributes_current[ATTR_PIETY]);
    }
    data.profession
        .casting_attribute()
        .map_or(0, |index| data.attributes_current[index])
}

fn recompute_mana_pools(data: &mut CharacterData) {
    let kind = data.profession.casting_kind();
    if kind == CastingKind::None {
        data.mana_base = [0; REALM_COUNT];
        data.mana_current = [0; REALM_COUNT];
        return;
    }

    let attribute = casting_attribute_value(data);
    for realm in 0..REALM_COUNT {
        let realm_skill = data.skills_current[REALM_SKILL_BASE + realm];
        let mut pool = if realm_skill == 0 {
            0
        } else {
            data.level * attribute / 10 + realm_skill / 2
        };
        if kind == CastingKind::Hybrid {
            pool /= 2;
        }
        // A corrupt record can carry a negative level.
        pool = pool.max(0);
        data.mana_base[realm] = pool;
        data.mana_current[realm] = data.mana_current[realm].clamp(0, pool);
    }
}

// --- Stage 4: AC modifier ---

fn condition_ac_penalty(index: usize) -> i32 {
    match index {
        COND_ASLEEP => -3,
        COND_KNOCKED_OUT | COND_PARALYZED | COND_UNCONSCIOUS => -4,
        COND_WEBBED => -2,
        _ => 0,
    }
}

fn recompute_ac_mod(data: &mut CharacterData) {
    let equipment_ac: i32 = data
        .equipment
        .iter()
        .filter(|slot| !slot.is_empty())
        .map(|slot| item_ac(slot.id))
        .sum();
    let condition_ac: i32 = data
        .conditions
        .iter()
        .enumerate()
        .filter(|&(_, &duration)| duration != 0)
        .map(|(index, _)| condition_ac_penalty(index))
        .sum();

    data.ac_mod = data.race.ac_mod()
        + equipment_ac
        + data.skills_current[SKILL_REFLEXION] / 25
        + condition_ac;
}

// --- Stage 5: recovery rates ---

fn recovery_band(attribute: i32) -> i32 {
    match attribute {
        ..30 => 1,
        30..60 => 2,
        60..90 => 3,
        90..110 => 4,
        _ => 5,
    }
}

fn recompute_recovery_rates(data: &mut CharacterData) {
    let vitality = data.attributes_current[ATTR_VITALITY];
    let strength = data.attributes_current[ATTR_STRENGTH];

    data.hp_recovery = recovery_band(vitality);
    data.stamina_recovery = recovery_band((vitality + strength) / 2);
    data.sp_recovery = if data.profession.casting_kind() == CastingKind::None {
        0
    } else {
        recovery_band(casting_attribute_value(data))
    };
}

// --- Stage 6: damage absorption ---

fn recompute_absorption(data: &mut CharacterData) {
    let equipment: i32 = data
        .equipment
        .iter()
        .filter(|slot| !slot.is_empty())
        .map(|slot| item_absorption(slot.id))
        .sum();
    data.damage_absorption = equipment + data.skills_current[SKILL_IRON_SKIN] / 10;
}

// --- Stage 7: magic resistance ---

fn recompute_magic_resistance(data: &mut CharacterData) {
    let racial = data.race.base_resistances();
    let iron_will = data.skills_current[SKILL_IRON_WILL] / 5;

    for realm in 0..REALM_COUNT {
        let mut value = racial[realm] + data.level / 2 + iron_will;
        if realm == REALM_MENTAL && data.conditions[COND_INSANE] != 0 {
            value -= 25;
        }
        data.magic_resist[realm] = value.clamp(0, RESIST_MAX);
    }
}

// --- Stage 8: carry capacity ---

fn recompute_carry_capacity(data: &mut CharacterData) {
    let strength = data.attributes_current[ATTR_STRENGTH];
    let vitality = data.attributes_current[ATTR_VITALITY];
    data.carry_capacity_tenths = strength * 35 + vitality * 15;
}

// --- Stage 9: personal load / encumbrance ---

fn slot_weight_tenths(slot: &ItemSlot) -> i32 {
    if slot.is_empty() {
        return 0;
    }
    item_weight_tenths(slot.id) * slot.count.max(1)
}

fn recompute_personal_load(data: &mut CharacterData) {
    data.personal_load_tenths = data.item_slots().map(slot_weight_tenths).sum();

    let capacity = data.carry_capacity_tenths.max(1);
    let percent = data.personal_load_tenths.saturating_mul(100) / capacity;
    data.encumbrance = match percent {
        ..50 => 0,
        50..75 => 1,
        75..90 => 2,
        90..100 => 3,
        _ => 4,
    };
}

// --- Blob write-back ---

fn patch_derived(data: &CharacterData, blob: &mut [u8]) -> io::Result<()> {
    let label = "character record";

    for index in 0..ATTRIBUTE_COUNT {
        patch_i32_in_blob(
            blob,
            character::ATTRIBUTES_CURRENT_OFFSET + index * 4,
            data.attributes_current[index],
            label,
            "attribute current",
        )?;
    }
    for index in 0..SKILL_COUNT {
        patch_i32_in_blob(
            blob,
            character::SKILLS_CURRENT_OFFSET + index * 4,
            data.skills_current[index],
            label,
            "skill current",
        )?;
    }

    patch_i32_in_blob(blob, character::HP_BASE_OFFSET, data.hp_base, label, "hp base")?;
    patch_i32_in_blob(blob, character::HP_CURRENT_OFFSET, data.hp_current, label, "hp current")?;
    patch_i32_in_blob(
        blob,
        character::STAMINA_BASE_OFFSET,
        data.stamina_base,
        label,
        "stamina base",
    )?;
    patch_i32_in_blob(
        blob,
        character::STAMINA_CURRENT_OFFSET,
        data.stamina_current,
        label,
        "stamina current",
    )?;

    for realm in 0..REALM_COUNT {
        patch_i32_in_blob(
            blob,
            character::MANA_BASE_OFFSET + realm * 4,
            data.mana_base[realm],
            label,
            "mana base",
        )?;
        patch_i32_in_blob(
            blob,
            character::MANA_CURRENT_OFFSET + realm * 4,
            data.mana_current[realm],
            label,
            "mana current",
        )?;
        patch_i32_in_blob(
            blob,
            character::MAGIC_RESIST_OFFSET + realm * 4,
            data.magic_resist[realm],
            label,
            "magic resistance",
        )?;
    }

    patch_i32_in_blob(blob, character::AC_MOD_OFFSET, data.ac_mod, label, "ac mod")?;
    patch_i32_in_blob(blob, character::HP_RECOVERY_OFFSET, data.hp_recovery, label, "hp recovery")?;
    patch_i32_in_blob(
        blob,
        character::STAMINA_RECOVERY_OFFSET,
        data.stamina_recovery,
        label,
        "stamina recovery",
    )?;
    patch_i32_in_blob(blob, character::SP_RECOVERY_OFFSET, data.sp_recovery, label, "sp recovery")?;
    patch_i32_in_blob(
        blob,
        character::ABSORPTION_OFFSET,
        data.damage_absorption,
        label,
        "damage absorption",
    )?;
    patch_i32_in_blob(
        blob,
        character::CARRY_CAPACITY_OFFSET,
        data.carry_capacity_tenths,
        label,
        "carry capacity",
    )?;
    patch_i32_in_blob(
        blob,
        character::PERSONAL_LOAD_OFFSET,
        data.personal_load_tenths,
        label,
        "personal load",
    )?;
    patch_i32_in_blob(blob, character::ENCUMBRANCE_OFFSET, data.encumbrance, label, "encumbrance")
}
