use serde::{Deserialize, Serialize};

// Record size constants. Size prefixes inside the GSTA payload must match
// these exactly; write paths assert them.
pub const PARTY_RECORD_SIZE: usize = 0x49C2;
pub const CHARACTER_RECORD_SIZE: usize = 0x1862;
pub const CHARACTER_EXTRA_RECORD_SIZE: usize = 0x106;

pub const PARTY_SLOT_COUNT: usize = 8;
pub const ATTRIBUTE_COUNT: usize = 7;
pub const SKILL_COUNT: usize = 39;
pub const REALM_COUNT: usize = 6;
pub const CONDITION_COUNT: usize = 18;
pub const EQUIP_SLOT_COUNT: usize = 10;
pub const CARRY_SLOT_COUNT: usize = 8;

pub const NAME_CAPACITY_UNITS: usize = 16;

pub const MAX_LEVEL: i32 = 50;
pub const ATTRIBUTE_MIN: i32 = 1;
pub const ATTRIBUTE_MAX: i32 = 125;
pub const SKILL_MAX: i32 = 125;
pub const RESIST_MAX: i32 = 100;

// Attribute indices.
pub const ATTR_STRENGTH: usize = 0;
pub const ATTR_INTELLIGENCE: usize = 1;
pub const ATTR_PIETY: usize = 2;
pub const ATTR_VITALITY: usize = 3;
pub const ATTR_DEXTERITY: usize = 4;
pub const ATTR_SPEED: usize = 5;
pub const ATTR_SENSES: usize = 6;

pub const ATTRIBUTE_NAMES: [&str; ATTRIBUTE_COUNT] = [
    "Strength",
    "Intelligence",
    "Piety",
    "Vitality",
    "Dexterity",
    "Speed",
    "Senses",
];

// Skill indices that the recompute cascade reads directly.
pub const SKILL_POWER_CAST: usize = 33;
pub const SKILL_IRON_WILL: usize = 34;
pub const SKILL_IRON_SKIN: usize = 35;
pub const SKILL_REFLEXION: usize = 36;

/// First realm skill; realm `r` maps to skill index `REALM_SKILL_BASE + r`.
pub const REALM_SKILL_BASE: usize = 26;

pub const SKILL_NAMES: [&str; SKILL_COUNT] = [
    "Sword",
    "Axe",
    "Mace & Flail",
    "Dagger",
    "Staff & Wand",
    "Polearm",
    "Shield",
    "Modern Weapons",
    "Bow",
    "Throwing & Sling",
    "Dual Weapons",
    "Critical Strike",
    "Martial Arts",
    "Artifacts",
    "Mythology",
    "Communication",
    "Engineering",
    "Wizardry",
    "Divinity",
    "Alchemy",
    "Psionics",
    "Music",
    "Pickpocket",
    "Locks & Traps",
    "Stealth",
    "Scouting",
    "Fire Magic",
    "Water Magic",
    "Air Magic",
    "Earth Magic",
    "Mental Magic",
    "Divine Magic",
    "Power Strike",
    "Power Cast",
    "Iron Will",
    "Iron Skin",
    "Reflexion",
    "Snake Speed",
    "Eagle Eye",
];

pub const ATTR_NONE: i32 = -1;

/// Controlling attributes per skill: primary index plus optional secondary
/// (`ATTR_NONE` when the skill is governed by a single attribute).
#[rustfmt::skip]
pub const SKILL_CONTROLLERS: [(usize, i32); SKILL_COUNT] = [
    (ATTR_STRENGTH,     ATTR_DEXTERITY as i32),   // Sword
    (ATTR_STRENGTH,     ATTR_DEXTERITY as i32),   // Axe
    (ATTR_STRENGTH,     ATTR_DEXTERITY as i32),   // Mace & Flail
    (ATTR_DEXTERITY,    ATTR_SPEED as i32),       // Dagger
    (ATTR_DEXTERITY,    ATTR_INTELLIGENCE as i32),// Staff & Wand
    (ATTR_STRENGTH,     ATTR_DEXTERITY as i32),   // Polearm
    (ATTR_STRENGTH,     ATTR_DEXTERITY as i32),   // Shield
    (ATTR_SENSES,       ATTR_DEXTERITY as i32),   // Modern Weapons
    (ATTR_DEXTERITY,    ATTR_SENSES as i32),      // Bow
    (ATTR_DEXTERITY,    ATTR_SENSES as i32),      // Throwing & Sling
    (ATTR_DEXTERITY,    ATTR_SPEED as i32),       // Dual Weapons
    (ATTR_SENSES,       ATTR_DEXTERITY as i32),   // Critical Strike
    (ATTR_DEXTERITY,    ATTR_SPEED as i32),       // Martial Arts
    (ATTR_INTELLIGENCE, ATTR_SENSES as i32),      // Artifacts
    (ATTR_INTELLIGENCE, ATTR_SENSES as i32),      // Mythology
    (ATTR_INTELLIGENCE, ATTR_SENSES as i32),      // Communication
    (ATTR_INTELLIGENCE, ATTR_DEXTERITY as i32),   // Engineering
    (ATTR_INTELLIGENCE, ATTR_NONE),               // Wizardry
    (ATTR_PIETY,        ATTR_NONE),               // Divinity
    (ATTR_INTELLIGENCE, ATTR_PIETY as i32),       // Alchemy
    (ATTR_INTELLIGENCE, ATTR_SENSES as i32),      // Psionics
    (ATTR_DEXTERITY,    ATTR_SENSES as i32),      // Music
    (ATTR_DEXTERITY,    ATTR_SPEED as i32),       // Pickpocket
    (ATTR_DEXTERITY,    ATTR_SENSES as i32),      // Locks & Traps
    (ATTR_DEXTERITY,    ATTR_SPEED as i32),       // Stealth
    (ATTR_SENSES,       ATTR_NONE),               // Scouting
    (ATTR_INTELLIGENCE, ATTR_PIETY as i32),       // Fire Magic
    (ATTR_INTELLIGENCE, ATTR_PIETY as i32),       // Water Magic
    (ATTR_INTELLIGENCE, ATTR_PIETY as i32),       // Air Magic
    (ATTR_INTELLIGENCE, ATTR_PIETY as i32),       // Earth Magic
    (ATTR_INTELLIGENCE, ATTR_PIETY as i32),       // Mental Magic
    (ATTR_PIETY,        ATTR_INTELLIGENCE as i32),// Divine Magic
    (ATTR_STRENGTH,     ATTR_NONE),               // Power Strike
    (ATTR_INTELLIGENCE, ATTR_NONE),               // Power Cast
    (ATTR_PIETY,        ATTR_VITALITY as i32),    // Iron Will
    (ATTR_VITALITY,     ATTR_NONE),               // Iron Skin
    (ATTR_SPEED,        ATTR_DEXTERITY as i32),   // Reflexion
    (ATTR_SPEED,        ATTR_NONE),               // Snake Speed
    (ATTR_SENSES,       ATTR_NONE),               // Eagle Eye
];

pub const REALM_NAMES: [&str; REALM_COUNT] = [
    "Fire", "Water", "Air", "Earth", "Mental", "Divine",
];

pub const CONDITION_NAMES: [&str; CONDITION_COUNT] = [
    "Afraid",
    "Asleep",
    "Blind",
    "Diseased",
    "Drained",
    "Insane",
    "Irritated",
    "Knocked Out",
    "Nauseated",
    "Paralyzed",
    "Poisoned",
    "Silenced",
    "Slowed",
    "Turncoat",
    "Unconscious",
    "Webbed",
    "Dead",
    "Missing",
];

pub const COND_ASLEEP: usize = 1;
pub const COND_DISEASED: usize = 3;
pub const COND_DRAINED: usize = 4;
pub const COND_INSANE: usize = 5;
pub const COND_KNOCKED_OUT: usize = 7;
pub const COND_NAUSEATED: usize = 8;
pub const COND_PARALYZED: usize = 9;
pub const COND_UNCONSCIOUS: usize = 14;
pub const COND_WEBBED: usize = 15;
pub const COND_DEAD: usize = 16;
pub const COND_MISSING: usize = 17;

pub const CONDITION_DURATION_PERMANENT: i32 = -1;

/// Conditions that only exist in the permanent state; positive durations
/// are normalized to permanent on read and write.
pub fn condition_is_permanent_only(index: usize) -> bool {
    index == COND_DEAD || index == COND_MISSING
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profession {
    Fighter,
    Lord,
    Valkyrie,
    Ranger,
    Samurai,
    Ninja,
    Monk,
    Rogue,
    Gadgeteer,
    Bard,
    Priest,
    Alchemist,
    Bishop,
    Psionic,
    Mage,
}

pub const PROFESSION_COUNT: usize = 15;

pub const PROFESSION_NAMES: [&str; PROFESSION_COUNT] = [
    "Fighter",
    "Lord",
    "Valkyrie",
    "Ranger",
    "Samurai",
    "Ninja",
    "Monk",
    "Rogue",
    "Gadgeteer",
    "Bard",
    "Priest",
    "Alchemist",
    "Bishop",
    "Psionic",
    "Mage",
];

/// How a profession powers its spellbook, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastingKind {
    /// No spellbook: pools are zeroed. Gadgeteers and Bards power items
    /// rather than spellbooks and land here.
    None,
    /// Full casters: pools at full weight.
    Pure,
    /// Fighter-casters: pools at half weight.
    Hybrid,
}

impl Profession {
    pub const DEFAULT: Profession = Profession::Fighter;

    pub fn from_raw(raw: i32) -> Option<Self> {
        const ALL: [Profession; PROFESSION_COUNT] = [
            Profession::Fighter,
            Profession::Lord,
            Profession::Valkyrie,
            Profession::Ranger,
            Profession::Samurai,
            Profession::Ninja,
            Profession::Monk,
            Profession::Rogue,
            Profession::Gadgeteer,
            Profession::Bard,
            Profession::Priest,
            Profession::Alchemist,
            Profession::Bishop,
            Profession::Psionic,
            Profession::Mage,
        ];
        usize::try_from(raw).ok().and_then(|i| ALL.get(i).copied())
    }

    pub fn raw(&self) -> i32 {
        *self as i32
    }

    pub fn as_str(&self) -> &'static str {
        PROFESSION_NAMES[*self as usize]
    }

    /// Per-level hit point growth factor.
    pub fn hp_growth(&self) -> i32 {
        match self {
            Profession::Fighter => 9,
            Profession::Lord | Profession::Valkyrie => 8,
            Profession::Ranger | Profession::Samurai | Profession::Ninja | Profession::Monk => 7,
            Profession::Rogue | Profession::Gadgeteer | Profession::Bard | Profession::Priest => 6,
            Profession::Alchemist | Profession::Bishop => 5,
            Profession::Psionic | Profession::Mage => 4,
        }
    }

    /// Per-level stamina growth factor.
    pub fn stamina_growth(&self) -> i32 {
        match self {
            Profession::Fighter => 8,
            Profession::Lord | Profession::Valkyrie | Profession::Ranger => 7,
            Profession::Samurai => 6,
            Profession::Ninja | Profession::Monk | Profession::Rogue => 7,
            Profession::Gadgeteer | Profession::Bard => 6,
            Profession::Priest | Profession::Alchemist => 5,
            Profession::Bishop | Profession::Psionic | Profession::Mage => 4,
        }
    }

    pub fn casting_kind(&self) -> CastingKind {
        match self {
            Profession::Fighter
            | Profession::Rogue
            | Profession::Gadgeteer
            | Profession::Bard => CastingKind::None,
            Profession::Priest
            | Profession::Alchemist
            | Profession::Bishop
            | Profession::Psionic
            | Profession::Mage => CastingKind::Pure,
            Profession::Lord
            | Profession::Valkyrie
            | Profession::Ranger
            | Profession::Samurai
            | Profession::Ninja
            | Profession::Monk => CastingKind::Hybrid,
        }
    }

    /// Attribute index that drives this profession's casting, if it casts.
    /// Bishops cast from the better of Intelligence and Piety; that choice
    /// is made in the recompute stage where both current values exist.
    pub fn casting_attribute(&self) -> Option<usize> {
        match self {
            Profession::Lord | Profession::Valkyrie | Profession::Monk | Profession::Priest => {
                Some(ATTR_PIETY)
            }
            Profession::Ranger
            | Profession::Samurai
            | Profession::Ninja
            | Profession::Alchemist
            | Profession::Psionic
            | Profession::Mage => Some(ATTR_INTELLIGENCE),
            Profession::Bishop => Some(ATTR_INTELLIGENCE),
            Profession::Fighter
            | Profession::Rogue
            | Profession::Gadgeteer
            | Profession::Bard => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Race {
    Human,
    Elf,
    Dwarf,
    Gnome,
    Hobbit,
    Faerie,
    Lizardman,
    Dracon,
    Felpurr,
    Rawulf,
    Mook,
}

pub const RACE_COUNT: usize = 11;

pub const RACE_NAMES: [&str; RACE_COUNT] = [
    "Human",
    "Elf",
    "Dwarf",
    "Gnome",
    "Hobbit",
    "Faerie",
    "Lizardman",
    "Dracon",
    "Felpurr",
    "Rawulf",
    "Mook",
];

impl Race {
    pub const DEFAULT: Race = Race::Human;

    pub fn from_raw(raw: i32) -> Option<Self> {
        const ALL: [Race; RACE_COUNT] = [
            Race::Human,
            Race::Elf,
            Race::Dwarf,
            Race::Gnome,
            Race::Hobbit,
            Race::Faerie,
            Race::Lizardman,
            Race::Dracon,
            Race::Felpurr,
            Race::Rawulf,
            Race::Mook,
        ];
        usize::try_from(raw).ok().and_then(|i| ALL.get(i).copied())
    }

    pub fn raw(&self) -> i32 {
        *self as i32
    }

    pub fn as_str(&self) -> &'static str {
        RACE_NAMES[*self as usize]
    }

    /// Innate armor class contribution.
    pub fn ac_mod(&self) -> i32 {
        match self {
            Race::Faerie => 2,
            Race::Felpurr => 1,
            _ => 0,
        }
    }

    /// Innate per-realm magic resistance (Fire, Water, Air, Earth,
    /// Mental, Divine).
    pub fn base_resistances(&self) -> [i32; REALM_COUNT] {
        match self {
            Race::Human => [0, 0, 0, 0, 0, 0],
            Race::Elf => [5, 0, 5, 0, 10, 0],
            Race::Dwarf => [10, 0, 0, 10, 0, 5],
            Race::Gnome => [0, 0, 0, 10, 10, 0],
            Race::Hobbit => [0, 5, 0, 5, 5, 0],
            Race::Faerie => [5, 5, 10, 5, 10, 5],
            Race::Lizardman => [10, 10, 0, 0, -10, 0],
            Race::Dracon => [15, 0, 5, 0, 0, 0],
            Race::Felpurr => [0, 0, 5, 0, 5, 0],
            Race::Rawulf => [0, 10, 0, 0, 0, 10],
            Race::Mook => [0, 5, 0, 5, 15, 0],
        }
    }
}
