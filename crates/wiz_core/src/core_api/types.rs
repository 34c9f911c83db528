use serde::{Deserialize, Serialize};

use crate::gender::Gender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveVariant {
    Riff,
    Wiz8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub variant: SaveVariant,
    pub gold: i32,
    pub level_name: String,
    pub game_time_minutes: u32,
    pub position: [f32; 3],
    pub heading: f32,
    pub member_count: i32,
    pub characters: Vec<CharacterSummary>,
    pub level_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharacterSummary {
    pub index: usize,
    pub name: String,
    pub gender: Gender,
    pub race: String,
    pub profession: String,
    pub level: i32,
    pub experience: i32,
    pub hp_current: i32,
    pub hp_base: i32,
    pub in_party: bool,
    pub is_rpc: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeEntry {
    pub index: usize,
    pub name: String,
    pub base: i32,
    pub current: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillEntry {
    pub index: usize,
    pub name: String,
    pub base: i32,
    pub current: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolEntry {
    pub name: String,
    pub current: i32,
    pub base: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResistanceEntry {
    pub realm: usize,
    pub name: String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionEntry {
    pub index: usize,
    pub name: String,
    /// −1 permanent, otherwise rounds remaining.
    pub duration: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemEntry {
    pub slot: usize,
    pub equipped: bool,
    pub id: i32,
    pub name: Option<String>,
    pub count: i32,
    pub charges: i32,
    pub identified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadSummary {
    pub carry_capacity_tenths: i32,
    pub personal_load_tenths: i32,
    pub encumbrance: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapabilityIssue {
    EditingNotImplemented,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Capabilities {
    pub can_query: bool,
    pub can_plan_edits: bool,
    pub can_apply_edits: bool,
    pub issues: Vec<CapabilityIssue>,
}

impl Capabilities {
    pub fn editable(mut issues: Vec<CapabilityIssue>) -> Self {
        issues.retain(|issue| *issue != CapabilityIssue::EditingNotImplemented);

        Self {
            can_query: true,
            can_plan_edits: true,
            can_apply_edits: true,
            issues,
        }
    }
}
