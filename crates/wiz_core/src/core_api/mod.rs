mod engine;
mod error;
mod types;

pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use types::{
    AttributeEntry, Capabilities, CapabilityIssue, CharacterSummary, ConditionEntry, ItemEntry,
    LoadSummary, PoolEntry, ResistanceEntry, SaveVariant, SkillEntry, Snapshot,
};
