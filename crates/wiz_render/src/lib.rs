use std::fmt::Write as _;

use serde_json::{Map as JsonMap, Value as JsonValue, json};
use wiz8_core::core_api::{CoreError, CoreErrorCode, SaveVariant, Session};

const SHEET_LABEL_WIDTH: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    ClassicSheet,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub gold: bool,
    pub game_time: bool,
    pub level_name: bool,
    pub party: bool,
    pub attributes: bool,
    pub skills: bool,
    pub pools: bool,
    pub resistances: bool,
    pub conditions: bool,
    pub items: bool,
    pub load: bool,
}

impl FieldSelection {
    pub fn is_any_selected(&self) -> bool {
        self.gold
            || self.game_time
            || self.level_name
            || self.party
            || self.attributes
            || self.skills
            || self.pools
            || self.resistances
            || self.conditions
            || self.items
            || self.load
    }

    /// True when any selected section needs a character index.
    pub fn needs_character(&self) -> bool {
        self.attributes
            || self.skills
            || self.pools
            || self.resistances
            || self.conditions
            || self.items
            || self.load
    }
}

pub fn render_json_full(session: &Session, style: JsonStyle) -> Result<JsonValue, CoreError> {
    match style {
        JsonStyle::CanonicalV1 => {
            let mut root = party_json(session);
            let mut characters = Vec::new();
            for summary in &session.snapshot().characters {
                characters.push(character_json(session, summary.index)?);
            }
            root.insert("characters".to_string(), JsonValue::Array(characters));
            Ok(JsonValue::Object(root))
        }
    }
}

pub fn render_json_selected(
    session: &Session,
    fields: &FieldSelection,
    character: Option<usize>,
    style: JsonStyle,
) -> Result<JsonValue, CoreError> {
    match style {
        JsonStyle::CanonicalV1 => {
            let mut root = JsonMap::new();
            let snapshot = session.snapshot();

            if fields.gold {
                root.insert("gold".to_string(), json!(snapshot.gold));
            }
            if fields.game_time {
                root.insert("game_time_minutes".to_string(), json!(snapshot.game_time_minutes));
            }
            if fields.level_name {
                root.insert("level_name".to_string(), json!(snapshot.level_name));
            }
            if fields.party {
                root.insert(
                    "party".to_string(),
                    JsonValue::Object(party_json(session)),
                );
            }

            if fields.needs_character() {
                let index = character.ok_or_else(|| {
                    CoreError::new(
                        CoreErrorCode::InvalidArgument,
                        "selected fields require a character index",
                    )
                })?;
                let mut section = JsonMap::new();
                section.insert("index".to_string(), json!(index));
                if fields.attributes {
                    section.insert(
                        "attributes".to_string(),
                        serde_json::to_value(session.attributes(index)?).unwrap_or(JsonValue::Null),
                    );
                }
                if fields.skills {
                    section.insert(
                        "skills".to_string(),
                        serde_json::to_value(session.nonzero_skills(index)?)
                            .unwrap_or(JsonValue::Null),
                    );
                }
                if fields.pools {
                    section.insert(
                        "pools".to_string(),
                        serde_json::to_value(session.pools(index)?).unwrap_or(JsonValue::Null),
                    );
                }
                if fields.resistances {
                    section.insert(
                        "resistances".to_string(),
                        serde_json::to_value(session.resistances(index)?)
                            .unwrap_or(JsonValue::Null),
                    );
                }
                if fields.conditions {
                    section.insert(
                        "conditions".to_string(),
                        serde_json::to_value(session.active_conditions(index)?)
                            .unwrap_or(JsonValue::Null),
                    );
                }
                if fields.items {
                    section.insert(
                        "items".to_string(),
                        serde_json::to_value(session.items(index)?).unwrap_or(JsonValue::Null),
                    );
                }
                if fields.load {
                    section.insert(
                        "load".to_string(),
                        serde_json::to_value(session.load_summary(index)?)
                            .unwrap_or(JsonValue::Null),
                    );
                }
                root.insert("character".to_string(), JsonValue::Object(section));
            }

            Ok(JsonValue::Object(root))
        }
    }
}

pub fn render_text(session: &Session, style: TextStyle) -> String {
    match style {
        TextStyle::ClassicSheet => render_party_overview(session),
    }
}

pub fn render_party_overview(session: &Session) -> String {
    let snapshot = session.snapshot();
    let mut out = String::new();

    let variant = match snapshot.variant {
        SaveVariant::Riff => "RIFF",
        SaveVariant::Wiz8 => "WIZ8",
    };
    let _ = writeln!(out, "Save variant : {variant}");
    let _ = writeln!(out, "Location     : {}", snapshot.level_name);
    let _ = writeln!(out, "Gold         : {}", snapshot.gold);
    let _ = writeln!(out, "Game time    : {}", format_game_time(snapshot.game_time_minutes));
    let _ = writeln!(out, "Party members: {}", snapshot.member_count);
    out.push('\n');

    for c in &snapshot.characters {
        let _ = writeln!(
            out,
            "  [{}] {:<16} {:<9} {:<10} {:<10} L{:<3} HP {}/{}{}",
            c.index,
            c.name,
            c.gender.as_str(),
            c.race,
            c.profession,
            c.level,
            c.hp_current,
            c.hp_base,
            if c.is_rpc { "  (RPC)" } else { "" },
        );
    }

    out
}

pub fn render_character_sheet(session: &Session, index: usize) -> Result<String, CoreError> {
    let snapshot = session.snapshot();
    let summary = snapshot
        .characters
        .iter()
        .find(|c| c.index == index)
        .ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::InvalidArgument,
                format!("no character in slot {index}"),
            )
        })?;

    let mut out = String::new();
    let _ = writeln!(out, "{}", summary.name);
    let _ = writeln!(
        out,
        "{} {} {}, level {}, {} XP",
        summary.gender.as_str(),
        summary.race,
        summary.profession,
        summary.level,
        summary.experience
    );
    out.push('\n');

    let (ac_base, ac_mod) = session.armor_class(index)?;
    sheet_line(&mut out, "Armor Class", &format!("{} ({:+})", ac_base + ac_mod, ac_mod));

    for pool in session.pools(index)? {
        if pool.base > 0 {
            sheet_line(&mut out, &pool.name, &format!("{}/{}", pool.current, pool.base));
        }
    }
    out.push('\n');

    for attr in session.attributes(index)? {
        sheet_line(&mut out, &attr.name, &format!("{:3} ({:3})", attr.current, attr.base));
    }
    out.push('\n');

    let skills = session.nonzero_skills(index)?;
    if !skills.is_empty() {
        let _ = writeln!(out, "Skills:");
        for skill in skills {
            sheet_line(&mut out, &skill.name, &format!("{:3} ({:3})", skill.current, skill.base));
        }
        out.push('\n');
    }

    let conditions = session.active_conditions(index)?;
    if !conditions.is_empty() {
        let _ = writeln!(out, "Conditions:");
        for condition in conditions {
            let duration = if condition.duration < 0 {
                "permanent".to_string()
            } else {
                format!("{} rounds", condition.duration)
            };
            sheet_line(&mut out, &condition.name, &duration);
        }
        out.push('\n');
    }

    let items = session.items(index)?;
    if !items.is_empty() {
        let _ = writeln!(out, "Items:");
        for item in items {
            let name = item.name.unwrap_or_else(|| format!("item #{}", item.id));
            let mut detail = String::new();
            if item.count > 1 {
                let _ = write!(detail, " x{}", item.count);
            }
            if !item.identified {
                detail.push_str(" (unidentified)");
            }
            let _ = writeln!(
                out,
                "  {:<9} {}{}",
                if item.equipped { "equipped" } else { "carried" },
                name,
                detail
            );
        }
        out.push('\n');
    }

    let load = session.load_summary(index)?;
    sheet_line(
        &mut out,
        "Load",
        &format!(
            "{:.1}/{:.1} lbs (encumbrance {})",
            load.personal_load_tenths as f64 / 10.0,
            load.carry_capacity_tenths as f64 / 10.0,
            load.encumbrance
        ),
    );

    Ok(out)
}

fn party_json(session: &Session) -> JsonMap<String, JsonValue> {
    let snapshot = session.snapshot();
    let mut map = JsonMap::new();
    map.insert(
        "variant".to_string(),
        json!(match snapshot.variant {
            SaveVariant::Riff => "RIFF",
            SaveVariant::Wiz8 => "WIZ8",
        }),
    );
    map.insert("gold".to_string(), json!(snapshot.gold));
    map.insert("level_name".to_string(), json!(snapshot.level_name));
    map.insert("game_time_minutes".to_string(), json!(snapshot.game_time_minutes));
    map.insert("position".to_string(), json!(snapshot.position));
    map.insert("heading".to_string(), json!(snapshot.heading));
    map.insert("member_count".to_string(), json!(snapshot.member_count));
    map.insert("level_tags".to_string(), json!(snapshot.level_tags));
    map
}

fn character_json(session: &Session, index: usize) -> Result<JsonValue, CoreError> {
    let snapshot = session.snapshot();
    let summary = snapshot
        .characters
        .iter()
        .find(|c| c.index == index)
        .ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::InvalidArgument,
                format!("no character in slot {index}"),
            )
        })?;

    let mut map = JsonMap::new();
    map.insert(
        "summary".to_string(),
        serde_json::to_value(summary).unwrap_or(JsonValue::Null),
    );
    map.insert(
        "attributes".to_string(),
        serde_json::to_value(session.attributes(index)?).unwrap_or(JsonValue::Null),
    );
    map.insert(
        "skills".to_string(),
        serde_json::to_value(session.nonzero_skills(index)?).unwrap_or(JsonValue::Null),
    );
    map.insert(
        "pools".to_string(),
        serde_json::to_value(session.pools(index)?).unwrap_or(JsonValue::Null),
    );
    map.insert(
        "resistances".to_string(),
        serde_json::to_value(session.resistances(index)?).unwrap_or(JsonValue::Null),
    );
    map.insert(
        "conditions".to_string(),
        serde_json::to_value(session.active_conditions(index)?).unwrap_or(JsonValue::Null),
    );
    map.insert(
        "items".to_string(),
        serde_json::to_value(session.items(index)?).unwrap_or(JsonValue::Null),
    );
    map.insert(
        "load".to_string(),
        serde_json::to_value(session.load_summary(index)?).unwrap_or(JsonValue::Null),
    );
    Ok(JsonValue::Object(map))
}

fn sheet_line(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<width$}: {value}", width = SHEET_LABEL_WIDTH);
}

fn format_game_time(minutes: u32) -> String {
    let days = minutes / (24 * 60);
    let hours = (minutes / 60) % 24;
    let mins = minutes % 60;
    format!("day {days}, {hours:02}:{mins:02}")
}
