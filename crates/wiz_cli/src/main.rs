use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use wiz8_core::core_api::{Engine, Session};
use wiz8_core::gender::Gender;
use wiz8_core::save::types::{
    ATTR_DEXTERITY, ATTR_INTELLIGENCE, ATTR_PIETY, ATTR_SENSES, ATTR_SPEED, ATTR_STRENGTH,
    ATTR_VITALITY, PROFESSION_NAMES, Profession, RACE_NAMES, Race,
};
use wiz8_render::{
    FieldSelection, JsonStyle, TextStyle, render_character_sheet, render_json_full,
    render_json_selected, render_text,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum GenderArg {
    Male,
    Female,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE.SAV")]
    path: PathBuf,
    /// Character slot for per-character queries and edits.
    #[arg(long)]
    character: Option<usize>,
    #[arg(long)]
    gold: bool,
    #[arg(long = "game-time")]
    game_time: bool,
    #[arg(long = "level-name")]
    level_name: bool,
    #[arg(long)]
    party: bool,
    #[arg(long)]
    attributes: bool,
    #[arg(long)]
    skills: bool,
    #[arg(long)]
    pools: bool,
    #[arg(long)]
    resistances: bool,
    #[arg(long)]
    conditions: bool,
    #[arg(long)]
    items: bool,
    #[arg(long)]
    load: bool,
    #[arg(long)]
    sheet: bool,
    #[arg(long)]
    json: bool,
    #[arg(long = "set-gold")]
    set_gold: Option<i32>,
    #[arg(long = "set-game-time")]
    set_game_time: Option<u32>,
    #[arg(long = "set-level-name")]
    set_level_name: Option<String>,
    #[arg(long = "set-name")]
    set_name: Option<String>,
    #[arg(long = "set-gender")]
    set_gender: Option<GenderArg>,
    #[arg(long = "set-race", value_parser = parse_race)]
    set_race: Option<Race>,
    #[arg(long = "set-profession", value_parser = parse_profession)]
    set_profession: Option<Profession>,
    #[arg(long = "set-level")]
    set_level: Option<i32>,
    #[arg(long = "set-xp")]
    set_xp: Option<i32>,
    #[arg(long = "set-hp")]
    set_hp: Option<i32>,
    #[arg(long = "set-stamina")]
    set_stamina: Option<i32>,
    #[arg(long = "set-strength")]
    set_strength: Option<i32>,
    #[arg(long = "set-intelligence")]
    set_intelligence: Option<i32>,
    #[arg(long = "set-piety")]
    set_piety: Option<i32>,
    #[arg(long = "set-vitality")]
    set_vitality: Option<i32>,
    #[arg(long = "set-dexterity")]
    set_dexterity: Option<i32>,
    #[arg(long = "set-speed")]
    set_speed: Option<i32>,
    #[arg(long = "set-senses")]
    set_senses: Option<i32>,
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn field_selection(&self) -> FieldSelection {
        FieldSelection {
            gold: self.gold,
            game_time: self.game_time,
            level_name: self.level_name,
            party: self.party,
            attributes: self.attributes,
            skills: self.skills,
            pools: self.pools,
            resistances: self.resistances,
            conditions: self.conditions,
            items: self.items,
            load: self.load,
        }
    }

    fn attribute_edits(&self) -> [(usize, Option<i32>); 7] {
        [
            (ATTR_STRENGTH, self.set_strength),
            (ATTR_INTELLIGENCE, self.set_intelligence),
            (ATTR_PIETY, self.set_piety),
            (ATTR_VITALITY, self.set_vitality),
            (ATTR_DEXTERITY, self.set_dexterity),
            (ATTR_SPEED, self.set_speed),
            (ATTR_SENSES, self.set_senses),
        ]
    }

    fn per_character_edits(&self) -> bool {
        self.set_name.is_some()
            || self.set_gender.is_some()
            || self.set_race.is_some()
            || self.set_profession.is_some()
            || self.set_level.is_some()
            || self.set_xp.is_some()
            || self.set_hp.is_some()
            || self.set_stamina.is_some()
            || self.attribute_edits().iter().any(|(_, v)| v.is_some())
    }

    fn has_edits(&self) -> bool {
        self.set_gold.is_some()
            || self.set_game_time.is_some()
            || self.set_level_name.is_some()
            || self.per_character_edits()
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let fields = cli.field_selection();

    if cli.has_edits() && cli.output.is_none() {
        eprintln!("--set-* flags require --output <PATH>");
        process::exit(2);
    }
    if !cli.has_edits() && cli.output.is_some() {
        eprintln!("--output requires at least one --set-* flag");
        process::exit(2);
    }
    if cli.per_character_edits() && cli.character.is_none() {
        eprintln!("per-character --set-* flags require --character <0..7>");
        process::exit(2);
    }
    if (fields.needs_character() || cli.sheet) && cli.character.is_none() {
        eprintln!("per-character queries require --character <0..7>");
        process::exit(2);
    }

    let bytes = fs::read(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });

    let engine = Engine::new();
    let mut session = engine.open_bytes(bytes).unwrap_or_else(|e| {
        eprintln!("Error parsing save file: {}", cli.path.display());
        eprintln!("  {}", e);
        process::exit(1);
    });

    apply_edits(&cli, &mut session);

    if let Some(output) = &cli.output {
        let emitted = session.to_bytes_modified().unwrap_or_else(|e| {
            eprintln!("Error emitting modified save: {e}");
            process::exit(1);
        });
        fs::write(output, emitted).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", output.display());
            process::exit(1);
        });
        println!("Wrote {}", output.display());
        return;
    }

    render_output(&cli, &fields, &session);
}

fn apply_edits(cli: &Cli, session: &mut Session) {
    if let Some(gold) = cli.set_gold {
        exit_on_error("gold", session.set_gold(gold));
    }
    if let Some(minutes) = cli.set_game_time {
        exit_on_error("game time", session.set_game_time_minutes(minutes));
    }
    if let Some(name) = &cli.set_level_name {
        exit_on_error("level name", session.set_level_name(name));
    }

    // Flag gating in main() guarantees an index for per-character edits.
    let Some(index) = cli.character else {
        return;
    };

    if let Some(name) = &cli.set_name {
        exit_on_error("name", session.set_character_name(index, name));
    }
    if let Some(gender) = cli.set_gender {
        exit_on_error("gender", session.set_gender(index, to_core_gender(gender)));
    }
    if let Some(race) = cli.set_race {
        exit_on_error("race", session.set_race(index, race));
    }
    if let Some(profession) = cli.set_profession {
        exit_on_error("profession", session.set_profession(index, profession));
    }
    if let Some(level) = cli.set_level {
        exit_on_error("level", session.set_level(index, level));
    }
    if let Some(xp) = cli.set_xp {
        exit_on_error("xp", session.set_experience(index, xp));
    }
    if let Some(hp) = cli.set_hp {
        exit_on_error("hp", session.set_hp_current(index, hp));
    }
    if let Some(stamina) = cli.set_stamina {
        exit_on_error("stamina", session.set_stamina_current(index, stamina));
    }
    for (attribute, value) in cli.attribute_edits() {
        if let Some(value) = value {
            exit_on_error("attribute", session.set_attribute_base(index, attribute, value));
        }
    }
}

fn render_output(cli: &Cli, fields: &FieldSelection, session: &Session) {
    if cli.sheet {
        let index = cli.character.unwrap_or_default();
        match render_character_sheet(session, index) {
            Ok(sheet) => print!("{sheet}"),
            Err(e) => {
                eprintln!("Error rendering character sheet: {e}");
                process::exit(1);
            }
        }
        return;
    }

    if fields.is_any_selected() {
        let rendered = render_json_selected(session, fields, cli.character, JsonStyle::CanonicalV1);
        match rendered {
            Ok(value) => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
                } else {
                    print_selected_text(&value);
                }
            }
            Err(e) => {
                eprintln!("Error rendering fields: {e}");
                process::exit(1);
            }
        }
        return;
    }

    if cli.json {
        match render_json_full(session, JsonStyle::CanonicalV1) {
            Ok(value) => {
                println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default())
            }
            Err(e) => {
                eprintln!("Error rendering save: {e}");
                process::exit(1);
            }
        }
        return;
    }

    print!("{}", render_text(session, TextStyle::ClassicSheet));
}

fn print_selected_text(value: &serde_json::Value) {
    let Some(map) = value.as_object() else {
        return;
    };
    for (key, entry) in map {
        match entry {
            serde_json::Value::String(s) => println!("{key}={s}"),
            serde_json::Value::Number(n) => println!("{key}={n}"),
            other => println!(
                "{key}={}",
                serde_json::to_string(other).unwrap_or_default()
            ),
        }
    }
}

fn exit_on_error(label: &str, result: Result<(), wiz8_core::core_api::CoreError>) {
    if let Err(e) = result {
        eprintln!("Error applying {label} edit: {e}");
        process::exit(1);
    }
}

fn to_core_gender(gender: GenderArg) -> Gender {
    match gender {
        GenderArg::Male => Gender::Male,
        GenderArg::Female => Gender::Female,
    }
}

fn parse_race(value: &str) -> Result<Race, String> {
    let lowered = value.to_ascii_lowercase();
    RACE_NAMES
        .iter()
        .position(|name| name.to_ascii_lowercase() == lowered)
        .and_then(|index| Race::from_raw(index as i32))
        .ok_or_else(|| {
            format!(
                "invalid race '{value}', expected one of: {}",
                RACE_NAMES.join(", ")
            )
        })
}

fn parse_profession(value: &str) -> Result<Profession, String> {
    let lowered = value.to_ascii_lowercase();
    PROFESSION_NAMES
        .iter()
        .position(|name| name.to_ascii_lowercase() == lowered)
        .and_then(|index| Profession::from_raw(index as i32))
        .ok_or_else(|| {
            format!(
                "invalid profession '{value}', expected one of: {}",
                PROFESSION_NAMES.join(", ")
            )
        })
}
