//! Built-in item property table for the item ids the editor understands.
//!
//! The character record stores item ids, not item definitions; weights,
//! armor class, and absorption live in the game's item database. The
//! recompute cascade needs those properties, so the ids that commonly
//! appear in party saves are tabled here. Ids outside the table fall back
//! to `DEFAULT_WEIGHT_TENTHS` and contribute no AC or absorption.

pub struct WellKnownItem {
    pub id: i32,
    pub name: &'static str,
    /// Weight in tenths of a pound.
    pub weight_tenths: i32,
    pub ac: i32,
    pub absorption: i32,
}

pub const DEFAULT_WEIGHT_TENTHS: i32 = 10;

#[rustfmt::skip]
pub const WELL_KNOWN_ITEMS: &[WellKnownItem] = &[
    // Weapons
    WellKnownItem { id:  10, name: "Dagger",            weight_tenths:  15, ac: 0, absorption: 0 },
    WellKnownItem { id:  11, name: "Short Sword",       weight_tenths:  30, ac: 0, absorption: 0 },
    WellKnownItem { id:  12, name: "Long Sword",        weight_tenths:  45, ac: 0, absorption: 0 },
    WellKnownItem { id:  14, name: "Broadsword",        weight_tenths:  60, ac: 0, absorption: 0 },
    WellKnownItem { id:  20, name: "Hand Axe",          weight_tenths:  40, ac: 0, absorption: 0 },
    WellKnownItem { id:  24, name: "Mace",              weight_tenths:  50, ac: 0, absorption: 0 },
    WellKnownItem { id:  30, name: "Quarterstaff",      weight_tenths:  40, ac: 0, absorption: 0 },
    WellKnownItem { id:  36, name: "Spear",             weight_tenths:  55, ac: 0, absorption: 0 },
    WellKnownItem { id:  44, name: "Short Bow",         weight_tenths:  30, ac: 0, absorption: 0 },
    WellKnownItem { id:  48, name: "Sling",             weight_tenths:  10, ac: 0, absorption: 0 },

    // Shields & armor
    WellKnownItem { id:  60, name: "Buckler",           weight_tenths:  30, ac: 1, absorption: 0 },
    WellKnownItem { id:  62, name: "Heater Shield",     weight_tenths:  60, ac: 2, absorption: 1 },
    WellKnownItem { id:  64, name: "Tower Shield",      weight_tenths: 110, ac: 3, absorption: 2 },
    WellKnownItem { id:  70, name: "Robes",             weight_tenths:  20, ac: 0, absorption: 0 },
    WellKnownItem { id:  72, name: "Leather Cuirass",   weight_tenths:  60, ac: 1, absorption: 1 },
    WellKnownItem { id:  74, name: "Chain Mail",        weight_tenths: 150, ac: 2, absorption: 2 },
    WellKnownItem { id:  76, name: "Breastplate",       weight_tenths: 200, ac: 3, absorption: 3 },
    WellKnownItem { id:  78, name: "Plate Mail",        weight_tenths: 300, ac: 4, absorption: 4 },
    WellKnownItem { id:  82, name: "Leather Helm",      weight_tenths:  15, ac: 1, absorption: 0 },
    WellKnownItem { id:  84, name: "Chain Cowl",        weight_tenths:  30, ac: 1, absorption: 1 },

    // Consumables & sundries
    WellKnownItem { id: 120, name: "Light Heal Potion", weight_tenths:   5, ac: 0, absorption: 0 },
    WellKnownItem { id: 122, name: "Cure Poison Potion", weight_tenths:  5, ac: 0, absorption: 0 },
    WellKnownItem { id: 130, name: "Canteen",           weight_tenths:  20, ac: 0, absorption: 0 },
    WellKnownItem { id: 132, name: "Dried Fish",        weight_tenths:   5, ac: 0, absorption: 0 },
    WellKnownItem { id: 134, name: "Bread",             weight_tenths:   5, ac: 0, absorption: 0 },
    WellKnownItem { id: 140, name: "Torch",             weight_tenths:  10, ac: 0, absorption: 0 },
    WellKnownItem { id: 150, name: "Lockpick Set",      weight_tenths:   5, ac: 0, absorption: 0 },
];

pub fn lookup(id: i32) -> Option<&'static WellKnownItem> {
    WELL_KNOWN_ITEMS.iter().find(|item| item.id == id)
}

pub fn item_name(id: i32) -> Option<&'static str> {
    lookup(id).map(|item| item.name)
}

pub fn item_weight_tenths(id: i32) -> i32 {
    lookup(id).map_or(DEFAULT_WEIGHT_TENTHS, |item| item.weight_tenths)
}

pub fn item_ac(id: i32) -> i32 {
    lookup(id).map_or(0, |item| item.ac)
}

pub fn item_absorption(id: i32) -> i32 {
    lookup(id).map_or(0, |item| item.absorption)
}
