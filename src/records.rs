//! # Output Records
//!
//! Versioned, JSON-serializable shapes returned by the generators.
//!
//! Each top-level record carries a `schema` tag (`loot.v1`, `encounter.v1`,
//! `dungeon.5room.v1`) and the seed it was generated from. Nullable fields
//! serialize as `null` rather than being omitted so consumers always see the
//! same shape; additive future fields will not break consumers keyed on the
//! known ones.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Schema tag for loot records.
pub const LOOT_SCHEMA: &str = "loot.v1";

/// Schema tag for standalone encounter records.
pub const ENCOUNTER_SCHEMA: &str = "encounter.v1";

/// Schema tag for five-room dungeon records.
pub const DUNGEON_SCHEMA: &str = "dungeon.5room.v1";

/// A batch of loot parcels generated for a single encounter level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootRecord {
    /// Schema tag (`loot.v1`)
    pub schema: String,
    /// Seed the parcels were generated from
    pub seed: u64,
    /// Encounter level the parcels were budgeted for
    pub encounter_level: i32,
    /// Number of parcels rolled
    pub rolls: u32,
    /// The generated parcels, in roll order
    pub parcels: Vec<Parcel>,
}

/// One bundle of loot produced by a single roll.
///
/// Immutable once returned; the coin map is ordered so that equal parcels
/// serialize to equal bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    /// Coin denomination -> count
    pub coins: BTreeMap<String, u64>,
    /// Zero or one magic item award
    pub magic_items: Vec<MagicItemAward>,
    /// Zero or one mundane item award
    pub mundane_items: Vec<MundaneItemAward>,
    /// Total GP value of coins and items, rounded to 2 decimal places
    pub total_value_gp: f64,
}

/// A magic item placed into a parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagicItemAward {
    /// Table id of the item
    pub id: String,
    /// Display name
    pub name: String,
    /// Rarity band (e.g. common, rare)
    pub rarity: String,
    /// GP value of the item
    pub gp_value: f64,
}

/// A mundane item placed into a parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MundaneItemAward {
    /// Table id of the item
    pub id: String,
    /// Display name
    pub name: String,
    /// GP value of the item
    pub gp_value: f64,
}

/// Category of a generated encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncounterKind {
    /// Enemy groups are mandatory
    Combat,
    /// Noncombat challenge
    Puzzle,
    /// Noncombat interaction
    Social,
    /// Noncombat discovery
    Exploration,
    /// Terminal fallback for anything that cannot be resolved from data
    Empty,
}

impl EncounterKind {
    /// Parses a type-table row value. Unknown strings map to [`EncounterKind::Empty`],
    /// the universal fallback terminal state.
    pub fn parse(value: &str) -> Self {
        match value {
            "combat" => Self::Combat,
            "puzzle" => Self::Puzzle,
            "social" => Self::Social,
            "exploration" => Self::Exploration,
            _ => Self::Empty,
        }
    }
}

/// A single generated encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    /// Target level / CR band
    pub difficulty: i32,
    /// Encounter category
    #[serde(rename = "type")]
    pub kind: EncounterKind,
    /// Narrative slot the encounter fills
    pub slot: String,
    /// Biome the encounter was generated for
    pub biome: String,
    /// Enemy groups; empty unless the encounter is combat
    pub enemies: Vec<EnemyUnit>,
    /// Environment descriptor
    pub environment: Environment,
    /// Merged template and environment tags, deduplicated and sorted
    pub tags: Vec<String>,
    /// Attached loot record, when the source template awards one
    pub loot: Option<LootRecord>,
    /// Provenance metadata
    pub meta: EncounterMeta,
}

impl Encounter {
    /// Creates the fixed-shape empty encounter: no enemies, neutral
    /// environment, no tags, null loot.
    pub fn empty(difficulty: i32, biome: &str, slot: &str) -> Self {
        Self {
            difficulty,
            kind: EncounterKind::Empty,
            slot: slot.to_string(),
            biome: biome.to_string(),
            enemies: Vec::new(),
            environment: Environment::neutral(),
            tags: Vec::new(),
            loot: None,
            meta: EncounterMeta::default(),
        }
    }
}

/// One enemy entry in a combat encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyUnit {
    /// Roster id of the monster
    pub monster_id: String,
    /// Display name; falls back to the raw id when the roster has no entry
    pub name: String,
    /// Number of individuals
    pub count: u32,
    /// Challenge rating, when the roster defines one
    pub cr: Option<f64>,
    /// Faction, from the monster or its enemy group
    pub faction: Option<String>,
    /// Monster tags
    pub tags: Vec<String>,
}

/// Environment descriptor attached to an encounter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Preset id, or null for the neutral environment
    pub preset_id: Option<String>,
    /// Read-aloud description
    pub description: String,
    /// Environment tags
    pub tags: Vec<String>,
    /// Free-form mechanical effects passed through from the preset
    pub mechanical_effects: serde_json::Map<String, serde_json::Value>,
}

impl Environment {
    /// The well-defined neutral descriptor used when no presets are
    /// configured: null id, empty description, no tags, no effects.
    pub fn neutral() -> Self {
        Self::default()
    }
}

/// Provenance metadata for an encounter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncounterMeta {
    /// Combat template id, when the encounter came from one
    pub template_id: Option<String>,
    /// Noncombat entry id, when the encounter came from one
    pub noncombat_id: Option<String>,
    /// Free-form notes from the source row
    pub notes: String,
}

/// Schema wrapper for a standalone encounter request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterRecord {
    /// Schema tag (`encounter.v1`)
    pub schema: String,
    /// Seed the encounter was generated from
    pub seed: u64,
    /// The generated encounter
    pub encounter: Encounter,
}

/// A complete five-room dungeon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonRecord {
    /// Schema tag (`dungeon.5room.v1`)
    pub schema: String,
    /// Seed the dungeon was generated from
    pub seed: u64,
    /// Biome shared by every room
    pub biome: String,
    /// Level the per-slot difficulty deltas are applied to
    pub base_level: i32,
    /// Rooms in progression order
    pub rooms: Vec<DungeonRoom>,
}

/// One room of a five-room dungeon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonRoom {
    /// Progression slot the room fills
    pub slot: String,
    /// 1-based sequential position, independent of slot semantics
    pub room_index: u32,
    /// The room's encounter
    pub encounter: Encounter,
}

/// Merges two tag lists into a deduplicated, sorted vector.
///
/// Sorting makes the merged set byte-stable across runs; tag order carries no
/// meaning in the output schema.
pub fn merge_tags(a: &[String], b: &[String]) -> Vec<String> {
    a.iter()
        .chain(b.iter())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
