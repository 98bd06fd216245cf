//! # Encounter Tables
//!
//! Table rows for encounter-type selection, the five-room progression,
//! combat templates, enemy groups, the monster roster, factions, environment
//! presets, and the noncombat (puzzle/social/exploration) entries.

use super::{default_loot_rolls, default_weight, Gate};
use crate::config;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// One encounter-type table: a die plus ordered roll ranges mapping to
/// encounter kinds.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeTable {
    /// Table id, for diagnostics
    #[serde(default)]
    pub id: String,
    /// Biome/slot gate (levels unused by type selection)
    #[serde(flatten)]
    pub gate: Gate,
    /// Die size rolled against the rows
    #[serde(default = "default_die")]
    pub die: u32,
    /// Ordered `(min,max) -> type` rows
    #[serde(default)]
    pub rows: Vec<TypeRow>,
}

/// One roll range in an encounter-type table.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeRow {
    /// Lowest matching roll; defaults to `max` (or 1) when absent
    #[serde(default)]
    pub min: Option<u32>,
    /// Highest matching roll; defaults to `min` when absent
    #[serde(default)]
    pub max: Option<u32>,
    /// Encounter kind produced by this range
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self {
            id: String::new(),
            gate: Gate::default(),
            die: default_die(),
            rows: Vec::new(),
        }
    }
}

impl Default for TypeRow {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            kind: default_kind(),
        }
    }
}

impl TypeRow {
    /// Resolves the row's inclusive roll bounds.
    pub fn bounds(&self) -> (u32, u32) {
        let min = self.min.or(self.max).unwrap_or(1);
        let max = self.max.unwrap_or(min);
        (min, max)
    }

    /// Whether a die roll falls inside this row.
    pub fn contains(&self, roll: u32) -> bool {
        let (min, max) = self.bounds();
        min <= roll && roll <= max
    }
}

fn default_die() -> u32 {
    config::DEFAULT_TYPE_DIE
}

fn default_kind() -> String {
    "combat".to_string()
}

/// Contents of `five_room_progression.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Progression {
    /// Slot name -> slot configuration
    #[serde(default)]
    pub slots: BTreeMap<String, SlotDef>,
    /// Slot order for dungeon assembly
    #[serde(default)]
    pub default_order: Vec<String>,
}

impl Progression {
    /// The configured slot order, falling back to the (sorted) slot keys
    /// when no explicit order is defined.
    pub fn order(&self) -> Vec<String> {
        if !self.default_order.is_empty() {
            self.default_order.clone()
        } else {
            self.slots.keys().cloned().collect()
        }
    }

    /// Difficulty delta for a slot; unknown slots contribute 0.
    pub fn difficulty_delta(&self, slot: &str) -> i32 {
        self.slots
            .get(slot)
            .map(|def| def.difficulty_delta)
            .unwrap_or(0)
    }
}

/// Configuration for one progression slot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotDef {
    /// Added to the dungeon's base level for this slot's room
    #[serde(default)]
    pub difficulty_delta: i32,
}

/// Contents of `combat_budgets.json`; optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CombatBudgets {
    /// Level -> budget; the key range bounds per-room level clamping
    #[serde(default)]
    pub budgets: BTreeMap<i32, f64>,
}

/// A combat encounter template.
#[derive(Debug, Clone, Deserialize)]
pub struct CombatTemplate {
    /// Template id
    #[serde(default)]
    pub id: Option<String>,
    /// Base selection weight, before faction modifiers
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Biome/slot/level gate
    #[serde(flatten)]
    pub gate: Gate,
    /// Enemy group instantiated for the encounter; mandatory for combat
    #[serde(default)]
    pub enemy_group_id: Option<String>,
    /// Tags matched against environment presets
    #[serde(default)]
    pub environment_tags: Vec<String>,
    /// Narrative tags merged into the encounter
    #[serde(default)]
    pub tags: Vec<String>,
    /// Factions whose weight modifiers apply to this template
    #[serde(default)]
    pub factions: Vec<String>,
    /// Loot parcels rolled for the encounter
    #[serde(default = "default_loot_rolls")]
    pub loot_rolls: u32,
    /// Free-form notes copied into encounter metadata
    #[serde(default)]
    pub notes: String,
}

impl Default for CombatTemplate {
    fn default() -> Self {
        Self {
            id: None,
            weight: 1.0,
            gate: Gate::default(),
            enemy_group_id: None,
            environment_tags: Vec::new(),
            tags: Vec::new(),
            factions: Vec::new(),
            loot_rolls: 1,
            notes: String::new(),
        }
    }
}

/// An enemy group composition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnemyGroup {
    /// Group id
    #[serde(default)]
    pub id: String,
    /// Faction applied to members without their own
    #[serde(default)]
    pub faction: Option<String>,
    /// Member entries
    #[serde(default)]
    pub enemies: Vec<EnemyEntry>,
}

/// One member of an enemy group.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnemyEntry {
    /// Roster id of the monster
    #[serde(default)]
    pub monster_id: String,
    /// How many individuals to roll
    #[serde(default)]
    pub count: CountRange,
}

/// Inclusive count range for an enemy entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CountRange {
    /// Minimum count
    #[serde(default = "default_count_min")]
    pub min: u32,
    /// Maximum count; defaults to `min`, and is coerced up to it if inverted
    #[serde(default)]
    pub max: Option<u32>,
}

impl CountRange {
    /// Resolves the inclusive `(min, max)` bounds.
    pub fn resolve(&self) -> (u32, u32) {
        let max = self.max.unwrap_or(self.min).max(self.min);
        (self.min, max)
    }
}

impl Default for CountRange {
    fn default() -> Self {
        Self { min: 1, max: None }
    }
}

fn default_count_min() -> u32 {
    1
}

/// A monster roster entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Monster {
    /// Roster id
    #[serde(default)]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Challenge rating
    #[serde(default)]
    pub cr: Option<f64>,
    /// Faction
    #[serde(default)]
    pub faction: Option<String>,
    /// Tags copied onto instantiated units
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A faction with per-biome and per-slot weight modifiers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Faction {
    /// Faction id
    #[serde(default)]
    pub id: String,
    /// Weight modifiers applied to templates carrying this faction
    #[serde(default)]
    pub weight_modifiers: WeightModifiers,
}

/// Multiplicative weight modifiers keyed by biome and slot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeightModifiers {
    /// Biome -> multiplier
    #[serde(default)]
    pub biomes: HashMap<String, f64>,
    /// Slot -> multiplier
    #[serde(default)]
    pub slots: HashMap<String, f64>,
}

/// An environment preset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentPreset {
    /// Preset id
    #[serde(default)]
    pub id: String,
    /// Read-aloud description
    #[serde(default)]
    pub description: String,
    /// Biomes the preset suits; empty or `"any"` matches everywhere
    #[serde(default)]
    pub biomes: Vec<String>,
    /// Tags matched against template environment tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form mechanical effects passed through to the output
    #[serde(default)]
    pub mechanical_effects: serde_json::Map<String, serde_json::Value>,
}

/// An optional noncombat table (puzzle, social, or exploration).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoncombatTable {
    /// Weighted, gated entries
    #[serde(default)]
    pub entries: Vec<NoncombatEntry>,
}

/// One noncombat table entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NoncombatEntry {
    /// Entry id
    #[serde(default)]
    pub id: Option<String>,
    /// Selection weight; noncombat selection applies no faction modifiers
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Biome/slot/level gate
    #[serde(flatten)]
    pub gate: Gate,
    /// Specific preset requested for the encounter's environment
    #[serde(default)]
    pub environment_preset_id: Option<String>,
    /// Tags matched against environment presets
    #[serde(default)]
    pub environment_tags: Vec<String>,
    /// Narrative tags merged into the encounter
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the encounter awards a loot parcel
    #[serde(default)]
    pub award_loot: bool,
    /// Loot parcels rolled when `award_loot` is set
    #[serde(default = "default_loot_rolls")]
    pub loot_rolls: u32,
    /// Free-form notes copied into encounter metadata
    #[serde(default)]
    pub notes: String,
}

impl Default for NoncombatEntry {
    fn default() -> Self {
        Self {
            id: None,
            weight: 1.0,
            gate: Gate::default(),
            environment_preset_id: None,
            environment_tags: Vec::new(),
            tags: Vec::new(),
            award_loot: false,
            loot_rolls: 1,
            notes: String::new(),
        }
    }
}
