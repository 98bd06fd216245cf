//! # Content Tables
//!
//! Typed table rows and the [`Tables`] aggregate loaded once from a JSON data
//! directory before any generation call.
//!
//! Table rows map loosely-shaped JSON objects to explicit records with
//! defaulted optional fields, so gates are validated once at load time rather
//! than defensively at every access. Unknown keys are ignored; missing
//! optional files degrade to empty defaults.

pub mod encounter;
pub mod loot;

pub use encounter::{
    CombatBudgets, CombatTemplate, CountRange, EnemyEntry, EnemyGroup, EnvironmentPreset, Faction,
    Monster, NoncombatEntry, NoncombatTable, Progression, SlotDef, TypeRow, TypeTable,
    WeightModifiers,
};
pub use loot::{LootTables, MagicItem, MundaneItem};

use crate::{config, DelveError, DelveResult};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Biome/slot/level gate shared by weighted candidate rows.
///
/// An absent or empty biome/slot list, or one containing `"any"`, matches
/// every request. Level bounds default to 1 and 99.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Gate {
    /// Biomes the row applies to
    #[serde(default)]
    pub biomes: Vec<String>,
    /// Slots the row applies to
    #[serde(default)]
    pub slots: Vec<String>,
    /// Lowest level the row applies to
    #[serde(default = "default_min_level")]
    pub min_level: i32,
    /// Highest level the row applies to
    #[serde(default = "default_max_level")]
    pub max_level: i32,
}

impl Default for Gate {
    fn default() -> Self {
        Self {
            biomes: Vec::new(),
            slots: Vec::new(),
            min_level: config::DEFAULT_MIN_LEVEL,
            max_level: config::DEFAULT_MAX_LEVEL,
        }
    }
}

impl Gate {
    /// Checks the biome list against a requested biome.
    pub fn allows_biome(&self, biome: &str) -> bool {
        list_allows(&self.biomes, biome)
    }

    /// Checks the slot list against a requested slot.
    pub fn allows_slot(&self, slot: &str) -> bool {
        list_allows(&self.slots, slot)
    }

    /// Checks `min_level <= level <= max_level`.
    pub fn allows_level(&self, level: i32) -> bool {
        self.min_level <= level && level <= self.max_level
    }

    /// Full gate check used by the candidate filter.
    pub fn allows(&self, level: i32, biome: &str, slot: &str) -> bool {
        self.allows_biome(biome) && self.allows_slot(slot) && self.allows_level(level)
    }
}

/// Wildcard list match: empty lists and lists containing `"any"` match
/// every value.
pub fn list_allows(list: &[String], value: &str) -> bool {
    list.is_empty() || list.iter().any(|v| v == config::ANY || v == value)
}

fn default_min_level() -> i32 {
    config::DEFAULT_MIN_LEVEL
}

fn default_max_level() -> i32 {
    config::DEFAULT_MAX_LEVEL
}

pub(crate) fn default_weight() -> f64 {
    1.0
}

pub(crate) fn default_loot_rolls() -> u32 {
    1
}

/// All content tables required by the encounter and dungeon generators.
///
/// Owned, read-only data: `Tables` is `Send + Sync`, so independent generator
/// instances can share one loaded copy across threads.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    /// Encounter-type tables (die + row ranges)
    pub encounter_types: Vec<TypeTable>,
    /// Five-room slot definitions and default order
    pub progression: Progression,
    /// Level -> combat budget map; bounds clamp per-room levels
    pub combat_budgets: CombatBudgets,
    /// Combat encounter templates
    pub templates: Vec<CombatTemplate>,
    /// Enemy group compositions, indexed by id
    pub enemy_groups: HashMap<String, EnemyGroup>,
    /// Monster roster, indexed by id
    pub monsters: HashMap<String, Monster>,
    /// Faction weight modifiers, indexed by id
    pub factions: HashMap<String, Faction>,
    /// Environment presets, in file order
    pub presets: Vec<EnvironmentPreset>,
    /// Puzzle entries
    pub puzzle: NoncombatTable,
    /// Social entries
    pub social: NoncombatTable,
    /// Exploration entries
    pub exploration: NoncombatTable,
    /// Loot tables (coin values, budgets, items)
    pub loot: LootTables,
}

#[derive(Debug, Deserialize)]
struct TypeTablesFile {
    #[serde(default)]
    tables: Vec<TypeTable>,
}

#[derive(Debug, Deserialize)]
struct TemplatesFile {
    #[serde(default)]
    encounter_tables: Vec<CombatTemplate>,
}

#[derive(Debug, Deserialize)]
struct EnemyGroupsFile {
    #[serde(default)]
    groups: Vec<EnemyGroup>,
}

#[derive(Debug, Deserialize)]
struct MonstersFile {
    #[serde(default)]
    monsters: Vec<Monster>,
}

#[derive(Debug, Default, Deserialize)]
struct FactionsFile {
    #[serde(default)]
    factions: Vec<Faction>,
}

#[derive(Debug, Default, Deserialize)]
struct PresetsFile {
    #[serde(default)]
    presets: Vec<EnvironmentPreset>,
}

impl Tables {
    /// Loads every table from `data_dir` using the default loot file name.
    pub fn load(data_dir: &Path) -> DelveResult<Self> {
        Self::load_with_loot_file(data_dir, "loot_data.json")
    }

    /// Loads every table from `data_dir`, reading loot data from `loot_file`.
    ///
    /// Required files missing from the directory fail with
    /// [`DelveError::Configuration`]; optional files default to empty
    /// structures so the generators can degrade gracefully.
    pub fn load_with_loot_file(data_dir: &Path, loot_file: &str) -> DelveResult<Self> {
        let types: TypeTablesFile = load_required(&data_dir.join("encounter_types.json"))?;
        let progression: Progression = load_required(&data_dir.join("five_room_progression.json"))?;
        let combat_budgets: CombatBudgets =
            load_optional(&data_dir.join("combat_budgets.json"))?;
        let templates: TemplatesFile = load_required(&data_dir.join("encounter_tables.json"))?;
        let groups: EnemyGroupsFile = load_required(&data_dir.join("enemy_groups.json"))?;
        let monsters: MonstersFile = load_required(&data_dir.join("monsters.json"))?;
        let factions: FactionsFile = load_optional(&data_dir.join("factions.json"))?;
        let presets: PresetsFile = load_optional(&data_dir.join("environment_presets.json"))?;
        let puzzle: NoncombatTable = load_optional(&data_dir.join("puzzle_tables.json"))?;
        let social: NoncombatTable = load_optional(&data_dir.join("social_tables.json"))?;
        let exploration: NoncombatTable =
            load_optional(&data_dir.join("exploration_tables.json"))?;
        let loot: LootTables = load_required(&data_dir.join(loot_file))?;

        let tables = Self {
            encounter_types: types.tables,
            progression,
            combat_budgets,
            templates: templates.encounter_tables,
            enemy_groups: index_by_id(groups.groups, |g| &g.id),
            monsters: index_by_id(monsters.monsters, |m| &m.id),
            factions: index_by_id(factions.factions, |f| &f.id),
            presets: presets.presets,
            puzzle,
            social,
            exploration,
            loot,
        };

        info!(
            "loaded tables from {}: {} type tables, {} templates, {} enemy groups, {} monsters, {} factions, {} presets",
            data_dir.display(),
            tables.encounter_types.len(),
            tables.templates.len(),
            tables.enemy_groups.len(),
            tables.monsters.len(),
            tables.factions.len(),
            tables.presets.len(),
        );

        Ok(tables)
    }

    /// Looks up an environment preset by id.
    pub fn preset_by_id(&self, id: &str) -> Option<&EnvironmentPreset> {
        self.presets.iter().find(|p| p.id == id)
    }
}

/// Loads and parses a required JSON table file.
pub(crate) fn load_required<T: DeserializeOwned>(path: &Path) -> DelveResult<T> {
    if !path.exists() {
        return Err(DelveError::Configuration(format!(
            "required table file not found: {}",
            path.display()
        )));
    }
    parse_table(path)
}

/// Loads an optional JSON table file, defaulting when absent.
pub(crate) fn load_optional<T: DeserializeOwned + Default>(path: &Path) -> DelveResult<T> {
    if !path.exists() {
        debug!("optional table file absent: {}", path.display());
        return Ok(T::default());
    }
    parse_table(path)
}

fn parse_table<T: DeserializeOwned>(path: &Path) -> DelveResult<T> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| DelveError::Configuration(format!("{}: {}", path.display(), e)))
}

/// Indexes rows by id, skipping rows with an empty id. Later duplicates win.
fn index_by_id<T>(rows: Vec<T>, id: impl Fn(&T) -> &String) -> HashMap<String, T> {
    let mut out = HashMap::with_capacity(rows.len());
    for row in rows {
        let key = id(&row).clone();
        if key.is_empty() {
            continue;
        }
        out.insert(key, row);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_defaults() {
        let gate: Gate = serde_json::from_str("{}").unwrap();
        assert!(gate.biomes.is_empty());
        assert!(gate.slots.is_empty());
        assert_eq!(gate.min_level, 1);
        assert_eq!(gate.max_level, 99);
    }

    #[test]
    fn test_empty_list_is_wildcard() {
        assert!(list_allows(&[], "forest"));
        assert!(list_allows(&["any".to_string()], "forest"));
        assert!(list_allows(
            &["dungeon".to_string(), "forest".to_string()],
            "forest"
        ));
        assert!(!list_allows(&["dungeon".to_string()], "forest"));
    }

    #[test]
    fn test_gate_level_bounds_inclusive() {
        let gate = Gate {
            min_level: 5,
            max_level: 10,
            ..Gate::default()
        };
        assert!(!gate.allows_level(4));
        assert!(gate.allows_level(5));
        assert!(gate.allows_level(7));
        assert!(gate.allows_level(10));
        assert!(!gate.allows_level(11));
    }

    #[test]
    fn test_index_by_id_skips_empty_and_keeps_last() {
        let monsters = vec![
            Monster {
                id: "goblin".to_string(),
                name: Some("Goblin".to_string()),
                ..Monster::default()
            },
            Monster {
                id: String::new(),
                ..Monster::default()
            },
            Monster {
                id: "goblin".to_string(),
                name: Some("Goblin Chief".to_string()),
                ..Monster::default()
            },
        ];
        let index = index_by_id(monsters, |m| &m.id);
        assert_eq!(index.len(), 1);
        assert_eq!(
            index["goblin"].name.as_deref(),
            Some("Goblin Chief")
        );
    }
}
