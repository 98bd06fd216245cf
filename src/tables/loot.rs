//! # Loot Tables
//!
//! Coin values, per-level GP budgets, and the magic/mundane item pools.

use super::{default_weight, load_required, Gate};
use crate::DelveResult;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Contents of `loot_data.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LootTables {
    /// Coin denomination -> GP value (e.g. pp=10.0, gp=1.0, sp=0.1)
    #[serde(rename = "coin_values_gp")]
    pub coin_values: BTreeMap<String, f64>,
    /// Level -> total GP budget; levels without an entry are invalid
    #[serde(rename = "level_budgets_gp")]
    pub level_budgets: BTreeMap<i32, f64>,
    /// Level-gated magic item pool
    #[serde(default)]
    pub magic_items: Vec<MagicItem>,
    /// Un-gated mundane goods pool
    #[serde(default)]
    pub mundane_goods: Vec<MundaneItem>,
}

impl LootTables {
    /// Loads loot tables from a single JSON file.
    pub fn load(path: &Path) -> DelveResult<Self> {
        load_required(path)
    }

    /// Coin denominations ordered highest GP value first.
    ///
    /// Denomination order is significant for the coin allocation loop; ties
    /// break on denomination name so the order is total.
    pub fn denominations(&self) -> Vec<(&str, f64)> {
        let mut denoms: Vec<(&str, f64)> = self
            .coin_values
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        denoms.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(b.0)));
        denoms
    }
}

/// A magic item table row.
#[derive(Debug, Clone, Deserialize)]
pub struct MagicItem {
    /// Item id
    #[serde(default)]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Rarity band
    #[serde(default = "default_rarity")]
    pub rarity: String,
    /// GP value
    #[serde(default)]
    pub gp_value: f64,
    /// Selection weight
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Level gate (biome/slot lists unused by loot)
    #[serde(flatten)]
    pub gate: Gate,
}

impl Default for MagicItem {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            rarity: default_rarity(),
            gp_value: 0.0,
            weight: 1.0,
            gate: Gate::default(),
        }
    }
}

/// A mundane goods table row. Mundane items are not level-gated.
#[derive(Debug, Clone, Deserialize)]
pub struct MundaneItem {
    /// Item id
    #[serde(default)]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// GP value
    #[serde(default)]
    pub gp_value: f64,
    /// Selection weight
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Default for MundaneItem {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            gp_value: 0.0,
            weight: 1.0,
        }
    }
}

fn default_rarity() -> String {
    "common".to_string()
}
