//! # Loot Generation
//!
//! Turns an encounter level and a roll count into loot parcels: a randomized
//! coin mixture plus zero-or-one magic or mundane item per parcel, with a
//! derived total GP value.

use super::{create_rng, weighted_choice};
use crate::records::{LootRecord, MagicItemAward, MundaneItemAward, Parcel, LOOT_SCHEMA};
use crate::tables::{LootTables, MagicItem, MundaneItem};
use crate::{config, DelveError, DelveResult};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeMap;

/// Generates loot parcels from a loot table set and a seeded stream.
///
/// One instance owns one random stream; parcels generated by consecutive
/// calls draw from the same stream in order.
pub struct LootGenerator<'a> {
    tables: &'a LootTables,
    seed: u64,
    rng: StdRng,
}

impl<'a> LootGenerator<'a> {
    /// Creates a generator over `tables` seeded with `seed`.
    pub fn new(tables: &'a LootTables, seed: u64) -> Self {
        Self {
            tables,
            seed,
            rng: create_rng(seed),
        }
    }

    /// Generates `rolls` parcels (coerced to at least 1) for `level`.
    ///
    /// Fails with [`DelveError::Configuration`] when `level` has no entry in
    /// the level budget map; budgets are never interpolated.
    pub fn generate(&mut self, level: i32, rolls: u32) -> DelveResult<LootRecord> {
        let rolls = rolls.max(1);
        let base_budget = *self.tables.level_budgets.get(&level).ok_or_else(|| {
            DelveError::Configuration(format!("level {} not found in level_budgets_gp", level))
        })?;

        let magic_pool: Vec<&MagicItem> = self
            .tables
            .magic_items
            .iter()
            .filter(|item| item.gate.allows_level(level))
            .collect();
        debug!(
            "loot generate: level={} rolls={} budget={} magic_pool={}",
            level,
            rolls,
            base_budget,
            magic_pool.len()
        );

        let mut parcels = Vec::with_capacity(rolls as usize);
        for _ in 0..rolls {
            parcels.push(self.generate_parcel(base_budget, &magic_pool));
        }

        Ok(LootRecord {
            schema: LOOT_SCHEMA.to_string(),
            seed: self.seed,
            encounter_level: level,
            rolls,
            parcels,
        })
    }

    /// Generates a single parcel against the level budget.
    fn generate_parcel(&mut self, base_budget: f64, magic_pool: &[&MagicItem]) -> Parcel {
        let coins = self.generate_coins(base_budget * config::COIN_BUDGET_RATIO);

        let mut magic_items = Vec::new();
        let mut mundane_items = Vec::new();

        // The item-type draw is consumed even when the magic pool is empty,
        // keeping the stream position independent of pool contents.
        let item_roll = self.rng.gen::<f64>();
        if item_roll < config::MAGIC_ITEM_CHANCE && !magic_pool.is_empty() {
            let pool: Vec<(&MagicItem, f64)> =
                magic_pool.iter().map(|item| (*item, item.weight)).collect();
            if let Some(item) = weighted_choice(&mut self.rng, &pool) {
                magic_items.push(MagicItemAward {
                    id: item.id.clone(),
                    name: item.name.clone(),
                    rarity: item.rarity.clone(),
                    gp_value: item.gp_value,
                });
            }
        } else {
            let pool: Vec<(&MundaneItem, f64)> = self
                .tables
                .mundane_goods
                .iter()
                .map(|item| (item, item.weight))
                .collect();
            if let Some(item) = weighted_choice(&mut self.rng, &pool) {
                mundane_items.push(MundaneItemAward {
                    id: item.id.clone(),
                    name: item.name.clone(),
                    gp_value: item.gp_value,
                });
            }
        }

        let total = parcel_value(&coins, &magic_items, &mundane_items, &self.tables.coin_values);
        Parcel {
            coins,
            magic_items,
            mundane_items,
            total_value_gp: round2(total),
        }
    }

    /// Converts a GP budget into a random coin mixture.
    ///
    /// Denominations are visited highest value first; each draws a uniform
    /// count in `[0, floor(remaining / value)]` and reduces the remaining
    /// budget. The allocation is intentionally loose: it biases toward high
    /// denominations and can leave part of the budget unspent, but can never
    /// exceed it.
    fn generate_coins(&mut self, budget: f64) -> BTreeMap<String, u64> {
        let mut remaining = budget;
        let mut out = BTreeMap::new();

        for (denom, value) in self.tables.denominations() {
            if remaining <= 0.0 {
                break;
            }
            let max_qty = (remaining / value) as u64;
            if max_qty == 0 {
                continue;
            }
            let qty = self.rng.gen_range(0..=max_qty);
            if qty > 0 {
                out.insert(denom.to_string(), qty);
                remaining -= qty as f64 * value;
            }
        }

        out
    }
}

/// Sums a parcel's GP value: coins at their table value plus item values.
/// Unknown denominations count as 0.
fn parcel_value(
    coins: &BTreeMap<String, u64>,
    magic_items: &[MagicItemAward],
    mundane_items: &[MundaneItemAward],
    coin_values: &BTreeMap<String, f64>,
) -> f64 {
    let coin_total: f64 = coins
        .iter()
        .map(|(denom, count)| coin_values.get(denom).copied().unwrap_or(0.0) * *count as f64)
        .sum();
    let magic_total: f64 = magic_items.iter().map(|item| item.gp_value).sum();
    let mundane_total: f64 = mundane_items.iter().map(|item| item.gp_value).sum();
    coin_total + magic_total + mundane_total
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Generates loot parcels for `level`: the public, pure entry point.
///
/// Output depends only on `(level, rolls, seed, tables)`.
pub fn generate_loot(
    level: i32,
    rolls: u32,
    seed: u64,
    tables: &LootTables,
) -> DelveResult<LootRecord> {
    LootGenerator::new(tables, seed).generate(level, rolls)
}
