//! # Five-Room Dungeon Orchestration
//!
//! Composes five (or however many slots the progression defines) encounters
//! into a dungeon record. The whole dungeon shares one generator instance
//! and one random stream, so room N's draws always precede room N+1's and
//! the result is reproducible from a single seed.

use super::encounter::EncounterGenerator;
use crate::records::{DungeonRecord, DungeonRoom, DUNGEON_SCHEMA};
use crate::tables::{CombatBudgets, Tables};
use crate::DelveResult;
use log::debug;

/// Clamps a room level to the range of levels the combat budget table
/// defines. With no budgets configured the level is only floored at 1.
pub fn clamp_level(level: i32, budgets: &CombatBudgets) -> i32 {
    let keys = &budgets.budgets;
    match (keys.keys().next(), keys.keys().next_back()) {
        (Some(&min), Some(&max)) => level.clamp(min, max),
        _ => level.max(1),
    }
}

impl<'a> EncounterGenerator<'a> {
    /// Generates a dungeon: one encounter per progression slot, in order.
    ///
    /// `slots` overrides the progression table's default order when
    /// non-empty. Room levels are the base level plus each slot's
    /// difficulty delta, clamped per [`clamp_level`]. Room indices are
    /// 1-based and sequential, independent of slot semantics.
    pub fn generate_five_room_dungeon(
        &mut self,
        base_level: i32,
        biome: &str,
        slots: Option<&[String]>,
    ) -> DelveResult<DungeonRecord> {
        let order: Vec<String> = match slots {
            Some(order) if !order.is_empty() => order.to_vec(),
            _ => self.tables().progression.order(),
        };

        let mut rooms = Vec::with_capacity(order.len());
        for (idx, slot) in order.iter().enumerate() {
            let delta = self.tables().progression.difficulty_delta(slot);
            let room_level = clamp_level(base_level + delta, &self.tables().combat_budgets);
            debug!(
                "room {}: slot={} delta={} level={}",
                idx + 1,
                slot,
                delta,
                room_level
            );
            let encounter = self.generate_encounter(room_level, biome, slot)?;
            rooms.push(DungeonRoom {
                slot: slot.clone(),
                room_index: (idx + 1) as u32,
                encounter,
            });
        }

        Ok(DungeonRecord {
            schema: DUNGEON_SCHEMA.to_string(),
            seed: self.seed(),
            biome: biome.to_string(),
            base_level,
            rooms,
        })
    }
}

/// Generates a five-room dungeon: the public, pure entry point.
///
/// Output depends only on `(base_level, biome, seed, tables, slots)`.
pub fn generate_five_room_dungeon(
    base_level: i32,
    biome: &str,
    seed: u64,
    tables: &Tables,
    slots: Option<&[String]>,
) -> DelveResult<DungeonRecord> {
    let mut generator = EncounterGenerator::new(tables, seed);
    generator.generate_five_room_dungeon(base_level, biome, slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budgets(levels: &[i32]) -> CombatBudgets {
        CombatBudgets {
            budgets: levels.iter().map(|&l| (l, 100.0)).collect(),
        }
    }

    #[test]
    fn test_clamp_level_to_budget_keys() {
        let budgets = budgets(&[2, 3, 4, 5]);
        assert_eq!(clamp_level(1, &budgets), 2);
        assert_eq!(clamp_level(3, &budgets), 3);
        assert_eq!(clamp_level(9, &budgets), 5);
    }

    #[test]
    fn test_clamp_level_without_budgets() {
        let empty = CombatBudgets::default();
        assert_eq!(clamp_level(-3, &empty), 1);
        assert_eq!(clamp_level(0, &empty), 1);
        assert_eq!(clamp_level(7, &empty), 7);
    }
}
