//! # Generation Module
//!
//! The weighted-selection and constraint-filtering core shared by loot and
//! encounter generation, plus the generators built on top of it.
//!
//! All randomness flows through a single seeded [`StdRng`] owned by the
//! calling generator. The primitives here consume the stream in a fixed,
//! documented order so that composite records stay reproducible from one
//! seed: [`weighted_choice`] consumes exactly one draw when the pool has
//! positive total weight (and none otherwise), and [`uniform_choice`]
//! consumes exactly one draw for a non-empty pool.

pub mod dungeon;
pub mod encounter;
pub mod loot;

pub use dungeon::generate_five_room_dungeon;
pub use encounter::{generate_single_encounter, EncounterGenerator};
pub use loot::{generate_loot, LootGenerator};

use crate::config;
use crate::tables::Gate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates the seeded random number generator used by every generator.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Trait for table rows gated by biome, slot, and level range.
pub trait Gated {
    /// The row's gate.
    fn gate(&self) -> &Gate;
}

impl Gated for crate::tables::CombatTemplate {
    fn gate(&self) -> &Gate {
        &self.gate
    }
}

impl Gated for crate::tables::NoncombatEntry {
    fn gate(&self) -> &Gate {
        &self.gate
    }
}

impl Gated for crate::tables::MagicItem {
    fn gate(&self) -> &Gate {
        &self.gate
    }
}

/// Filters a pool down to the entries whose gate admits the request.
///
/// An empty result is a first-class outcome; the caller decides the fallback
/// policy (hard failure for combat, empty encounter for noncombat).
pub fn filter_gated<'a, T: Gated>(
    pool: &'a [T],
    level: i32,
    biome: &str,
    slot: &str,
) -> Vec<&'a T> {
    pool.iter()
        .filter(|entry| entry.gate().allows(level, biome, slot))
        .collect()
}

/// Selects one candidate from a weighted pool.
///
/// Weights below zero count as zero. When the total weight is not positive
/// the first candidate is returned unconditionally without consuming a draw;
/// otherwise exactly one uniform draw in `[0, total)` is consumed and the
/// candidates are scanned in input order, returning the first whose
/// cumulative weight meets the draw. Input order is significant at
/// floating-point boundaries and must be preserved by callers.
pub fn weighted_choice<'a, T: ?Sized>(
    rng: &mut StdRng,
    pool: &[(&'a T, f64)],
) -> Option<&'a T> {
    let first = pool.first()?.0;
    let total: f64 = pool.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return Some(first);
    }
    let roll = rng.gen::<f64>() * total;
    let mut acc = 0.0;
    for &(candidate, weight) in pool {
        acc += weight.max(0.0);
        if roll <= acc {
            return Some(candidate);
        }
    }
    pool.last().map(|&(candidate, _)| candidate)
}

/// Selects one candidate uniformly. Consumes one draw unless the pool is
/// empty.
pub fn uniform_choice<'a, T: ?Sized>(rng: &mut StdRng, pool: &[&'a T]) -> Option<&'a T> {
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.gen_range(0..pool.len())])
}

/// Draws a fresh sub-seed from the parent stream for a nested loot call.
pub(crate) fn sub_seed(rng: &mut StdRng) -> u64 {
    rng.gen_range(0..=config::MAX_SEED)
}
