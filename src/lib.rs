//! # Delve
//!
//! A data-driven generator for tabletop-RPG content: monetary/item loot
//! parcels and five-room dungeon encounter sequences, produced from
//! declarative JSON tables with a seeded pseudo-random stream.
//!
//! ## Architecture Overview
//!
//! The crate is organized around a small set of cooperating pieces:
//!
//! - **Tables**: typed, read-only content tables loaded once from JSON
//! - **Records**: versioned, serializable output shapes (`loot.v1`,
//!   `encounter.v1`, `dungeon.5room.v1`)
//! - **Generation**: the weighted-selection and constraint-filtering core,
//!   plus the loot, encounter, and five-room dungeon generators built on it
//!
//! ## Determinism
//!
//! Every generation entry point takes an explicit seed and consumes a single
//! sequential random stream in a fixed order. Re-running with the same seed
//! and the same tables reproduces identical output, including the records'
//! serialized JSON.

pub mod generation;
pub mod records;
pub mod tables;

pub use generation::{
    generate_five_room_dungeon, generate_loot, generate_single_encounter, EncounterGenerator,
    LootGenerator,
};
pub use records::{
    DungeonRecord, DungeonRoom, Encounter, EncounterKind, EncounterMeta, EncounterRecord,
    EnemyUnit, Environment, LootRecord, MagicItemAward, MundaneItemAward, Parcel,
};
pub use tables::{Gate, LootTables, Tables};

/// Core error type for the Delve generators.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A required table file or key is missing, or a level has no budget
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Combat generation found no template or enemy group matching constraints
    #[error("No candidates: {0}")]
    NoCandidates(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation tuning constants.
pub mod config {
    /// Fraction of a level's GP budget allocated to coins per parcel
    pub const COIN_BUDGET_RATIO: f64 = 0.20;

    /// Probability that a parcel's item roll yields a magic item
    pub const MAGIC_ITEM_CHANCE: f64 = 0.4;

    /// Die size used by encounter-type tables that do not configure one
    pub const DEFAULT_TYPE_DIE: u32 = 20;

    /// Level gate defaults for table rows that omit them
    pub const DEFAULT_MIN_LEVEL: i32 = 1;

    /// Upper level gate default
    pub const DEFAULT_MAX_LEVEL: i32 = 99;

    /// Wildcard value accepted by biome and slot gate lists
    pub const ANY: &str = "any";

    /// Upper bound (inclusive) for derived sub-seeds and CLI default seeds
    pub const MAX_SEED: u64 = 999_999;
}
