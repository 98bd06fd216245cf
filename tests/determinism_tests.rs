//! Determinism guarantees: fixed tables + fixed seed must reproduce records
//! byte-for-byte, and dungeon generation must equal sequential single-room
//! generation on one shared stream.

mod common;

use delve::generation::dungeon::clamp_level;
use delve::{
    generate_five_room_dungeon, generate_loot, generate_single_encounter, EncounterGenerator,
};

#[test]
fn test_loot_determinism() {
    let tables = common::loot_tables();
    let a = generate_loot(5, 3, 1234, &tables).unwrap();
    let b = generate_loot(5, 3, 1234, &tables).unwrap();

    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_encounter_determinism() {
    let tables = common::tables();
    for seed in [0u64, 1, 42, 999_999] {
        let a = generate_single_encounter(3, "dungeon", "entrance", seed, &tables).unwrap();
        let b = generate_single_encounter(3, "dungeon", "entrance", seed, &tables).unwrap();
        assert_eq!(a, b, "seed {}", seed);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}

#[test]
fn test_dungeon_determinism() {
    let tables = common::tables();
    let a = generate_five_room_dungeon(3, "dungeon", 777, &tables, None).unwrap();
    let b = generate_five_room_dungeon(3, "dungeon", 777, &tables, None).unwrap();

    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string_pretty(&a).unwrap(),
        serde_json::to_string_pretty(&b).unwrap()
    );
}

#[test]
fn test_dungeon_equals_sequential_room_generation() {
    let tables = common::tables();
    let seed = 4242;

    let dungeon = generate_five_room_dungeon(3, "dungeon", seed, &tables, None).unwrap();

    // Replay the same room sequence through one shared generator: every
    // room's encounter must land on the same stream positions.
    let mut generator = EncounterGenerator::new(&tables, seed);
    for room in &dungeon.rooms {
        let delta = tables.progression.difficulty_delta(&room.slot);
        let room_level = clamp_level(3 + delta, &tables.combat_budgets);
        let encounter = generator
            .generate_encounter(room_level, "dungeon", &room.slot)
            .unwrap();
        assert_eq!(encounter, room.encounter, "slot {}", room.slot);
    }
}

#[test]
fn test_nested_loot_seeds_come_from_parent_stream() {
    let mut tables = common::tables();
    common::force_encounter_type(&mut tables, "combat");

    // The loot record's seed is drawn from the encounter stream, so it is
    // itself deterministic for a fixed parent seed.
    let a = generate_single_encounter(3, "dungeon", "entrance", 7, &tables).unwrap();
    let b = generate_single_encounter(3, "dungeon", "entrance", 7, &tables).unwrap();
    let loot_a = a.encounter.loot.as_ref().unwrap();
    let loot_b = b.encounter.loot.as_ref().unwrap();
    assert_eq!(loot_a.seed, loot_b.seed);
    assert!(loot_a.seed <= 999_999);
}

#[test]
fn test_different_seeds_diverge() {
    // Not a strict requirement seed-by-seed, but across a spread of seeds
    // the outputs cannot all collide; this guards against the seed being
    // ignored entirely.
    let tables = common::tables();
    let baseline = serde_json::to_string(
        &generate_five_room_dungeon(3, "dungeon", 0, &tables, None).unwrap(),
    )
    .unwrap();
    let diverged = (1u64..20).any(|seed| {
        let dungeon = generate_five_room_dungeon(3, "dungeon", seed, &tables, None).unwrap();
        serde_json::to_string(&dungeon).unwrap() != baseline
    });
    assert!(diverged);
}
