//! Shared in-memory table fixtures for the integration tests.

#![allow(dead_code)]

use delve::tables::{LootTables, Tables};

/// Loot tables with budgets for levels 1..=10 and small item pools.
pub fn loot_tables() -> LootTables {
    serde_json::from_str(
        r#"{
            "coin_values_gp": {"pp": 10.0, "gp": 1.0, "sp": 0.1, "cp": 0.01},
            "level_budgets_gp": {
                "1": 50, "2": 80, "3": 150, "4": 250, "5": 400,
                "6": 600, "7": 900, "8": 1300, "9": 1800, "10": 2500
            },
            "magic_items": [
                {"id": "potion_healing", "name": "Potion of Healing", "rarity": "common",
                 "gp_value": 50, "weight": 5, "min_level": 1, "max_level": 10},
                {"id": "flame_blade", "name": "Flame Blade", "rarity": "rare",
                 "gp_value": 900, "weight": 1, "min_level": 5, "max_level": 10}
            ],
            "mundane_goods": [
                {"id": "rope", "name": "Hempen Rope", "gp_value": 1, "weight": 3},
                {"id": "lantern", "name": "Hooded Lantern", "gp_value": 5, "weight": 1}
            ]
        }"#,
    )
    .expect("loot fixture parses")
}

/// A complete table set: one mixed type table, a five-slot progression,
/// two combat templates, goblin/skeleton groups, factions, presets, and one
/// entry per noncombat table.
pub fn tables() -> Tables {
    let mut tables = Tables::default();

    tables.encounter_types = serde_json::from_str(
        r#"[{
            "id": "standard",
            "die": 20,
            "rows": [
                {"min": 1, "max": 10, "type": "combat"},
                {"min": 11, "max": 14, "type": "puzzle"},
                {"min": 15, "max": 17, "type": "social"},
                {"min": 18, "max": 19, "type": "exploration"},
                {"min": 20, "max": 20, "type": "empty"}
            ]
        }]"#,
    )
    .expect("type tables parse");

    tables.progression = serde_json::from_str(
        r#"{
            "slots": {
                "entrance": {"difficulty_delta": -1},
                "puzzle": {"difficulty_delta": 0},
                "setback": {"difficulty_delta": 1},
                "climax": {"difficulty_delta": 2},
                "aftermath": {"difficulty_delta": 0}
            },
            "default_order": ["entrance", "puzzle", "setback", "climax", "aftermath"]
        }"#,
    )
    .expect("progression parses");

    tables.combat_budgets = serde_json::from_str(
        r#"{"budgets": {"1": 25, "2": 50, "3": 75, "4": 125, "5": 250,
                        "6": 300, "7": 350, "8": 450, "9": 550, "10": 600}}"#,
    )
    .expect("budgets parse");

    tables.templates = serde_json::from_str(
        r#"[
            {
                "id": "goblin_ambush",
                "weight": 2.0,
                "biomes": ["dungeon", "forest"],
                "min_level": 1,
                "max_level": 5,
                "enemy_group_id": "goblins",
                "environment_tags": ["tight_quarters"],
                "tags": ["ambush", "raiders"],
                "factions": ["goblin_tribe"],
                "loot_rolls": 1
            },
            {
                "id": "skeleton_patrol",
                "weight": 1.0,
                "biomes": ["dungeon"],
                "min_level": 1,
                "max_level": 10,
                "enemy_group_id": "skeletons",
                "tags": ["undead"]
            }
        ]"#,
    )
    .expect("templates parse");

    let groups: Vec<delve::tables::EnemyGroup> = serde_json::from_str(
        r#"[
            {
                "id": "goblins",
                "faction": "goblin_tribe",
                "enemies": [
                    {"monster_id": "goblin", "count": {"min": 2, "max": 4}},
                    {"monster_id": "goblin_boss", "count": {"min": 0, "max": 1}}
                ]
            },
            {
                "id": "skeletons",
                "enemies": [
                    {"monster_id": "skeleton", "count": {"min": 1, "max": 3}}
                ]
            }
        ]"#,
    )
    .expect("groups parse");
    tables.enemy_groups = groups.into_iter().map(|g| (g.id.clone(), g)).collect();

    let monsters: Vec<delve::tables::Monster> = serde_json::from_str(
        r#"[
            {"id": "goblin", "name": "Goblin", "cr": 0.25,
             "faction": "goblin_tribe", "tags": ["humanoid", "sneaky"]},
            {"id": "goblin_boss", "name": "Goblin Boss", "cr": 1.0,
             "faction": "goblin_tribe", "tags": ["humanoid"]},
            {"id": "skeleton", "name": "Skeleton", "cr": 0.25, "tags": ["undead"]}
        ]"#,
    )
    .expect("monsters parse");
    tables.monsters = monsters.into_iter().map(|m| (m.id.clone(), m)).collect();

    let factions: Vec<delve::tables::Faction> = serde_json::from_str(
        r#"[{
            "id": "goblin_tribe",
            "weight_modifiers": {
                "biomes": {"forest": 2.0},
                "slots": {"entrance": 1.5}
            }
        }]"#,
    )
    .expect("factions parse");
    tables.factions = factions.into_iter().map(|f| (f.id.clone(), f)).collect();

    tables.presets = serde_json::from_str(
        r#"[
            {
                "id": "narrow_passage",
                "description": "A cramped stone corridor with a low ceiling.",
                "biomes": ["dungeon"],
                "tags": ["tight_quarters"],
                "mechanical_effects": {"squeeze": true}
            },
            {
                "id": "mossy_grove",
                "description": "Moss-choked trees crowd a narrow clearing.",
                "biomes": ["forest"],
                "tags": ["overgrown"]
            }
        ]"#,
    )
    .expect("presets parse");

    tables.puzzle = serde_json::from_str(
        r#"{"entries": [{
            "id": "locked_door",
            "weight": 1.0,
            "environment_tags": ["tight_quarters"],
            "tags": ["mechanism"]
        }]}"#,
    )
    .expect("puzzle table parses");

    tables.social = serde_json::from_str(
        r#"{"entries": [{
            "id": "wary_merchant",
            "weight": 1.0,
            "tags": ["negotiation"],
            "award_loot": true,
            "loot_rolls": 1
        }]}"#,
    )
    .expect("social table parses");

    tables.exploration = serde_json::from_str(
        r#"{"entries": [{
            "id": "collapsed_bridge",
            "weight": 1.0,
            "tags": ["hazard"]
        }]}"#,
    )
    .expect("exploration table parses");

    tables.loot = loot_tables();
    tables
}

/// Replaces the encounter-type tables with a single-row d1 table so every
/// encounter resolves to `kind`.
pub fn force_encounter_type(tables: &mut Tables, kind: &str) {
    tables.encounter_types = serde_json::from_str(&format!(
        r#"[{{"id": "forced", "die": 1, "rows": [{{"min": 1, "max": 1, "type": "{}"}}]}}]"#,
        kind
    ))
    .expect("forced type table parses");
}
