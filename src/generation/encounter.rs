//! # Encounter Generation
//!
//! Single-encounter generation: type selection, combat and noncombat
//! assembly, environment selection, and the empty-encounter fallback.
//!
//! The generator owns one seeded stream. Draw order per encounter is fixed:
//! type-table choice, die roll, then the chosen branch's draws (template
//! selection, enemy counts, environment choice, loot sub-seed). Callers that
//! need several encounters from one seed reuse one instance so the stream
//! advances across calls.

use super::{create_rng, filter_gated, sub_seed, uniform_choice, weighted_choice};
use super::loot::generate_loot;
use crate::records::{
    merge_tags, Encounter, EncounterKind, EncounterMeta, EncounterRecord, EnemyUnit, Environment,
    ENCOUNTER_SCHEMA,
};
use crate::tables::{CombatTemplate, EnvironmentPreset, NoncombatEntry, Tables, TypeTable};
use crate::{DelveError, DelveResult};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// Generates encounters and dungeons from a table set and a seeded stream.
pub struct EncounterGenerator<'a> {
    tables: &'a Tables,
    seed: u64,
    rng: StdRng,
}

impl<'a> EncounterGenerator<'a> {
    /// Creates a generator over `tables` seeded with `seed`.
    pub fn new(tables: &'a Tables, seed: u64) -> Self {
        Self {
            tables,
            seed,
            rng: create_rng(seed),
        }
    }

    /// The seed this generator's stream was derived from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The tables this generator draws from.
    pub fn tables(&self) -> &'a Tables {
        self.tables
    }

    /// Generates one encounter for `(level, biome, slot)`, advancing the
    /// stream. Dispatches on the rolled encounter type.
    pub fn generate_encounter(
        &mut self,
        level: i32,
        biome: &str,
        slot: &str,
    ) -> DelveResult<Encounter> {
        let kind = self.choose_encounter_type(biome, slot);
        debug!(
            "encounter: level={} biome={} slot={} type={:?}",
            level, biome, slot, kind
        );
        match kind {
            EncounterKind::Combat => self.generate_combat(level, biome, slot),
            EncounterKind::Puzzle | EncounterKind::Social | EncounterKind::Exploration => {
                self.generate_noncombat(level, biome, slot, kind)
            }
            EncounterKind::Empty => Ok(Encounter::empty(level, biome, slot)),
        }
    }

    /// Two-stage type selection: pick a matching type table uniformly, then
    /// roll its die against the ordered row ranges.
    ///
    /// Tables are filtered by biome/slot; no match falls back to the
    /// unfiltered list. A roll no row contains defaults to combat, as does
    /// an empty type-table file.
    fn choose_encounter_type(&mut self, biome: &str, slot: &str) -> EncounterKind {
        let tables = &self.tables.encounter_types;
        if tables.is_empty() {
            return EncounterKind::Combat;
        }

        let mut candidates: Vec<&TypeTable> = tables
            .iter()
            .filter(|t| t.gate.allows_biome(biome) && t.gate.allows_slot(slot))
            .collect();
        if candidates.is_empty() {
            candidates = tables.iter().collect();
        }

        let Some(table) = uniform_choice(&mut self.rng, &candidates) else {
            return EncounterKind::Combat;
        };

        let die = table.die.max(1);
        let roll = self.rng.gen_range(1..=die);
        for row in &table.rows {
            if row.contains(roll) {
                return EncounterKind::parse(&row.kind);
            }
        }
        EncounterKind::Combat
    }

    /// Generates a combat encounter. Combat cannot degrade to empty: an
    /// exhausted template pool or unresolvable enemy group is a hard
    /// failure.
    fn generate_combat(&mut self, level: i32, biome: &str, slot: &str) -> DelveResult<Encounter> {
        if self.tables.templates.is_empty() {
            return Err(DelveError::NoCandidates(
                "no combat encounter templates configured".to_string(),
            ));
        }

        let candidates = filter_gated(&self.tables.templates, level, biome, slot);
        if candidates.is_empty() {
            return Err(DelveError::NoCandidates(format!(
                "no combat template matches level={}, biome={}, slot={}",
                level, biome, slot
            )));
        }

        let pool: Vec<(&CombatTemplate, f64)> = candidates
            .iter()
            .map(|tpl| {
                let weight = tpl.weight * self.faction_weight(tpl, biome, slot);
                (*tpl, weight.max(0.0))
            })
            .collect();
        let Some(template) = weighted_choice(&mut self.rng, &pool) else {
            return Err(DelveError::NoCandidates(
                "combat template pool drained during selection".to_string(),
            ));
        };
        debug!("combat template selected: {:?}", template.id);

        let enemies = self.instantiate_enemy_group(template.enemy_group_id.as_deref())?;
        let environment = self.select_environment(biome, &template.environment_tags, None);
        let tags = merge_tags(&template.tags, &environment.tags);

        let loot_seed = sub_seed(&mut self.rng);
        let loot = generate_loot(level, template.loot_rolls, loot_seed, &self.tables.loot)?;

        Ok(Encounter {
            difficulty: level,
            kind: EncounterKind::Combat,
            slot: slot.to_string(),
            biome: biome.to_string(),
            enemies,
            environment,
            tags,
            loot: Some(loot),
            meta: EncounterMeta {
                template_id: template.id.clone(),
                noncombat_id: None,
                notes: template.notes.clone(),
            },
        })
    }

    /// Compound faction modifier for a template: the product of every listed
    /// faction's biome and slot multipliers (1.0 when unlisted).
    ///
    /// A product that is not positive resets to 1.0 so one misconfigured
    /// modifier cannot zero out the whole candidate pool.
    fn faction_weight(&self, template: &CombatTemplate, biome: &str, slot: &str) -> f64 {
        if template.factions.is_empty() || self.tables.factions.is_empty() {
            return 1.0;
        }

        let mut weight = 1.0;
        for faction_id in &template.factions {
            let Some(faction) = self.tables.factions.get(faction_id) else {
                continue;
            };
            let mods = &faction.weight_modifiers;
            if let Some(m) = mods.biomes.get(biome) {
                weight *= m;
            }
            if let Some(m) = mods.slots.get(slot) {
                weight *= m;
            }
        }

        if weight > 0.0 {
            weight
        } else {
            debug!(
                "faction modifier for {:?} is non-positive; resetting to 1.0",
                template.id
            );
            1.0
        }
    }

    /// Rolls counts for each entry of the template's enemy group and
    /// resolves monster metadata from the roster.
    fn instantiate_enemy_group(&mut self, group_id: Option<&str>) -> DelveResult<Vec<EnemyUnit>> {
        let group_id = group_id.ok_or_else(|| {
            DelveError::NoCandidates("combat template missing enemy_group_id".to_string())
        })?;
        let group = self.tables.enemy_groups.get(group_id).ok_or_else(|| {
            DelveError::NoCandidates(format!("enemy group not found: {}", group_id))
        })?;

        let mut units = Vec::new();
        for entry in &group.enemies {
            let (min, max) = entry.count.resolve();
            let count = self.rng.gen_range(min..=max);
            if count == 0 {
                continue;
            }
            let monster = self.tables.monsters.get(&entry.monster_id);
            units.push(EnemyUnit {
                monster_id: entry.monster_id.clone(),
                name: monster
                    .and_then(|m| m.name.clone())
                    .unwrap_or_else(|| entry.monster_id.clone()),
                count,
                cr: monster.and_then(|m| m.cr),
                faction: monster
                    .and_then(|m| m.faction.clone())
                    .or_else(|| group.faction.clone()),
                tags: monster.map(|m| m.tags.clone()).unwrap_or_default(),
            });
        }
        Ok(units)
    }

    /// Selects an environment descriptor.
    ///
    /// A requested preset id that resolves is returned directly, with no
    /// draw. Otherwise candidates narrow in stages: biome plus tag overlap,
    /// then biome only, then the full pool, and one uniform draw picks from
    /// the first non-empty stage. With no presets configured at all the
    /// neutral descriptor is returned.
    fn select_environment(
        &mut self,
        biome: &str,
        tags: &[String],
        specific_id: Option<&str>,
    ) -> Environment {
        let presets = &self.tables.presets;
        if presets.is_empty() {
            return Environment::neutral();
        }

        if let Some(id) = specific_id {
            if let Some(preset) = self.tables.preset_by_id(id) {
                return environment_from(preset);
            }
        }

        let biome_matches: Vec<&EnvironmentPreset> = presets
            .iter()
            .filter(|p| crate::tables::list_allows(&p.biomes, biome))
            .collect();
        let tag_matches: Vec<&EnvironmentPreset> = biome_matches
            .iter()
            .copied()
            .filter(|p| tags.is_empty() || tags.iter().any(|t| p.tags.contains(t)))
            .collect();

        let pool = if !tag_matches.is_empty() {
            tag_matches
        } else if !biome_matches.is_empty() {
            biome_matches
        } else {
            presets.iter().collect()
        };

        uniform_choice(&mut self.rng, &pool)
            .map(environment_from)
            .unwrap_or_else(Environment::neutral)
    }

    /// Generates a noncombat (puzzle/social/exploration) encounter.
    ///
    /// Unlike combat, this path degrades to the empty encounter whenever the
    /// table is absent, has no entries, or filtering leaves nothing. Faction
    /// modifiers do not apply to noncombat weights.
    fn generate_noncombat(
        &mut self,
        level: i32,
        biome: &str,
        slot: &str,
        kind: EncounterKind,
    ) -> DelveResult<Encounter> {
        let table = match kind {
            EncounterKind::Puzzle => &self.tables.puzzle,
            EncounterKind::Social => &self.tables.social,
            EncounterKind::Exploration => &self.tables.exploration,
            _ => return Ok(Encounter::empty(level, biome, slot)),
        };

        if table.entries.is_empty() {
            return Ok(Encounter::empty(level, biome, slot));
        }
        let candidates = filter_gated(&table.entries, level, biome, slot);
        if candidates.is_empty() {
            return Ok(Encounter::empty(level, biome, slot));
        }

        let pool: Vec<(&NoncombatEntry, f64)> = candidates
            .iter()
            .map(|entry| (*entry, entry.weight))
            .collect();
        let Some(entry) = weighted_choice(&mut self.rng, &pool) else {
            return Ok(Encounter::empty(level, biome, slot));
        };
        debug!("noncombat entry selected: {:?}", entry.id);

        let environment = self.select_environment(
            biome,
            &entry.environment_tags,
            entry.environment_preset_id.as_deref(),
        );
        let tags = merge_tags(&entry.tags, &environment.tags);

        let loot = if entry.award_loot {
            let loot_seed = sub_seed(&mut self.rng);
            Some(generate_loot(
                level,
                entry.loot_rolls,
                loot_seed,
                &self.tables.loot,
            )?)
        } else {
            None
        };

        Ok(Encounter {
            difficulty: level,
            kind,
            slot: slot.to_string(),
            biome: biome.to_string(),
            enemies: Vec::new(),
            environment,
            tags,
            loot,
            meta: EncounterMeta {
                template_id: None,
                noncombat_id: entry.id.clone(),
                notes: entry.notes.clone(),
            },
        })
    }
}

/// Copies a preset into the output environment shape.
fn environment_from(preset: &EnvironmentPreset) -> Environment {
    Environment {
        preset_id: Some(preset.id.clone()),
        description: preset.description.clone(),
        tags: preset.tags.clone(),
        mechanical_effects: preset.mechanical_effects.clone(),
    }
}

/// Generates a single schema-wrapped encounter: the public, pure entry
/// point. Output depends only on `(level, biome, slot, seed, tables)`.
pub fn generate_single_encounter(
    level: i32,
    biome: &str,
    slot: &str,
    seed: u64,
    tables: &Tables,
) -> DelveResult<EncounterRecord> {
    let mut generator = EncounterGenerator::new(tables, seed);
    let encounter = generator.generate_encounter(level, biome, slot)?;
    Ok(EncounterRecord {
        schema: ENCOUNTER_SCHEMA.to_string(),
        seed,
        encounter,
    })
}
