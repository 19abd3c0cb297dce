//! Ability resolution: targeting, chance gates, and effect materialization

use rand_chacha::ChaCha8Rng;

use crate::catalog::{AreaRadius, TargetType, TraitDefinition};
use crate::combatant::{Combatant, Fate};
use crate::core::config::EncounterConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::CombatantId;
use crate::engine::effects::apply_effect;
use crate::engine::events::{CombatEvent, EventLog};
use crate::engine::roll_chance;

/// Attempt to use a named ability
///
/// Pre-checks (ownership, cooldown, mana) fail without touching any
/// state. Once they pass, mana is debited and the cooldown starts
/// immediately; a targeting failure after that point still consumes the
/// ability.
pub fn use_ability(
    roster: &mut [Combatant],
    caster_idx: usize,
    ability_name: &str,
    explicit_target: Option<CombatantId>,
    config: &EncounterConfig,
    rng: &mut ChaCha8Rng,
    events: &mut EventLog,
) -> Result<()> {
    let caster = &roster[caster_idx];
    let def = caster
        .ability(ability_name)
        .cloned()
        .ok_or_else(|| EngineError::AbilityNotOwned(ability_name.to_string()))?;

    let remaining = caster.cooldown_remaining(ability_name);
    if remaining > 0 {
        return Err(EngineError::AbilityOnCooldown {
            ability: ability_name.to_string(),
            remaining,
        });
    }

    if caster.current.mana < def.mana_cost {
        return Err(EngineError::InsufficientMana {
            ability: ability_name.to_string(),
            needed: def.mana_cost,
            available: caster.current.mana,
        });
    }

    let caster_id = caster.id;
    let caster_attack = caster.current.attack;

    let caster = &mut roster[caster_idx];
    caster.current.mana -= def.mana_cost;
    if def.cooldown_turns > 0 {
        caster
            .cooldowns
            .insert(ability_name.to_string(), def.cooldown_turns);
    }
    events.push(CombatEvent::AbilityUsed {
        caster: caster_id,
        trait_name: def.name.clone(),
        mana_cost: def.mana_cost,
    });

    let targets = resolve_targets(roster, caster_idx, &def, explicit_target, config, rng)?;

    for target_idx in targets {
        events.push(CombatEvent::TargetAcquired {
            caster: caster_id,
            target: roster[target_idx].id,
            trait_name: def.name.clone(),
        });
        // Corpse targeting is a narration hook: the target is located and
        // reported, nothing is materialized on it.
        if def.target == TargetType::Corpse {
            continue;
        }
        apply_effect(
            &mut roster[target_idx],
            &def,
            Some(caster_id),
            caster_attack,
            rng,
            events,
        );
    }

    Ok(())
}

/// Resolve roster indices for an ability's targeting type
///
/// An empty *candidate set* is a `NoValidTarget` error; an area roll that
/// happens to include nobody is a legitimate fizzle and returns empty.
fn resolve_targets(
    roster: &[Combatant],
    caster_idx: usize,
    def: &TraitDefinition,
    explicit_target: Option<CombatantId>,
    config: &EncounterConfig,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<usize>> {
    match def.target {
        TargetType::Enemy => {
            let wanted =
                explicit_target.ok_or_else(|| EngineError::NoValidTarget(def.name.clone()))?;
            let idx = roster
                .iter()
                .position(|c| c.id == wanted && c.is_alive())
                .ok_or_else(|| EngineError::NoValidTarget(def.name.clone()))?;
            Ok(vec![idx])
        }
        TargetType::Caster => Ok(vec![caster_idx]),
        TargetType::Area => {
            let candidates = living_others(roster, caster_idx);
            if candidates.is_empty() {
                return Err(EngineError::NoValidTarget(def.name.clone()));
            }
            match def.radius {
                AreaRadius::WholeRoom => Ok(candidates),
                AreaRadius::Bounded(_) => Ok(candidates
                    .into_iter()
                    .filter(|_| roll_chance(rng, config.area_inclusion_chance))
                    .collect()),
            }
        }
        // No faction model exists: an ally is any living combatant other
        // than the caster.
        TargetType::Allies => {
            let candidates = living_others(roster, caster_idx);
            if candidates.is_empty() {
                return Err(EngineError::NoValidTarget(def.name.clone()));
            }
            Ok(candidates)
        }
        TargetType::Corpse => {
            let corpses: Vec<usize> = roster
                .iter()
                .enumerate()
                .filter(|(_, c)| c.fate == Fate::Defeated)
                .map(|(i, _)| i)
                .collect();
            if corpses.is_empty() {
                return Err(EngineError::NoValidTarget(def.name.clone()));
            }
            Ok(corpses)
        }
        // Environmental surfaces are the excluded layer's concern; these
        // abilities resolve against no combatants.
        TargetType::Environment | TargetType::Structure | TargetType::Room => Ok(Vec::new()),
    }
}

fn living_others(roster: &[Combatant], caster_idx: usize) -> Vec<usize> {
    roster
        .iter()
        .enumerate()
        .filter(|(i, c)| *i != caster_idx && c.is_alive())
        .map(|(i, _)| i)
        .collect()
}
