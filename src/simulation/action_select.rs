//! Action selection: first usable ability, basic attack as the fallback

use rand_chacha::ChaCha8Rng;

use crate::catalog::TargetType;
use crate::combatant::Combatant;
use crate::core::config::EncounterConfig;
use crate::core::error::EngineError;
use crate::engine::abilities::use_ability;
use crate::engine::effects::deal_attack_damage;
use crate::engine::events::{CombatEvent, EventLog, FailureReason};

/// Take one action for the combatant at `idx`
///
/// Picks the first owned ability that is off cooldown and affordable and
/// attempts it against the first living opponent. A recoverable failure
/// (or owning no usable ability) falls back to a basic attack: attack
/// minus defense, floored so exchanges always make progress.
pub fn act(
    roster: &mut [Combatant],
    idx: usize,
    config: &EncounterConfig,
    rng: &mut ChaCha8Rng,
    events: &mut EventLog,
) {
    let target_idx = roster
        .iter()
        .enumerate()
        .find(|(i, c)| *i != idx && c.is_alive())
        .map(|(i, _)| i);

    let caster_id = roster[idx].id;

    let chosen = roster[idx]
        .abilities
        .iter()
        .find(|a| {
            roster[idx].cooldown_remaining(&a.name) == 0 && roster[idx].current.mana >= a.mana_cost
        })
        .map(|a| (a.name.clone(), a.target));

    if let Some((name, target_type)) = chosen {
        let explicit = match target_type {
            TargetType::Enemy => target_idx.map(|t| roster[t].id),
            _ => None,
        };
        match use_ability(roster, idx, &name, explicit, config, rng, events) {
            Ok(()) => return,
            Err(e) if e.is_recoverable() => {
                events.push(CombatEvent::AbilityFailed {
                    caster: caster_id,
                    trait_name: name,
                    reason: failure_reason(&e),
                });
                // The failed cast falls through to the basic attack.
            }
            Err(e) => {
                tracing::error!("Ability '{}' failed unrecoverably: {}", name, e);
            }
        }
    }

    if let Some(t) = target_idx {
        let damage =
            (roster[idx].current.attack - roster[t].current.defense).max(config.basic_attack_floor);
        deal_attack_damage(&mut roster[t], caster_id, damage, rng, events);
    }
}

fn failure_reason(error: &EngineError) -> FailureReason {
    match error {
        EngineError::AbilityNotOwned(_) => FailureReason::NotOwned,
        EngineError::AbilityOnCooldown { .. } => FailureReason::OnCooldown,
        EngineError::InsufficientMana { .. } => FailureReason::InsufficientMana,
        _ => FailureReason::NoValidTarget,
    }
}
