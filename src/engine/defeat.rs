//! Defeat resolution: the ordered decision procedure at zero health
//!
//! Revival is checked first and stops the chain on success. Rebirth is
//! checked second and replaces death with transformation. If neither
//! fires, explode-on-death and split-on-death are evaluated
//! unconditionally (they can both fire) and the combatant is marked
//! permanently defeated.

use rand_chacha::ChaCha8Rng;

use crate::catalog::EffectKind;
use crate::combatant::{Combatant, Fate};
use crate::engine::events::{CombatEvent, EventLog};
use crate::engine::roll_chance;

/// Resolve a combatant whose health reached zero
///
/// Idempotent: calling this on a combatant that is still above zero
/// health, or that has already been resolved, does nothing.
pub fn resolve_defeat(c: &mut Combatant, rng: &mut ChaCha8Rng, events: &mut EventLog) {
    if c.fate != Fate::Alive || c.current.health > 0.0 {
        return;
    }

    // 1. Revival: back up at a fraction of max health, chain stops.
    if let Some((_, (chance, health_percent))) = c.find_passive_effect(|kind| match kind {
        EffectKind::Revival {
            chance_percent,
            health_percent,
        } => Some((*chance_percent, *health_percent)),
        _ => None,
    }) {
        if roll_chance(rng, chance) {
            c.current.health = c.max_health * health_percent / 100.0;
            events.push(CombatEvent::Revived {
                id: c.id,
                health: c.current.health,
            });
            return;
        }
    }

    // 2. Rebirth: the original form leaves play; the successor entity is
    // the caller's concern.
    if let Some((trait_name, chance)) = c.find_passive_effect(|kind| match kind {
        EffectKind::Rebirth { chance_percent } => Some(*chance_percent),
        _ => None,
    }) {
        let trait_name = trait_name.to_string();
        if roll_chance(rng, chance) {
            c.fate = Fate::Transformed;
            events.push(CombatEvent::Transformed {
                id: c.id,
                trait_name,
            });
            return;
        }
    }

    // 3. On-death area effects, unconditional and not mutually exclusive.
    // Payloads only: splash damage and spawned copies are materialized by
    // the caller.
    for def in &c.passives {
        for sub in &def.effects {
            match sub.kind {
                EffectKind::ExplodeOnDeath { damage, radius } => {
                    events.push(CombatEvent::Exploded {
                        id: c.id,
                        damage,
                        radius,
                    });
                }
                EffectKind::SplitOnDeath {
                    count,
                    stat_percent,
                } => {
                    events.push(CombatEvent::Split {
                        id: c.id,
                        count,
                        stat_percent,
                    });
                }
                _ => {}
            }
        }
    }

    // 4. Out of the fight for good.
    c.fate = Fate::Defeated;
    events.push(CombatEvent::Defeated { id: c.id });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SubEffect, TargetType, TraitDefinition, TraitKind};
    use crate::core::types::{CombatantId, StatBlock};
    use rand::SeedableRng;
    use std::sync::Arc;

    fn downed(traits: Vec<TraitDefinition>) -> Combatant {
        let mut c = Combatant::new(
            CombatantId(0),
            "Gravel",
            StatBlock::new(100.0, 20.0, 10.0, 5.0, 8.0),
        );
        let traits: Vec<_> = traits.into_iter().map(Arc::new).collect();
        c.apply_base_traits(&traits);
        c.current.health = 0.0;
        c
    }

    fn revival_trait(chance: f32) -> TraitDefinition {
        TraitDefinition::new("second_wind", TraitKind::PassiveEffect, TargetType::Caster)
            .with_effect(SubEffect::always(EffectKind::Revival {
                chance_percent: chance,
                health_percent: 50.0,
            }))
    }

    #[test]
    fn test_no_op_when_still_alive() {
        let mut c = downed(vec![]);
        c.current.health = 30.0;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = EventLog::new();
        resolve_defeat(&mut c, &mut rng, &mut events);

        assert_eq!(c.fate, Fate::Alive);
        assert!(events.is_empty());
    }

    #[test]
    fn test_guaranteed_revival_stops_chain() {
        let mut c = downed(vec![
            revival_trait(100.0),
            TraitDefinition::new("volatile_core", TraitKind::PassiveEffect, TargetType::Caster)
                .with_effect(SubEffect::always(EffectKind::ExplodeOnDeath {
                    damage: 30.0,
                    radius: -1.0,
                })),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = EventLog::new();
        resolve_defeat(&mut c, &mut rng, &mut events);

        assert_eq!(c.fate, Fate::Alive);
        assert!((c.current.health - 50.0).abs() < 0.001);
        let drained = events.drain();
        assert_eq!(
            drained,
            vec![CombatEvent::Revived {
                id: CombatantId(0),
                health: 50.0
            }]
        );
    }

    #[test]
    fn test_impossible_revival_falls_through_to_defeat() {
        let mut c = downed(vec![revival_trait(0.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = EventLog::new();
        resolve_defeat(&mut c, &mut rng, &mut events);

        assert_eq!(c.fate, Fate::Defeated);
        assert!(events
            .iter()
            .any(|e| matches!(e, CombatEvent::Defeated { .. })));
    }

    #[test]
    fn test_guaranteed_rebirth_transforms() {
        let mut c = downed(vec![TraitDefinition::new(
            "chrysalis",
            TraitKind::PassiveEffect,
            TargetType::Caster,
        )
        .with_effect(SubEffect::always(EffectKind::Rebirth {
            chance_percent: 100.0,
        }))]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = EventLog::new();
        resolve_defeat(&mut c, &mut rng, &mut events);

        assert_eq!(c.fate, Fate::Transformed);
        assert!(!events
            .iter()
            .any(|e| matches!(e, CombatEvent::Defeated { .. })));
    }

    #[test]
    fn test_explode_and_split_both_fire() {
        let mut c = downed(vec![
            TraitDefinition::new("volatile_core", TraitKind::PassiveEffect, TargetType::Caster)
                .with_effect(SubEffect::always(EffectKind::ExplodeOnDeath {
                    damage: 30.0,
                    radius: -1.0,
                })),
            TraitDefinition::new("mitosis", TraitKind::PassiveEffect, TargetType::Caster)
                .with_effect(SubEffect::always(EffectKind::SplitOnDeath {
                    count: 2,
                    stat_percent: 50.0,
                })),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = EventLog::new();
        resolve_defeat(&mut c, &mut rng, &mut events);

        assert_eq!(c.fate, Fate::Defeated);
        let drained = events.drain();
        assert!(drained
            .iter()
            .any(|e| matches!(e, CombatEvent::Exploded { damage, .. } if *damage == 30.0)));
        assert!(drained
            .iter()
            .any(|e| matches!(e, CombatEvent::Split { count: 2, .. })));
        assert!(drained
            .iter()
            .any(|e| matches!(e, CombatEvent::Defeated { .. })));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut c = downed(vec![]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = EventLog::new();
        resolve_defeat(&mut c, &mut rng, &mut events);
        resolve_defeat(&mut c, &mut rng, &mut events);

        let defeats = events
            .iter()
            .filter(|e| matches!(e, CombatEvent::Defeated { .. }))
            .count();
        assert_eq!(defeats, 1);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        for _ in 0..3 {
            let mut c = downed(vec![revival_trait(25.0)]);
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            let mut events = EventLog::new();
            resolve_defeat(&mut c, &mut rng, &mut events);

            let mut c2 = downed(vec![revival_trait(25.0)]);
            let mut rng2 = ChaCha8Rng::seed_from_u64(7);
            let mut events2 = EventLog::new();
            resolve_defeat(&mut c2, &mut rng2, &mut events2);

            assert_eq!(c.fate, c2.fate);
            assert_eq!(events.drain(), events2.drain());
        }
    }
}
