//! The effect engine: stat recomputation, per-turn ticks, effect application

use rand_chacha::ChaCha8Rng;

use crate::catalog::{EffectKind, TraitDefinition};
use crate::combatant::{ActiveEffect, Combatant, PerTurnEffect, StatModifier};
use crate::core::types::{CombatantId, StatKind};
use crate::engine::defeat::resolve_defeat;
use crate::engine::events::{CombatEvent, EventLog};
use crate::engine::roll_chance;

/// Rebuild a combatant's current stats from scratch
///
/// Order: reset to base, re-apply every permanent passive's stat fields,
/// then the stat fields of every active *temporary* effect. Active effects
/// with a permanent duration are skipped in the second pass: they are
/// treated as already folded into base via passives, and re-applying them
/// would double-count. Health and mana pools are clamped against the
/// recomputed capacities and never healed upward here.
pub fn recompute_stats(c: &mut Combatant) {
    let held_health = c.current.health;
    let held_mana = c.current.mana;

    let mut next = *c.base();
    for def in &c.passives {
        for sub in &def.effects {
            if let EffectKind::StatBonus { stat, percent } = sub.kind {
                next.scale(stat, percent);
            }
        }
    }
    for effect in &c.active_effects {
        if effect.remaining.is_permanent() {
            continue;
        }
        for modifier in &effect.stat_mods {
            next.scale(modifier.stat, modifier.percent);
        }
    }

    c.max_health = next.health.max(0.0);
    c.max_mana = next.mana.max(0.0);
    c.current = next;
    c.current.health = held_health.min(c.max_health);
    c.current.mana = held_mana.min(c.max_mana);
}

/// Run one turn's worth of ongoing effects on a combatant
///
/// Every per-turn magnitude is applied with its own event, durations count
/// down, effects that reach exactly zero are removed, stats are
/// recomputed, and defeat resolution runs if the ticks were lethal.
pub fn tick_effects(c: &mut Combatant, rng: &mut ChaCha8Rng, events: &mut EventLog) {
    let applications: Vec<(String, PerTurnEffect)> = c
        .active_effects
        .iter()
        .flat_map(|e| {
            e.per_turn
                .iter()
                .map(|pt| (e.trait_name.clone(), *pt))
                .collect::<Vec<_>>()
        })
        .collect();

    for (trait_name, per_turn) in applications {
        match per_turn {
            PerTurnEffect::Damage { amount } => {
                c.current.health = (c.current.health - amount).max(0.0);
                events.push(CombatEvent::EffectDamage {
                    target: c.id,
                    trait_name,
                    damage: amount,
                });
            }
            PerTurnEffect::HealPercentMax { percent } => {
                let amount = c.max_health * percent / 100.0;
                c.current.health = (c.current.health + amount).min(c.max_health);
                events.push(CombatEvent::Healed {
                    target: c.id,
                    trait_name,
                    amount,
                });
            }
            PerTurnEffect::ManaDrain { amount } => {
                let drained = amount.min(c.current.mana);
                c.current.mana = (c.current.mana - amount).max(0.0);
                events.push(CombatEvent::ManaDrained {
                    target: c.id,
                    trait_name,
                    amount: drained,
                });
            }
        }
    }

    for effect in &mut c.active_effects {
        effect.decrement();
    }
    let mut expired = Vec::new();
    c.active_effects.retain(|e| {
        if e.is_expired() {
            expired.push(e.trait_name.clone());
            false
        } else {
            true
        }
    });
    for trait_name in expired {
        events.push(CombatEvent::EffectExpired {
            target: c.id,
            trait_name,
        });
    }

    recompute_stats(c);

    if c.current.health <= 0.0 {
        resolve_defeat(c, rng, events);
    }
}

/// Apply a trait to a target
///
/// Instantaneous traits apply their stat fields directly through the
/// passive-application path and are done. Timed traits refresh an existing
/// active effect's duration (never stacking a duplicate) or materialize a
/// new snapshot, applying any instantaneous component once. Each
/// sub-effect rolls its own chance gate per application.
pub fn apply_effect(
    target: &mut Combatant,
    def: &TraitDefinition,
    source: Option<CombatantId>,
    caster_attack: f32,
    rng: &mut ChaCha8Rng,
    events: &mut EventLog,
) {
    if def.duration.is_instant() {
        for sub in &def.effects {
            if !gate_passes(sub.chance_percent, rng) {
                continue;
            }
            apply_instant(target, def, sub.kind, source, caster_attack, rng, events);
        }
        return;
    }

    if let Some(existing) = target.find_effect_mut(&def.name) {
        existing.remaining = def.duration;
        events.push(CombatEvent::EffectRefreshed {
            target: target.id,
            trait_name: def.name.clone(),
            duration: def.duration,
        });
        return;
    }

    let mut effect = ActiveEffect::new(&def.name, def.duration).with_source(source);
    let mut instant_damage = 0.0;
    for sub in &def.effects {
        if !gate_passes(sub.chance_percent, rng) {
            continue;
        }
        match sub.kind {
            EffectKind::StatBonus { stat, percent } => {
                effect.stat_mods.push(StatModifier { stat, percent });
            }
            EffectKind::Damage { amount } => instant_damage += amount,
            EffectKind::AttackPercentDamage { percent } => {
                effect.per_turn.push(PerTurnEffect::Damage {
                    amount: caster_attack * percent / 100.0,
                });
            }
            EffectKind::DamagePerTurn { amount } => {
                effect.per_turn.push(PerTurnEffect::Damage { amount });
            }
            EffectKind::HealPercentMax { percent } => {
                effect.per_turn.push(PerTurnEffect::HealPercentMax { percent });
            }
            EffectKind::ManaDrainPerTurn { amount } => {
                effect.per_turn.push(PerTurnEffect::ManaDrain { amount });
            }
            EffectKind::Immobilize => effect.immobilizes = true,
            EffectKind::DamageReduction { .. }
            | EffectKind::DamageTakenIncrease { .. }
            | EffectKind::Revival { .. }
            | EffectKind::Rebirth { .. }
            | EffectKind::ExplodeOnDeath { .. }
            | EffectKind::SplitOnDeath { .. } => {
                tracing::debug!(
                    "Trait '{}' carries a passive-only effect; ignored on application",
                    def.name
                );
            }
        }
    }

    target.active_effects.push(effect);
    events.push(CombatEvent::EffectApplied {
        target: target.id,
        trait_name: def.name.clone(),
        duration: def.duration,
    });
    recompute_stats(target);

    if instant_damage > 0.0 {
        deal_trait_damage(target, source, &def.name, instant_damage, rng, events);
    }
}

fn apply_instant(
    target: &mut Combatant,
    def: &TraitDefinition,
    kind: EffectKind,
    source: Option<CombatantId>,
    caster_attack: f32,
    rng: &mut ChaCha8Rng,
    events: &mut EventLog,
) {
    match kind {
        EffectKind::StatBonus { stat, percent } => apply_instant_stat_bonus(target, stat, percent),
        EffectKind::Damage { amount } => {
            deal_trait_damage(target, source, &def.name, amount, rng, events);
        }
        EffectKind::AttackPercentDamage { percent } => {
            let amount = caster_attack * percent / 100.0;
            deal_trait_damage(target, source, &def.name, amount, rng, events);
        }
        EffectKind::HealPercentMax { percent } => {
            let amount = target.max_health * percent / 100.0;
            target.current.health = (target.current.health + amount).min(target.max_health);
            events.push(CombatEvent::Healed {
                target: target.id,
                trait_name: def.name.clone(),
                amount,
            });
        }
        // Per-turn and passive-only fields mean nothing without a duration.
        _ => {
            tracing::debug!(
                "Instantaneous trait '{}' carries a duration-bound effect; ignored",
                def.name
            );
        }
    }
}

/// Direct stat application for instantaneous traits
///
/// Mirrors the passive path: capacity stats scale their maximum and the
/// pool is clamped, never raised. The change lasts only until the next
/// recompute rebuilds from base.
fn apply_instant_stat_bonus(c: &mut Combatant, stat: StatKind, percent: f32) {
    match stat {
        StatKind::Health => {
            c.max_health *= 1.0 + percent / 100.0;
            c.current.health = c.current.health.min(c.max_health);
        }
        StatKind::Mana => {
            c.max_mana *= 1.0 + percent / 100.0;
            c.current.mana = c.current.mana.min(c.max_mana);
        }
        _ => c.current.scale(stat, percent),
    }
}

/// Damage attributed to a trait, routed through the target's
/// damage modifiers, with defeat resolution on a lethal hit
pub fn deal_trait_damage(
    target: &mut Combatant,
    caster: Option<CombatantId>,
    trait_name: &str,
    amount: f32,
    rng: &mut ChaCha8Rng,
    events: &mut EventLog,
) {
    let dealt = target.apply_damage(amount);
    match caster {
        Some(caster) => events.push(CombatEvent::AbilityDamage {
            caster,
            target: target.id,
            trait_name: trait_name.to_string(),
            damage: dealt,
        }),
        None => events.push(CombatEvent::EffectDamage {
            target: target.id,
            trait_name: trait_name.to_string(),
            damage: dealt,
        }),
    }
    if target.current.health <= 0.0 {
        resolve_defeat(target, rng, events);
    }
}

/// Basic-attack damage, routed through the target's damage modifiers,
/// with defeat resolution on a lethal hit
pub fn deal_attack_damage(
    target: &mut Combatant,
    attacker: CombatantId,
    amount: f32,
    rng: &mut ChaCha8Rng,
    events: &mut EventLog,
) {
    let dealt = target.apply_damage(amount);
    events.push(CombatEvent::AttackLanded {
        attacker,
        target: target.id,
        damage: dealt,
    });
    if target.current.health <= 0.0 {
        resolve_defeat(target, rng, events);
    }
}

fn gate_passes(chance_percent: Option<f32>, rng: &mut ChaCha8Rng) -> bool {
    match chance_percent {
        Some(percent) => roll_chance(rng, percent),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EffectDuration, SubEffect, TargetType, TraitKind};
    use crate::core::types::StatBlock;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn combatant() -> Combatant {
        Combatant::new(
            CombatantId(0),
            "Gravel",
            StatBlock::new(100.0, 50.0, 20.0, 10.0, 12.0),
        )
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_recompute_applies_passives() {
        let mut c = combatant();
        c.apply_base_traits(&[Arc::new(
            TraitDefinition::new("thick_hide", TraitKind::PassiveEffect, TargetType::Caster)
                .with_effect(SubEffect::always(EffectKind::StatBonus {
                    stat: StatKind::Defense,
                    percent: 25.0,
                })),
        )]);

        recompute_stats(&mut c);
        assert!((c.current.defense - 12.5).abs() < 0.001);
        // Unmodified stats come back exactly as base.
        assert_eq!(c.current.attack, 20.0);
    }

    #[test]
    fn test_recompute_skips_permanent_active_effects() {
        let mut c = combatant();
        let mut permanent = ActiveEffect::new("ancient_blessing", EffectDuration::Permanent);
        permanent.stat_mods.push(StatModifier {
            stat: StatKind::Attack,
            percent: 100.0,
        });
        c.active_effects.push(permanent);

        recompute_stats(&mut c);
        assert_eq!(c.current.attack, 20.0);

        let mut timed = ActiveEffect::new("war_cry", EffectDuration::Turns(2));
        timed.stat_mods.push(StatModifier {
            stat: StatKind::Attack,
            percent: 50.0,
        });
        c.active_effects.push(timed);

        recompute_stats(&mut c);
        assert!((c.current.attack - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_recompute_clamps_pools_never_heals() {
        let mut c = combatant();
        c.current.health = 40.0;
        recompute_stats(&mut c);
        assert_eq!(c.current.health, 40.0);

        // A shrinking max drags the pool down with it.
        let mut withering = ActiveEffect::new("withering", EffectDuration::Turns(3));
        withering.stat_mods.push(StatModifier {
            stat: StatKind::Health,
            percent: -80.0,
        });
        c.active_effects.push(withering);
        recompute_stats(&mut c);
        assert!((c.max_health - 20.0).abs() < 0.001);
        assert!((c.current.health - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_tick_applies_and_expires_dot() {
        let mut c = combatant();
        let mut poison = ActiveEffect::new("venom_fang", EffectDuration::Turns(3));
        poison.per_turn.push(PerTurnEffect::Damage { amount: 10.0 });
        c.active_effects.push(poison);

        let mut rng = rng();
        let mut events = EventLog::new();
        for _ in 0..3 {
            tick_effects(&mut c, &mut rng, &mut events);
        }

        assert!((c.current.health - 70.0).abs() < 0.001);
        assert!(c.active_effects.is_empty());
        let expirations = events
            .iter()
            .filter(|e| matches!(e, CombatEvent::EffectExpired { .. }))
            .count();
        assert_eq!(expirations, 1);
    }

    #[test]
    fn test_tick_never_removes_permanent_effects() {
        let mut c = combatant();
        c.active_effects
            .push(ActiveEffect::new("ancient_curse", EffectDuration::Permanent));

        let mut rng = rng();
        let mut events = EventLog::new();
        for _ in 0..5 {
            tick_effects(&mut c, &mut rng, &mut events);
        }
        assert_eq!(c.active_effects.len(), 1);
    }

    #[test]
    fn test_tick_heal_respects_max() {
        let mut c = combatant();
        c.current.health = 95.0;
        let mut regen = ActiveEffect::new("mending_spores", EffectDuration::Turns(2));
        regen.per_turn.push(PerTurnEffect::HealPercentMax { percent: 10.0 });
        c.active_effects.push(regen);

        let mut rng = rng();
        let mut events = EventLog::new();
        tick_effects(&mut c, &mut rng, &mut events);
        assert_eq!(c.current.health, 100.0);
    }

    #[test]
    fn test_apply_effect_refreshes_instead_of_stacking() {
        let def = TraitDefinition::new("venom_fang", TraitKind::ActiveAbility, TargetType::Enemy)
            .with_duration(EffectDuration::Turns(3))
            .with_effect(SubEffect::always(EffectKind::DamagePerTurn { amount: 5.0 }));

        let mut c = combatant();
        let mut rng = rng();
        let mut events = EventLog::new();

        apply_effect(&mut c, &def, None, 0.0, &mut rng, &mut events);
        assert_eq!(c.active_effects.len(), 1);

        // Burn a turn off, then reapply: duration resets, no duplicate.
        c.active_effects[0].decrement();
        apply_effect(&mut c, &def, None, 0.0, &mut rng, &mut events);
        assert_eq!(c.active_effects.len(), 1);
        assert_eq!(c.active_effects[0].remaining, EffectDuration::Turns(3));

        let refreshes = events
            .iter()
            .filter(|e| matches!(e, CombatEvent::EffectRefreshed { .. }))
            .count();
        assert_eq!(refreshes, 1);
    }

    #[test]
    fn test_apply_effect_snapshots_attack_scaling() {
        let def = TraitDefinition::new("venom_fang", TraitKind::ActiveAbility, TargetType::Enemy)
            .with_duration(EffectDuration::Turns(3))
            .with_effect(SubEffect::always(EffectKind::AttackPercentDamage {
                percent: 50.0,
            }));

        let mut c = combatant();
        let mut rng = rng();
        let mut events = EventLog::new();
        apply_effect(&mut c, &def, Some(CombatantId(9)), 30.0, &mut rng, &mut events);

        assert_eq!(
            c.active_effects[0].per_turn,
            vec![PerTurnEffect::Damage { amount: 15.0 }]
        );
        assert_eq!(c.active_effects[0].source, Some(CombatantId(9)));
    }

    #[test]
    fn test_instant_heal_applies_immediately() {
        let def = TraitDefinition::new("mend_flesh", TraitKind::ActiveAbility, TargetType::Caster)
            .with_effect(SubEffect::always(EffectKind::HealPercentMax { percent: 30.0 }));

        let mut c = combatant();
        c.current.health = 50.0;
        let mut rng = rng();
        let mut events = EventLog::new();
        apply_effect(&mut c, &def, None, 0.0, &mut rng, &mut events);

        assert!((c.current.health - 80.0).abs() < 0.001);
        assert!(c.active_effects.is_empty());
    }

    #[test]
    fn test_gate_at_zero_and_hundred() {
        let def = TraitDefinition::new("coin_flip", TraitKind::ActiveAbility, TargetType::Enemy)
            .with_duration(EffectDuration::Turns(2))
            .with_effect(SubEffect::with_chance(
                EffectKind::DamagePerTurn { amount: 5.0 },
                0.0,
            ))
            .with_effect(SubEffect::with_chance(
                EffectKind::DamagePerTurn { amount: 7.0 },
                100.0,
            ));

        let mut c = combatant();
        let mut rng = rng();
        let mut events = EventLog::new();
        apply_effect(&mut c, &def, None, 0.0, &mut rng, &mut events);

        assert_eq!(
            c.active_effects[0].per_turn,
            vec![PerTurnEffect::Damage { amount: 7.0 }]
        );
    }

    #[test]
    fn test_trait_damage_runs_defeat_resolution() {
        let mut c = Combatant::new(
            CombatantId(0),
            "Wisp",
            StatBlock::new(10.0, 0.0, 1.0, 0.0, 1.0),
        );
        let mut rng = rng();
        let mut events = EventLog::new();
        deal_trait_damage(&mut c, None, "fireball", 25.0, &mut rng, &mut events);

        assert_eq!(c.current.health, 0.0);
        assert!(events
            .iter()
            .any(|e| matches!(e, CombatEvent::Defeated { .. })));
    }
}
