//! Property tests for the engine's hard invariants

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crucible::catalog::{
    EffectDuration, EffectKind, SubEffect, TargetType, TraitDefinition, TraitKind,
};
use crucible::combatant::Combatant;
use crucible::core::types::{CombatantId, StatBlock};
use crucible::engine::effects::{apply_effect, deal_trait_damage, tick_effects};
use crucible::engine::EventLog;

fn fighter() -> Combatant {
    Combatant::new(
        CombatantId(0),
        "Subject",
        StatBlock::new(100.0, 50.0, 20.0, 5.0, 10.0),
    )
}

proptest! {
    /// Health never leaves [0, max_health], whatever mix of damage, healing,
    /// and ticks the engine runs.
    #[test]
    fn health_stays_in_bounds(
        amounts in prop::collection::vec(0.0f32..60.0, 1..20),
        heal_percent in 0.0f32..50.0,
        seed in any::<u64>(),
    ) {
        let mut c = fighter();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut events = EventLog::new();

        let regen = TraitDefinition::new("spores", TraitKind::ActiveAbility, TargetType::Caster)
            .with_duration(EffectDuration::Turns(5))
            .with_effect(SubEffect::always(EffectKind::HealPercentMax { percent: heal_percent }));
        apply_effect(&mut c, &regen, None, 0.0, &mut rng, &mut events);

        for amount in amounts {
            deal_trait_damage(&mut c, None, "anvil", amount, &mut rng, &mut events);
            tick_effects(&mut c, &mut rng, &mut events);

            prop_assert!(c.current.health >= 0.0);
            prop_assert!(c.current.health <= c.max_health + 0.001);
            prop_assert!(c.current.mana >= 0.0);
        }
    }

    /// However many times the same trait lands, at most one active effect
    /// carries its name.
    #[test]
    fn reapplication_never_duplicates(applications in 1usize..10, seed in any::<u64>()) {
        let mut c = fighter();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut events = EventLog::new();

        let poison = TraitDefinition::new("swamp_rot", TraitKind::ActiveAbility, TargetType::Enemy)
            .with_duration(EffectDuration::Turns(3))
            .with_effect(SubEffect::always(EffectKind::DamagePerTurn { amount: 2.0 }));

        for _ in 0..applications {
            apply_effect(&mut c, &poison, None, 0.0, &mut rng, &mut events);
        }

        let count = c
            .active_effects
            .iter()
            .filter(|e| e.trait_name == "swamp_rot")
            .count();
        prop_assert_eq!(count, 1);
    }

    /// A d-turn damage-over-time effect is removed after exactly the d-th
    /// tick, having dealt d times its per-turn amount.
    #[test]
    fn dot_ticks_are_additive(duration in 1u32..8, per_turn in 0.5f32..10.0) {
        let mut c = fighter();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut events = EventLog::new();

        let poison = TraitDefinition::new("swamp_rot", TraitKind::ActiveAbility, TargetType::Enemy)
            .with_duration(EffectDuration::Turns(duration))
            .with_effect(SubEffect::always(EffectKind::DamagePerTurn { amount: per_turn }));
        apply_effect(&mut c, &poison, None, 0.0, &mut rng, &mut events);

        for tick in 1..=duration {
            prop_assert!(!c.active_effects.is_empty());
            tick_effects(&mut c, &mut rng, &mut events);
            let expected = 100.0 - per_turn * tick as f32;
            prop_assert!((c.current.health - expected).abs() < 0.01);
        }
        prop_assert!(c.active_effects.is_empty());
    }

    /// Permanent traits never tick away.
    #[test]
    fn permanent_effects_are_never_removed(ticks in 1usize..30) {
        let mut c = fighter();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut events = EventLog::new();

        let curse = TraitDefinition::new("ancient_curse", TraitKind::ActiveAbility, TargetType::Enemy)
            .with_duration(EffectDuration::Permanent);
        apply_effect(&mut c, &curse, None, 0.0, &mut rng, &mut events);

        for _ in 0..ticks {
            tick_effects(&mut c, &mut rng, &mut events);
        }
        prop_assert!(c.has_effect("ancient_curse"));
    }
}
