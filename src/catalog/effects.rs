//! Typed effect specifications carried by trait definitions

use serde::{Deserialize, Serialize};

use crate::core::types::StatKind;

/// One effect a trait produces when it lands
///
/// Whether a variant acts instantly or per turn follows from the owning
/// trait's duration: `Damage` is always a one-shot, `DamagePerTurn` and
/// `ManaDrainPerTurn` only matter on timed traits, and
/// `AttackPercentDamage`/`HealPercentMax` apply instantly on instantaneous
/// traits or become ongoing effects on timed ones. The on-death variants
/// are only consulted when carried as permanent passives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Multiplicative stat modifier (percent, may be negative)
    StatBonus { stat: StatKind, percent: f32 },
    /// Flat damage, applied once
    Damage { amount: f32 },
    /// Damage scaled from the caster's attack; snapshot at application
    AttackPercentDamage { percent: f32 },
    /// Flat damage each turn for the trait's duration
    DamagePerTurn { amount: f32 },
    /// Healing as a percentage of the target's max health
    HealPercentMax { percent: f32 },
    /// Mana removed from the target each turn
    ManaDrainPerTurn { amount: f32 },
    /// Target cannot act while the effect is active
    Immobilize,
    /// Incoming damage reduced by percent
    DamageReduction { percent: f32 },
    /// Incoming damage increased by percent
    DamageTakenIncrease { percent: f32 },
    /// On defeat: chance to return at a fraction of max health
    Revival {
        chance_percent: f32,
        health_percent: f32,
    },
    /// On defeat: chance to transform instead of dying
    Rebirth { chance_percent: f32 },
    /// On defeat: damage burst around the corpse
    ExplodeOnDeath { damage: f32, radius: f32 },
    /// On defeat: split into smaller copies
    SplitOnDeath { count: u32, stat_percent: f32 },
}

/// An effect plus its independent chance gate
///
/// Gates are rolled once per target per application, never shared across
/// sub-effects or across targets. `None` always fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubEffect {
    pub kind: EffectKind,
    pub chance_percent: Option<f32>,
}

impl SubEffect {
    pub fn always(kind: EffectKind) -> Self {
        Self {
            kind,
            chance_percent: None,
        }
    }

    pub fn with_chance(kind: EffectKind, chance_percent: f32) -> Self {
        Self {
            kind,
            chance_percent: Some(chance_percent),
        }
    }
}
