//! Trait definitions: the immutable data records that drive all combat
//!
//! A trait is an active ability, a passive effect, or an environmental
//! effect. The open property bag of the source data is converted at load
//! time into the typed effect list in [`crate::catalog::effects`], so the
//! engine pattern-matches exhaustively instead of probing named fields.

use serde::{Deserialize, Serialize};

use crate::catalog::effects::SubEffect;

/// What a trait fundamentally is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraitKind {
    ActiveAbility,
    PassiveEffect,
    EnvironmentalEffect,
}

/// Who or what an ability is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetType {
    /// A single explicitly chosen combatant
    Enemy,
    /// The caster itself ("Self" in trait data)
    Caster,
    /// Every living combatant other than the caster, subject to radius
    Area,
    /// Every living combatant other than the caster (no faction model)
    Allies,
    Environment,
    Structure,
    Room,
    /// A defeated combatant still present in the roster
    Corpse,
}

/// What a trait can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppliesTo {
    Combatant,
    RoomTheme,
}

/// How long an effect persists once applied
///
/// In trait data this is an integer: -1 permanent, 0 or absent
/// instantaneous, positive a turn count. Other negatives are rejected by
/// the loader, which keeps invalid durations unrepresentable past that
/// point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectDuration {
    Instant,
    Turns(u32),
    Permanent,
}

impl EffectDuration {
    pub fn from_raw(raw: i64) -> Result<Self, String> {
        match raw {
            -1 => Ok(EffectDuration::Permanent),
            0 => Ok(EffectDuration::Instant),
            n if n > 0 => Ok(EffectDuration::Turns(n as u32)),
            n => Err(format!("invalid duration {} (only -1, 0, or positive)", n)),
        }
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, EffectDuration::Permanent)
    }

    pub fn is_instant(&self) -> bool {
        matches!(self, EffectDuration::Instant)
    }
}

/// How far an area ability reaches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AreaRadius {
    /// Radius -1 in trait data: the whole room, no inclusion roll
    WholeRoom,
    /// A bounded radius; with no spatial model, inclusion is rolled per
    /// candidate (see `EncounterConfig::area_inclusion_chance`)
    Bounded(f32),
}

/// A named, immutable trait definition from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitDefinition {
    pub name: String,
    pub kind: TraitKind,
    pub target: TargetType,
    pub applies_to: AppliesTo,
    pub mana_cost: f32,
    pub cooldown_turns: u32,
    pub duration: EffectDuration,
    pub radius: AreaRadius,
    pub effects: Vec<SubEffect>,
}

impl TraitDefinition {
    pub fn new(name: &str, kind: TraitKind, target: TargetType) -> Self {
        Self {
            name: name.to_string(),
            kind,
            target,
            applies_to: AppliesTo::Combatant,
            mana_cost: 0.0,
            cooldown_turns: 0,
            duration: EffectDuration::Instant,
            radius: AreaRadius::WholeRoom,
            effects: Vec::new(),
        }
    }

    pub fn with_duration(mut self, duration: EffectDuration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_mana_cost(mut self, mana_cost: f32) -> Self {
        self.mana_cost = mana_cost;
        self
    }

    pub fn with_cooldown(mut self, cooldown_turns: u32) -> Self {
        self.cooldown_turns = cooldown_turns;
        self
    }

    pub fn with_radius(mut self, radius: AreaRadius) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_applies_to(mut self, applies_to: AppliesTo) -> Self {
        self.applies_to = applies_to;
        self
    }

    pub fn with_effect(mut self, effect: SubEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn applies_to_combatants(&self) -> bool {
        matches!(self.applies_to, AppliesTo::Combatant)
    }

    /// Permanent passives are bound at creation and never removed:
    /// kind PassiveEffect with duration permanent or absent.
    pub fn is_permanent_passive(&self) -> bool {
        matches!(self.kind, TraitKind::PassiveEffect)
            && (self.duration.is_permanent() || self.duration.is_instant())
    }

    pub fn is_ability(&self) -> bool {
        matches!(self.kind, TraitKind::ActiveAbility)
    }
}
