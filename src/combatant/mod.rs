//! Combatant state: base stats, derived stats, bound traits, active effects

pub mod active_effect;

pub use active_effect::{ActiveEffect, PerTurnEffect, StatModifier};

use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{EffectKind, TraitDefinition, TraitKind};
use crate::core::types::{CombatantId, StatBlock};

/// The terminal state a combatant ends an encounter in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fate {
    Alive,
    /// Rebirth fired: removed from play as its original form; spawning the
    /// successor is the caller's concern
    Transformed,
    /// Permanently out; stays in the roster as a corpse
    Defeated,
}

/// A single participant in an encounter
#[derive(Debug, Clone)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    base: StatBlock,
    /// Derived stats; recomputed from base + passives + active effects
    pub current: StatBlock,
    /// Recomputed capacity the health pool is clamped against
    pub max_health: f32,
    /// Recomputed capacity the mana pool is clamped against
    pub max_mana: f32,
    /// Permanent passives, bound at creation and never removed
    pub passives: Vec<Arc<TraitDefinition>>,
    /// Usable active abilities, bound at creation
    pub abilities: Vec<Arc<TraitDefinition>>,
    /// Ordered list of live timed effects
    pub active_effects: Vec<ActiveEffect>,
    /// Turns until each ability may be used again
    pub cooldowns: AHashMap<String, u32>,
    pub fate: Fate,
}

impl Combatant {
    pub fn new(id: CombatantId, name: &str, base: StatBlock) -> Self {
        Self {
            id,
            name: name.to_string(),
            base,
            current: base,
            max_health: base.health,
            max_mana: base.mana,
            passives: Vec::new(),
            abilities: Vec::new(),
            active_effects: Vec::new(),
            cooldowns: AHashMap::new(),
            fate: Fate::Alive,
        }
    }

    /// Immutable after creation
    pub fn base(&self) -> &StatBlock {
        &self.base
    }

    /// Partition the supplied traits into permanent passives and abilities
    ///
    /// Traits that do not apply to combatants are ignored, as are passives
    /// with a positive duration (a passive that expires is not a thing the
    /// data model supports at creation time). Stat folding happens on the
    /// next recompute.
    pub fn apply_base_traits(&mut self, traits: &[Arc<TraitDefinition>]) {
        for def in traits {
            if !def.applies_to_combatants() {
                continue;
            }
            match def.kind {
                TraitKind::ActiveAbility => self.abilities.push(def.clone()),
                TraitKind::PassiveEffect => {
                    if def.is_permanent_passive() {
                        self.passives.push(def.clone());
                    } else {
                        tracing::debug!(
                            "Ignoring timed passive '{}' at creation for {}",
                            def.name,
                            self.name
                        );
                    }
                }
                TraitKind::EnvironmentalEffect => {}
            }
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.fate, Fate::Alive)
    }

    /// Immobilizing active effects deny the combatant its action
    pub fn can_act(&self) -> bool {
        !self
            .active_effects
            .iter()
            .any(|e| e.immobilizes && !e.is_expired())
    }

    pub fn ability(&self, name: &str) -> Option<&Arc<TraitDefinition>> {
        self.abilities.iter().find(|a| a.name == name)
    }

    pub fn find_effect_mut(&mut self, trait_name: &str) -> Option<&mut ActiveEffect> {
        self.active_effects
            .iter_mut()
            .find(|e| e.trait_name == trait_name)
    }

    pub fn has_effect(&self, trait_name: &str) -> bool {
        self.active_effects.iter().any(|e| e.trait_name == trait_name)
    }

    pub fn cooldown_remaining(&self, ability: &str) -> u32 {
        self.cooldowns.get(ability).copied().unwrap_or(0)
    }

    /// Count down all cooldowns by one turn
    pub fn tick_cooldowns(&mut self) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0);
    }

    /// Incoming-damage multiplier from permanent traits
    ///
    /// Only the damage-reduction and damage-taken-increase passives are
    /// consulted; there is no general damage-type resistance system.
    pub fn damage_multiplier(&self) -> f32 {
        let mut multiplier = 1.0;
        for def in &self.passives {
            for sub in &def.effects {
                match sub.kind {
                    EffectKind::DamageReduction { percent } => {
                        multiplier *= 1.0 - percent / 100.0;
                    }
                    EffectKind::DamageTakenIncrease { percent } => {
                        multiplier *= 1.0 + percent / 100.0;
                    }
                    _ => {}
                }
            }
        }
        multiplier.max(0.0)
    }

    /// Apply incoming damage after permanent-trait modifiers, flooring
    /// health at zero. Returns the modified damage amount.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        let amount = amount * self.damage_multiplier();
        self.current.health = (self.current.health - amount).max(0.0);
        amount
    }

    /// First permanent passive carrying the given effect, if any
    pub fn find_passive_effect<T>(&self, mut pick: impl FnMut(&EffectKind) -> Option<T>) -> Option<(&str, T)> {
        for def in &self.passives {
            for sub in &def.effects {
                if let Some(found) = pick(&sub.kind) {
                    return Some((def.name.as_str(), found));
                }
            }
        }
        None
    }
}
