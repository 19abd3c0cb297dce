//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for combatants
///
/// Ids are assigned sequentially by the encounter that owns the roster, so
/// the same seed and the same setup always produce the same identifiers in
/// the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub u32);

/// Turn counter (simulation time unit)
pub type Turn = u32;

/// The five combat statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Health,
    Mana,
    Attack,
    Defense,
    Speed,
}

/// A block of combat statistics
///
/// Used both for a combatant's immutable base values and for the derived
/// current values the effect engine recomputes. For `Health` and `Mana`
/// the value is a capacity; the live pools are clamped against it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    pub health: f32,
    pub mana: f32,
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
}

impl StatBlock {
    pub fn new(health: f32, mana: f32, attack: f32, defense: f32, speed: f32) -> Self {
        Self {
            health,
            mana,
            attack,
            defense,
            speed,
        }
    }

    pub fn get(&self, stat: StatKind) -> f32 {
        match stat {
            StatKind::Health => self.health,
            StatKind::Mana => self.mana,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Speed => self.speed,
        }
    }

    /// Apply a multiplicative percentage modifier to one statistic
    ///
    /// A percent of 25.0 multiplies by 1.25, -50.0 halves. Modifiers are
    /// applied sequentially in encounter order; there is no additive versus
    /// multiplicative stacking resolution beyond that.
    pub fn scale(&mut self, stat: StatKind, percent: f32) {
        let factor = 1.0 + percent / 100.0;
        match stat {
            StatKind::Health => self.health *= factor,
            StatKind::Mana => self.mana *= factor,
            StatKind::Attack => self.attack *= factor,
            StatKind::Defense => self.defense *= factor,
            StatKind::Speed => self.speed *= factor,
        }
    }
}
