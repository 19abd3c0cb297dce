//! Live, timed instantiations of traits on a combatant

use serde::{Deserialize, Serialize};

use crate::catalog::EffectDuration;
use crate::core::types::{CombatantId, StatKind};

/// A per-turn magnitude carried by an active effect
///
/// Damage amounts are snapshots: a percentage-of-attack poison is
/// converted to an absolute value once at application and never
/// recomputed, even if the source's attack changes later. Healing stays a
/// percentage because each tick evaluates it against the target's max
/// health at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PerTurnEffect {
    Damage { amount: f32 },
    HealPercentMax { percent: f32 },
    ManaDrain { amount: f32 },
}

/// Stat modifier snapshot re-applied on every recompute while active
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    pub stat: StatKind,
    pub percent: f32,
}

/// A trait currently affecting a combatant
///
/// Identity is the source trait name: a combatant never carries two
/// active effects with the same name, re-application refreshes the
/// duration instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEffect {
    pub trait_name: String,
    pub remaining: EffectDuration,
    pub per_turn: Vec<PerTurnEffect>,
    pub stat_mods: Vec<StatModifier>,
    pub immobilizes: bool,
    /// Attribution only; the source combatant does not own this effect
    pub source: Option<CombatantId>,
}

impl ActiveEffect {
    pub fn new(trait_name: &str, remaining: EffectDuration) -> Self {
        debug_assert!(
            !remaining.is_instant(),
            "instantaneous traits never become active effects"
        );
        Self {
            trait_name: trait_name.to_string(),
            remaining,
            per_turn: Vec::new(),
            stat_mods: Vec::new(),
            immobilizes: false,
            source: None,
        }
    }

    pub fn with_source(mut self, source: Option<CombatantId>) -> Self {
        self.source = source;
        self
    }

    /// Count down one turn; permanent effects are untouched
    pub fn decrement(&mut self) {
        if let EffectDuration::Turns(n) = self.remaining {
            self.remaining = EffectDuration::Turns(n.saturating_sub(1));
        }
    }

    /// Expired means the countdown reached exactly zero
    pub fn is_expired(&self) -> bool {
        matches!(self.remaining, EffectDuration::Turns(0))
    }
}
