//! Structured combat events
//!
//! The engine never formats display text. Every notable state change is
//! reported as one of these variants, carrying combatant ids and numeric
//! payloads; rendering is entirely the consumer's concern.

use serde::{Deserialize, Serialize};

use crate::catalog::EffectDuration;
use crate::core::types::{CombatantId, Turn};

/// Why an attempted ability use was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    NotOwned,
    OnCooldown,
    InsufficientMana,
    NoValidTarget,
}

/// A single notable state change during an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    TurnStarted {
        turn: Turn,
    },
    CombatantAdded {
        id: CombatantId,
        name: String,
    },
    /// A requested trait name was not in the catalog; it was dropped
    UnknownTrait {
        name: String,
    },
    EffectApplied {
        target: CombatantId,
        trait_name: String,
        duration: EffectDuration,
    },
    EffectRefreshed {
        target: CombatantId,
        trait_name: String,
        duration: EffectDuration,
    },
    EffectExpired {
        target: CombatantId,
        trait_name: String,
    },
    AttackLanded {
        attacker: CombatantId,
        target: CombatantId,
        damage: f32,
    },
    AbilityDamage {
        caster: CombatantId,
        target: CombatantId,
        trait_name: String,
        damage: f32,
    },
    /// Per-turn damage from an ongoing effect
    EffectDamage {
        target: CombatantId,
        trait_name: String,
        damage: f32,
    },
    Healed {
        target: CombatantId,
        trait_name: String,
        amount: f32,
    },
    ManaDrained {
        target: CombatantId,
        trait_name: String,
        amount: f32,
    },
    AbilityUsed {
        caster: CombatantId,
        trait_name: String,
        mana_cost: f32,
    },
    AbilityFailed {
        caster: CombatantId,
        trait_name: String,
        reason: FailureReason,
    },
    TargetAcquired {
        caster: CombatantId,
        target: CombatantId,
        trait_name: String,
    },
    /// The combatant could not act this turn (immobilized)
    ActionSkipped {
        id: CombatantId,
    },
    Defeated {
        id: CombatantId,
    },
    Revived {
        id: CombatantId,
        health: f32,
    },
    Transformed {
        id: CombatantId,
        trait_name: String,
    },
    /// On-death burst; splash application is the caller's concern
    Exploded {
        id: CombatantId,
        damage: f32,
        radius: f32,
    },
    /// On-death split; materializing the copies is the caller's concern
    Split {
        id: CombatantId,
        count: u32,
        stat_percent: f32,
    },
}

/// Ordered event buffer for one encounter
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Hand the buffered events to the caller, leaving the log empty
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_log() {
        let mut log = EventLog::new();
        log.push(CombatEvent::TurnStarted { turn: 1 });
        log.push(CombatEvent::Defeated { id: CombatantId(3) });

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_events_serialize() {
        let event = CombatEvent::AbilityDamage {
            caster: CombatantId(0),
            target: CombatantId(1),
            trait_name: "venom_fang".to_string(),
            damage: 8.0,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("venom_fang"));
    }
}
