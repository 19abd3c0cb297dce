use thiserror::Error;

use crate::core::types::CombatantId;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown trait: {0}")]
    UnknownTrait(String),

    #[error("Ability not owned: {0}")]
    AbilityNotOwned(String),

    #[error("Insufficient mana for {ability}: need {needed}, have {available}")]
    InsufficientMana {
        ability: String,
        needed: f32,
        available: f32,
    },

    #[error("Ability on cooldown: {ability} ({remaining} turns remaining)")]
    AbilityOnCooldown { ability: String, remaining: u32 },

    #[error("No valid target for: {0}")]
    NoValidTarget(String),

    #[error("Combatant not found: {0:?}")]
    CombatantNotFound(CombatantId),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl EngineError {
    /// Recoverable failures abort only the attempted action; the scheduler
    /// falls back to a basic attack instead of halting the simulation.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownTrait(_)
                | EngineError::AbilityNotOwned(_)
                | EngineError::InsufficientMana { .. }
                | EngineError::AbilityOnCooldown { .. }
                | EngineError::NoValidTarget(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
