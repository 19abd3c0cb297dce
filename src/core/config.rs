//! Encounter configuration with documented constants
//!
//! The handful of tunable values that are not part of trait data live here
//! with explanations of their purpose and how they interact.

/// Configuration for an encounter
///
/// These values affect pacing, not rules: trait data always wins where the
/// two overlap.
#[derive(Debug, Clone)]
pub struct EncounterConfig {
    /// Minimum damage of the basic-attack fallback
    ///
    /// The fallback deals attack minus defense. Without a floor, two
    /// high-defense combatants can stall an encounter forever; the floor
    /// guarantees every exchanged blow makes progress.
    pub basic_attack_floor: f32,

    /// Per-candidate inclusion chance for bounded-radius area abilities,
    /// as a percent
    ///
    /// There is no spatial model, so a bounded radius cannot be checked
    /// against real distances. Each living candidate instead passes an
    /// independent roll against this chance. Whole-room abilities
    /// (radius -1 in trait data) bypass the roll and hit everyone.
    pub area_inclusion_chance: f32,

    /// Default turn limit for driver loops
    ///
    /// The engine itself has no turn limit; callers use this as an
    /// ordinary loop bound to cut off encounters that cannot resolve.
    pub max_turns: u32,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            basic_attack_floor: 1.0,
            area_inclusion_chance: 50.0,
            max_turns: 100,
        }
    }
}
