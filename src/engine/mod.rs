//! The rules engine: effect application, ability resolution, defeat handling

pub mod abilities;
pub mod defeat;
pub mod effects;
pub mod events;

pub use events::{CombatEvent, EventLog, FailureReason};

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// One uniform roll in [0, 100) against a percent threshold
///
/// Every gated check is its own trial; rolls are never shared across
/// sub-effects or targets.
pub(crate) fn roll_chance(rng: &mut ChaCha8Rng, percent: f32) -> bool {
    rng.gen_range(0.0..100.0) < percent
}
