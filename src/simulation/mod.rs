//! The driving loop: encounter state and per-turn action selection

pub mod action_select;
pub mod encounter;

pub use encounter::{Encounter, TurnResult};
