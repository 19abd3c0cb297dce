//! Crucible - Trait-Driven Combat Simulation Engine
//!
//! Combat behavior is entirely data-driven: a catalog of trait
//! definitions (abilities, passives, environmental effects) feeds an
//! engine that computes stats, ticks timed effects, resolves ability
//! targeting, and runs the defeat chain. The encounter owns the roster
//! and a seeded random stream; consumers read structured events.

pub mod catalog;
pub mod combatant;
pub mod core;
pub mod engine;
pub mod simulation;
