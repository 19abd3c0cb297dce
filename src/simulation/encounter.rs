//! Encounter: roster ownership, turn scheduling, seeded randomness
//!
//! The encounter is the single owner of the roster for its lifetime.
//! Everything chance-based draws from one ChaCha8 stream, so a fixed seed
//! replays an identical encounter, event for event.

use std::cmp::Ordering;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::TraitCatalog;
use crate::combatant::Combatant;
use crate::core::config::EncounterConfig;
use crate::core::types::{CombatantId, StatBlock, Turn};
use crate::engine::effects::{recompute_stats, tick_effects};
use crate::engine::events::{CombatEvent, EventLog};
use crate::simulation::action_select;

/// The outcome of one simulated turn
#[derive(Debug)]
pub struct TurnResult {
    pub events: Vec<CombatEvent>,
    pub is_over: bool,
}

/// One simulated fight from setup to resolution
#[derive(Debug)]
pub struct Encounter {
    catalog: TraitCatalog,
    config: EncounterConfig,
    roster: Vec<Combatant>,
    rng: ChaCha8Rng,
    events: EventLog,
    turn: Turn,
    next_id: u32,
}

impl Encounter {
    pub fn new(catalog: TraitCatalog) -> Self {
        Self {
            catalog,
            config: EncounterConfig::default(),
            roster: Vec::new(),
            rng: ChaCha8Rng::from_entropy(),
            events: EventLog::new(),
            turn: 0,
            next_id: 0,
        }
    }

    /// Fix the random stream so the encounter replays identically
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn with_config(mut self, config: EncounterConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a combatant, resolving trait names against the catalog
    ///
    /// Unknown names are dropped with a warning event rather than failing
    /// the whole construction. The new combatant enters at full recomputed
    /// capacity.
    pub fn add_combatant(
        &mut self,
        name: &str,
        base: StatBlock,
        trait_names: &[&str],
    ) -> CombatantId {
        let id = CombatantId(self.next_id);
        self.next_id += 1;

        let mut resolved = Vec::new();
        for trait_name in trait_names {
            match self.catalog.get(trait_name) {
                Some(def) => resolved.push(def),
                None => {
                    tracing::warn!("Dropping unknown trait '{}' for {}", trait_name, name);
                    self.events.push(CombatEvent::UnknownTrait {
                        name: trait_name.to_string(),
                    });
                }
            }
        }

        let mut combatant = Combatant::new(id, name, base);
        combatant.apply_base_traits(&resolved);
        recompute_stats(&mut combatant);
        combatant.current.health = combatant.max_health;
        combatant.current.mana = combatant.max_mana;

        self.events.push(CombatEvent::CombatantAdded {
            id,
            name: name.to_string(),
        });
        self.roster.push(combatant);
        id
    }

    /// Simulate one full turn
    ///
    /// Living combatants act in descending order of the speed they had
    /// when the turn started (ties keep roster order). Each gets a
    /// cooldown tick, an effect tick (which may defeat it), and, if still
    /// standing and able, one action.
    pub fn run_turn(&mut self) -> TurnResult {
        self.turn += 1;
        self.events.push(CombatEvent::TurnStarted { turn: self.turn });

        let mut order: Vec<usize> = (0..self.roster.len())
            .filter(|&i| self.roster[i].is_alive())
            .collect();
        order.sort_by(|&a, &b| {
            self.roster[b]
                .current
                .speed
                .partial_cmp(&self.roster[a].current.speed)
                .unwrap_or(Ordering::Equal)
        });

        for idx in order {
            // May have been defeated earlier in the turn.
            if !self.roster[idx].is_alive() {
                continue;
            }

            self.roster[idx].tick_cooldowns();
            tick_effects(&mut self.roster[idx], &mut self.rng, &mut self.events);

            if !self.roster[idx].is_alive() {
                continue;
            }
            if !self.roster[idx].can_act() {
                self.events.push(CombatEvent::ActionSkipped {
                    id: self.roster[idx].id,
                });
                continue;
            }

            action_select::act(
                &mut self.roster,
                idx,
                &self.config,
                &mut self.rng,
                &mut self.events,
            );
        }

        TurnResult {
            events: self.events.drain(),
            is_over: self.is_over(),
        }
    }

    /// The fight is over when at most one combatant is still standing
    pub fn is_over(&self) -> bool {
        self.living().count() <= 1
    }

    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.roster.iter().filter(|c| c.is_alive())
    }

    /// The full roster, corpses included
    pub fn roster(&self) -> &[Combatant] {
        &self.roster
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.roster.iter().find(|c| c.id == id)
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }
}
