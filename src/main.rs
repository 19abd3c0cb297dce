//! Headless Encounter Runner
//!
//! Loads a trait catalog and a roster from TOML, runs one encounter to
//! completion, and reports the result as text or JSON. This binary is the
//! sample consumer of the engine's event stream: all rendering happens
//! here, never inside the engine.

use std::path::PathBuf;

use clap::Parser;

use crucible::catalog::loader::load_catalog;
use crucible::core::config::EncounterConfig;
use crucible::core::error::{EngineError, Result};
use crucible::core::types::{CombatantId, StatBlock};
use crucible::engine::events::CombatEvent;
use crucible::simulation::Encounter;

use ahash::AHashMap;
use serde::Serialize;

/// Headless Encounter Runner - data-driven combat simulations
#[derive(Parser, Debug)]
#[command(name = "crucible")]
#[command(about = "Run a trait-driven combat encounter and report the result")]
struct Args {
    /// Path to the trait catalog TOML
    #[arg(long, default_value = "data/traits.toml")]
    traits: PathBuf,

    /// Path to the encounter roster TOML
    #[arg(long, default_value = "data/encounter.toml")]
    roster: PathBuf,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum turns before the encounter is called a draw
    #[arg(long, default_value_t = 100)]
    max_turns: u32,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable verbose engine logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct EncounterReport {
    outcome: String,
    winner: Option<String>,
    turns: u32,
    seed: u64,
    events: Vec<CombatEvent>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        "crucible=debug"
    } else {
        "crucible=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!("Running encounter with seed {}", seed);

    let catalog = load_catalog(&args.traits).map_err(EngineError::Catalog)?;
    let setup = load_roster(&args.roster)?;

    let mut encounter = Encounter::new(catalog)
        .with_seed(seed)
        .with_config(EncounterConfig {
            max_turns: args.max_turns,
            ..EncounterConfig::default()
        });

    for entry in &setup {
        let trait_names: Vec<&str> = entry.traits.iter().map(|s| s.as_str()).collect();
        encounter.add_combatant(&entry.name, entry.stats, &trait_names);
    }

    let mut names: AHashMap<CombatantId, String> = AHashMap::new();
    for c in encounter.roster() {
        names.insert(c.id, c.name.clone());
    }

    let mut all_events = Vec::new();
    let mut turns = 0;
    while !encounter.is_over() && turns < args.max_turns {
        let crucible::simulation::TurnResult { events, is_over } = encounter.run_turn();
        all_events.extend(events);
        turns += 1;
        if is_over {
            break;
        }
    }

    let winner = encounter.living().next().map(|c| c.name.clone());
    let outcome = if encounter.is_over() {
        match winner {
            Some(_) => "victory".to_string(),
            None => "annihilation".to_string(),
        }
    } else {
        "draw".to_string()
    };

    match args.format.as_str() {
        "json" => {
            let report = EncounterReport {
                outcome,
                winner,
                turns,
                seed,
                events: all_events,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            for event in &all_events {
                println!("{}", render_event(event, &names));
            }
            println!();
            match &winner {
                Some(name) => println!("Winner after {} turns: {}", turns, name),
                None if encounter.is_over() => println!("Nobody left standing after {} turns", turns),
                None => println!("Draw after {} turns", turns),
            }
        }
    }

    Ok(())
}

struct RosterEntry {
    name: String,
    stats: StatBlock,
    traits: Vec<String>,
}

/// Parse the roster file: a `[[combatants]]` array of tables with the
/// five base stats and a list of trait names
fn load_roster(path: &std::path::Path) -> Result<Vec<RosterEntry>> {
    let content = std::fs::read_to_string(path)?;
    let toml: toml::Value = content
        .parse()
        .map_err(|e| EngineError::Catalog(format!("Invalid roster TOML: {}", e)))?;

    let mut entries = Vec::new();
    if let Some(combatants) = toml.get("combatants").and_then(|v| v.as_array()) {
        for value in combatants {
            let name = value
                .get("name")
                .and_then(|v| v.as_str())
                .ok_or_else(|| EngineError::Catalog("combatant missing name".to_string()))?
                .to_string();

            let stat = |field: &str| -> f32 {
                value
                    .get(field)
                    .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
                    .unwrap_or(0.0) as f32
            };
            let stats = StatBlock::new(
                stat("health"),
                stat("mana"),
                stat("attack"),
                stat("defense"),
                stat("speed"),
            );

            let traits = value
                .get("traits")
                .and_then(|v| v.as_array())
                .map(|list| {
                    list.iter()
                        .filter_map(|t| t.as_str().map(|s| s.to_string()))
                        .collect()
                })
                .unwrap_or_default();

            entries.push(RosterEntry { name, stats, traits });
        }
    }

    if entries.is_empty() {
        return Err(EngineError::Catalog(format!(
            "No combatants found in {}",
            path.display()
        )));
    }
    Ok(entries)
}

fn render_event(event: &CombatEvent, names: &AHashMap<CombatantId, String>) -> String {
    fn lookup<'a>(names: &'a AHashMap<CombatantId, String>, id: &CombatantId) -> &'a str {
        names.get(id).map(|n| n.as_str()).unwrap_or("???")
    }
    let who = |id: &CombatantId| lookup(names, id);

    match event {
        CombatEvent::TurnStarted { turn } => format!("--- Turn {} ---", turn),
        CombatEvent::CombatantAdded { name, .. } => format!("{} enters the fight", name),
        CombatEvent::UnknownTrait { name } => format!("(unknown trait '{}' dropped)", name),
        CombatEvent::EffectApplied {
            target, trait_name, ..
        } => format!("{} is afflicted by {}", who(target), trait_name),
        CombatEvent::EffectRefreshed {
            target, trait_name, ..
        } => format!("{} on {} is renewed", trait_name, who(target)),
        CombatEvent::EffectExpired { target, trait_name } => {
            format!("{} on {} wears off", trait_name, who(target))
        }
        CombatEvent::AttackLanded {
            attacker,
            target,
            damage,
        } => format!(
            "{} strikes {} for {:.0} damage",
            who(attacker),
            who(target),
            damage
        ),
        CombatEvent::AbilityDamage {
            caster,
            target,
            trait_name,
            damage,
        } => format!(
            "{}'s {} hits {} for {:.0} damage",
            who(caster),
            trait_name,
            who(target),
            damage
        ),
        CombatEvent::EffectDamage {
            target,
            trait_name,
            damage,
        } => format!("{} suffers {:.0} damage from {}", who(target), damage, trait_name),
        CombatEvent::Healed {
            target,
            trait_name,
            amount,
        } => format!("{} recovers {:.0} health from {}", who(target), amount, trait_name),
        CombatEvent::ManaDrained {
            target,
            trait_name,
            amount,
        } => format!("{} loses {:.0} mana to {}", who(target), amount, trait_name),
        CombatEvent::AbilityUsed {
            caster, trait_name, ..
        } => format!("{} uses {}", who(caster), trait_name),
        CombatEvent::AbilityFailed {
            caster,
            trait_name,
            reason,
        } => format!("{}'s {} fizzles ({:?})", who(caster), trait_name, reason),
        CombatEvent::TargetAcquired { target, trait_name, .. } => {
            format!("{} is targeted by {}", who(target), trait_name)
        }
        CombatEvent::ActionSkipped { id } => format!("{} cannot act", who(id)),
        CombatEvent::Defeated { id } => format!("{} falls", who(id)),
        CombatEvent::Revived { id, health } => {
            format!("{} surges back to {:.0} health", who(id), health)
        }
        CombatEvent::Transformed { id, trait_name } => {
            format!("{} transforms ({})", who(id), trait_name)
        }
        CombatEvent::Exploded { id, damage, .. } => {
            format!("{} explodes for {:.0} damage", who(id), damage)
        }
        CombatEvent::Split {
            id,
            count,
            stat_percent,
        } => format!(
            "{} splits into {} copies at {:.0}% strength",
            who(id),
            count,
            stat_percent
        ),
    }
}
