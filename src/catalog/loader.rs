//! Load trait definitions from TOML files

use std::fs;
use std::path::Path;

use crate::catalog::definitions::{
    AppliesTo, AreaRadius, EffectDuration, TargetType, TraitDefinition, TraitKind,
};
use crate::catalog::effects::{EffectKind, SubEffect};
use crate::catalog::TraitCatalog;
use crate::core::types::StatKind;

/// Load a trait catalog from a TOML file
pub fn load_catalog(path: &Path) -> Result<TraitCatalog, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse_catalog_toml(&content)
}

/// Parse a trait catalog from TOML text
///
/// Expected shape: a `[[traits]]` array of tables, each with `name`,
/// `kind`, `target`, and optional `applies_to`, `mana_cost`,
/// `cooldown_turns`, `duration_turns`, `radius`, and a nested
/// `[[traits.effects]]` array.
pub fn parse_catalog_toml(content: &str) -> Result<TraitCatalog, String> {
    let toml: toml::Value = content.parse().map_err(|e| format!("Invalid TOML: {}", e))?;

    let mut catalog = TraitCatalog::new();

    if let Some(traits) = toml.get("traits").and_then(|v| v.as_array()) {
        for value in traits {
            catalog.insert(parse_trait(value)?);
        }
    }

    Ok(catalog)
}

fn parse_trait(value: &toml::Value) -> Result<TraitDefinition, String> {
    let name = value
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "trait missing name".to_string())?
        .to_string();

    let kind_str = value
        .get("kind")
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("{}: missing kind", name))?;
    let kind = parse_trait_kind(kind_str).ok_or_else(|| format!("{}: unknown kind '{}'", name, kind_str))?;

    let target_str = value
        .get("target")
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("{}: missing target", name))?;
    let target = parse_target_type(target_str)
        .ok_or_else(|| format!("{}: unknown target '{}'", name, target_str))?;

    let applies_str = value
        .get("applies_to")
        .and_then(|v| v.as_str())
        .unwrap_or("Combatant");
    let applies_to = parse_applies_to(applies_str)
        .ok_or_else(|| format!("{}: unknown applies_to '{}'", name, applies_str))?;

    let mana_cost = number(value.get("mana_cost")).unwrap_or(0.0) as f32;

    let cooldown_turns = value
        .get("cooldown_turns")
        .and_then(|v| v.as_integer())
        .unwrap_or(0);
    if cooldown_turns < 0 {
        return Err(format!("{}: negative cooldown {}", name, cooldown_turns));
    }

    let duration = match value.get("duration_turns").and_then(|v| v.as_integer()) {
        Some(raw) => EffectDuration::from_raw(raw).map_err(|e| format!("{}: {}", name, e))?,
        None => EffectDuration::Instant,
    };

    let radius = match number(value.get("radius")) {
        Some(r) if (r + 1.0).abs() < f64::EPSILON => AreaRadius::WholeRoom,
        Some(r) if r >= 0.0 => AreaRadius::Bounded(r as f32),
        Some(r) => return Err(format!("{}: invalid radius {}", name, r)),
        None => AreaRadius::WholeRoom,
    };

    let mut effects = Vec::new();
    if let Some(list) = value.get("effects").and_then(|v| v.as_array()) {
        for effect in list {
            effects.push(parse_effect(effect, &name)?);
        }
    }

    Ok(TraitDefinition {
        name,
        kind,
        target,
        applies_to,
        mana_cost,
        cooldown_turns: cooldown_turns as u32,
        duration,
        radius,
        effects,
    })
}

fn parse_effect(value: &toml::Value, trait_name: &str) -> Result<SubEffect, String> {
    let type_str = value
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("{}: effect missing type", trait_name))?;

    let percent = || {
        number(value.get("percent"))
            .map(|p| p as f32)
            .ok_or_else(|| format!("{}: {} missing percent", trait_name, type_str))
    };
    let amount = || {
        number(value.get("amount"))
            .map(|a| a as f32)
            .ok_or_else(|| format!("{}: {} missing amount", trait_name, type_str))
    };

    let kind = match type_str {
        "stat_bonus" => {
            let stat_str = value
                .get("stat")
                .and_then(|v| v.as_str())
                .ok_or_else(|| format!("{}: stat_bonus missing stat", trait_name))?;
            let stat = parse_stat_kind(stat_str)
                .ok_or_else(|| format!("{}: unknown stat '{}'", trait_name, stat_str))?;
            EffectKind::StatBonus {
                stat,
                percent: percent()?,
            }
        }
        "damage" => EffectKind::Damage { amount: amount()? },
        "attack_percent_damage" => EffectKind::AttackPercentDamage { percent: percent()? },
        "damage_per_turn" => EffectKind::DamagePerTurn { amount: amount()? },
        "heal_percent_max" => EffectKind::HealPercentMax { percent: percent()? },
        "mana_drain_per_turn" => EffectKind::ManaDrainPerTurn { amount: amount()? },
        "immobilize" => EffectKind::Immobilize,
        "damage_reduction" => EffectKind::DamageReduction { percent: percent()? },
        "damage_taken_increase" => EffectKind::DamageTakenIncrease { percent: percent()? },
        "revival" => EffectKind::Revival {
            chance_percent: number(value.get("chance_percent"))
                .map(|c| c as f32)
                .ok_or_else(|| format!("{}: revival missing chance_percent", trait_name))?,
            health_percent: number(value.get("health_percent"))
                .map(|h| h as f32)
                .ok_or_else(|| format!("{}: revival missing health_percent", trait_name))?,
        },
        "rebirth" => EffectKind::Rebirth {
            chance_percent: number(value.get("chance_percent"))
                .map(|c| c as f32)
                .ok_or_else(|| format!("{}: rebirth missing chance_percent", trait_name))?,
        },
        "explode_on_death" => EffectKind::ExplodeOnDeath {
            damage: amount()?,
            radius: number(value.get("radius")).unwrap_or(-1.0) as f32,
        },
        "split_on_death" => EffectKind::SplitOnDeath {
            count: value
                .get("count")
                .and_then(|v| v.as_integer())
                .filter(|c| *c > 0)
                .ok_or_else(|| format!("{}: split_on_death missing count", trait_name))?
                as u32,
            stat_percent: number(value.get("stat_percent"))
                .map(|s| s as f32)
                .ok_or_else(|| format!("{}: split_on_death missing stat_percent", trait_name))?,
        },
        other => return Err(format!("{}: unknown effect type '{}'", trait_name, other)),
    };

    let chance_percent = number(value.get("chance_percent")).map(|c| c as f32);

    // The on-death and revival variants carry their chance inside the
    // variant; a gate on top of that would roll twice.
    let chance_percent = match kind {
        EffectKind::Revival { .. } | EffectKind::Rebirth { .. } => None,
        _ => chance_percent,
    };

    Ok(SubEffect { kind, chance_percent })
}

/// TOML numbers arrive as either integers or floats depending on how the
/// author wrote them; accept both.
fn number(value: Option<&toml::Value>) -> Option<f64> {
    let value = value?;
    value.as_float().or_else(|| value.as_integer().map(|i| i as f64))
}

fn parse_trait_kind(s: &str) -> Option<TraitKind> {
    match s {
        "ActiveAbility" => Some(TraitKind::ActiveAbility),
        "PassiveEffect" => Some(TraitKind::PassiveEffect),
        "EnvironmentalEffect" => Some(TraitKind::EnvironmentalEffect),
        _ => None,
    }
}

fn parse_target_type(s: &str) -> Option<TargetType> {
    match s {
        "Enemy" => Some(TargetType::Enemy),
        "Self" => Some(TargetType::Caster),
        "Area" => Some(TargetType::Area),
        "Allies" => Some(TargetType::Allies),
        "Environment" => Some(TargetType::Environment),
        "Structure" => Some(TargetType::Structure),
        "Room" => Some(TargetType::Room),
        "Corpse" => Some(TargetType::Corpse),
        _ => None,
    }
}

fn parse_applies_to(s: &str) -> Option<AppliesTo> {
    match s {
        "Combatant" => Some(AppliesTo::Combatant),
        "RoomTheme" => Some(AppliesTo::RoomTheme),
        _ => None,
    }
}

fn parse_stat_kind(s: &str) -> Option<StatKind> {
    match s {
        "health" => Some(StatKind::Health),
        "mana" => Some(StatKind::Mana),
        "attack" => Some(StatKind::Attack),
        "defense" => Some(StatKind::Defense),
        "speed" => Some(StatKind::Speed),
        _ => None,
    }
}
