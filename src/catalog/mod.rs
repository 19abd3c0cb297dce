//! Trait catalog: shared, read-only trait definitions keyed by name

pub mod definitions;
pub mod effects;
pub mod loader;

pub use definitions::{
    AppliesTo, AreaRadius, EffectDuration, TargetType, TraitDefinition, TraitKind,
};
pub use effects::{EffectKind, SubEffect};

use std::sync::Arc;

use ahash::AHashMap;

/// The immutable mapping from trait name to definition
///
/// Definitions are stored behind `Arc` so combatants can hold cheap
/// references without owning them; the catalog remains the owner.
#[derive(Debug, Clone, Default)]
pub struct TraitCatalog {
    defs: AHashMap<String, Arc<TraitDefinition>>,
}

impl TraitCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, def: TraitDefinition) {
        self.defs.insert(def.name.clone(), Arc::new(def));
    }

    pub fn get(&self, name: &str) -> Option<Arc<TraitDefinition>> {
        self.defs.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.keys().map(|k| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut catalog = TraitCatalog::new();
        catalog.insert(TraitDefinition::new(
            "thick_hide",
            TraitKind::PassiveEffect,
            TargetType::Caster,
        ));

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("thick_hide").is_some());
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_reinsert_replaces() {
        let mut catalog = TraitCatalog::new();
        catalog.insert(
            TraitDefinition::new("fireball", TraitKind::ActiveAbility, TargetType::Area)
                .with_mana_cost(10.0),
        );
        catalog.insert(
            TraitDefinition::new("fireball", TraitKind::ActiveAbility, TargetType::Area)
                .with_mana_cost(15.0),
        );

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("fireball").unwrap().mana_cost, 15.0);
    }
}
