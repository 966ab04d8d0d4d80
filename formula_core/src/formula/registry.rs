//! FormulaRegistry - Formula id to function pair table

use super::{builtin, DamageFn, FormulaError, HitRateFn};
use crate::types::FormulaId;
use std::collections::HashMap;
use std::fmt;

/// Name prefix under which damage formulas are addressed
pub const DAMAGE_PREFIX: &str = "damage_";

/// Hit-rate and damage functions registered under one formula id
#[derive(Clone, Copy)]
pub struct FormulaPair {
    pub hit_rate: HitRateFn,
    pub damage: DamageFn,
}

impl fmt::Debug for FormulaPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaPair").finish_non_exhaustive()
    }
}

/// Registry of formula pairs
///
/// Populated at startup and read-only afterwards.
#[derive(Clone, Default)]
pub struct FormulaRegistry {
    formulas: HashMap<FormulaId, FormulaPair>,
}

impl FormulaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormulaRegistry {
            formulas: HashMap::new(),
        }
    }

    /// Registry holding the built-in formulas
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (id, pair) in builtin::formulas() {
            registry.formulas.insert(id, pair);
        }
        registry
    }

    /// Register a formula pair; an id can only be registered once
    pub fn register(&mut self, id: FormulaId, pair: FormulaPair) -> Result<(), FormulaError> {
        if self.formulas.contains_key(&id) {
            return Err(FormulaError::DuplicateFormula(id));
        }
        tracing::debug!(formula = id, "formula registered");
        self.formulas.insert(id, pair);
        Ok(())
    }

    /// Look up a formula pair by id
    pub fn get(&self, id: FormulaId) -> Result<&FormulaPair, FormulaError> {
        self.formulas
            .get(&id)
            .ok_or(FormulaError::UnknownFormula(id))
    }

    /// Look up a formula pair by its `damage_<id>` name
    pub fn get_by_name(&self, name: &str) -> Result<(FormulaId, &FormulaPair), FormulaError> {
        let id = parse_damage_name(name)?;
        Ok((id, self.get(id)?))
    }

    pub fn contains(&self, id: FormulaId) -> bool {
        self.formulas.contains_key(&id)
    }

    /// Registered ids in ascending order
    pub fn ids(&self) -> Vec<FormulaId> {
        let mut ids: Vec<FormulaId> = self.formulas.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

impl fmt::Debug for FormulaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

/// Name a damage formula is addressed by
pub fn damage_name(id: FormulaId) -> String {
    format!("{}{}", DAMAGE_PREFIX, id)
}

/// Parse a `damage_<id>` name back into its id
pub fn parse_damage_name(name: &str) -> Result<FormulaId, FormulaError> {
    name.strip_prefix(DAMAGE_PREFIX)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<FormulaId>().ok())
        .ok_or_else(|| FormulaError::UnknownFormulaName(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::CombatContext;
    use crate::formula::{Combatants, FormulaScope};
    use crate::types::Amount;

    fn zero_rate(_ctx: &CombatContext, _c: &Combatants<'_>) -> i64 {
        0
    }

    fn no_damage(_scope: &mut FormulaScope<'_>, _init: Amount) -> Result<Amount, FormulaError> {
        Ok(0)
    }

    fn pair() -> FormulaPair {
        FormulaPair {
            hit_rate: zero_rate,
            damage: no_damage,
        }
    }

    #[test]
    fn test_defaults_registered() {
        let registry = FormulaRegistry::with_defaults();
        assert_eq!(registry.ids(), vec![10001, 10002, 10003]);
        assert!(registry.contains(10002));
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = FormulaRegistry::new();
        assert!(registry.is_empty());
        registry.register(20001, pair()).unwrap();

        assert!(registry.get(20001).is_ok());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = FormulaRegistry::with_defaults();
        assert_eq!(
            registry.register(10001, pair()).unwrap_err(),
            FormulaError::DuplicateFormula(10001)
        );
    }

    #[test]
    fn test_unknown_id() {
        let registry = FormulaRegistry::with_defaults();
        assert_eq!(
            registry.get(99999).unwrap_err(),
            FormulaError::UnknownFormula(99999)
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(damage_name(10002), "damage_10002");
        assert_eq!(parse_damage_name("damage_10002"), Ok(10002));
        assert!(parse_damage_name("damage_").is_err());
        assert!(parse_damage_name("damage_+5").is_err());
        assert!(parse_damage_name("get_hit_rate_10002").is_err());
        assert!(parse_damage_name("damage_99999999999").is_err());
    }

    #[test]
    fn test_get_by_name() {
        let registry = FormulaRegistry::with_defaults();
        let (id, _) = registry.get_by_name("damage_10003").unwrap();
        assert_eq!(id, 10003);
        assert_eq!(
            registry.get_by_name("damage_7").unwrap_err(),
            FormulaError::UnknownFormula(7)
        );
    }
}
