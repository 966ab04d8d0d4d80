//! Formula registry and dispatch
//!
//! Every formula id names a pair of functions: a hit-rate function returning
//! basis points and a damage function writing into the [`CombatContext`].
//! Pairs are registered once at startup in a [`FormulaRegistry`] and looked
//! up by id (or by their `damage_<id>` name) through a [`Dispatcher`].

pub mod builtin;
mod dispatch;
mod registry;
mod scope;

pub use dispatch::Dispatcher;
pub use registry::{damage_name, parse_damage_name, FormulaPair, FormulaRegistry, DAMAGE_PREFIX};
pub use scope::FormulaScope;

use crate::combat::CombatContext;
use crate::entity::Entity;
use crate::types::{Amount, FormulaId};
use thiserror::Error;

/// Formula lookup and evaluation error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Unknown formula id: {0}")]
    UnknownFormula(FormulaId),
    #[error("Unknown formula name: {0}")]
    UnknownFormulaName(String),
    #[error("Formula {0} is already registered")]
    DuplicateFormula(FormulaId),
    #[error("Formula {formula} requires missing parameter `{name}`")]
    MissingParameter { formula: FormulaId, name: String },
}

/// Hit-rate function: basis points out of 10000
pub type HitRateFn = fn(&CombatContext, &Combatants<'_>) -> i64;

/// Damage function: receives the evaluation scope and the caller's initial damage
pub type DamageFn = fn(&mut FormulaScope<'_>, Amount) -> Result<Amount, FormulaError>;

/// Entities taking part in one evaluation
#[derive(Clone, Copy, Default)]
pub struct Combatants<'a> {
    pub attacker: Option<&'a dyn Entity>,
    pub target: Option<&'a dyn Entity>,
    /// Intermediary (e.g. the summoner of a pet), when there is one
    pub user: Option<&'a dyn Entity>,
}

impl<'a> Combatants<'a> {
    pub fn new(attacker: &'a dyn Entity, target: &'a dyn Entity) -> Self {
        Combatants {
            attacker: Some(attacker),
            target: Some(target),
            user: None,
        }
    }

    pub fn with_user(mut self, user: &'a dyn Entity) -> Self {
        self.user = Some(user);
        self
    }

    /// No entities at all; every accessor read yields zero
    pub fn none() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for Combatants<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Combatants")
            .field("attacker", &self.attacker.map(|e| e.kind()))
            .field("target", &self.target.map(|e| e.kind()))
            .field("user", &self.user.map(|e| e.kind()))
            .finish()
    }
}
