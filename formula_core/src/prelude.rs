//! Prelude module for convenient imports
//!
//! ```rust
//! use formula_core::prelude::*;
//! ```

// Entities
pub use crate::entity::{ActiveBuff, Entity, EntityState, Monster, Pet, Player, SkillBar};
pub use crate::types::{attr, combat_type, EntityKind, WorldPosition};

// Formulas
pub use crate::formula::{Combatants, Dispatcher, FormulaError, FormulaPair, FormulaRegistry, FormulaScope};

// Context
pub use crate::combat::CombatContext;

// Randomness
pub use crate::rng::{RandomSource, ScriptedRolls};

// Config
pub use crate::config::{default_formula_params, CombatConstants, FormulaParamTable};
