//! formula_core - Combat formula resolution for game entities
//!
//! This library provides:
//! - Entity: Read-only view of players, monsters and pets, with zero-defaulting accessors
//! - Hit resolution: Basis-point rolls against a caller-supplied random source
//! - FormulaRegistry / Dispatcher: Formula id to hit-rate/damage function pairs
//! - CombatContext: Per-evaluation parameters, damage by combat type and trace
//! - Config: Formula parameter tables and combat constants from TOML

pub mod combat;
pub mod config;
pub mod entity;
pub mod formula;
pub mod prelude;
pub mod rng;
pub mod types;

// Re-export core types for convenience
pub use combat::{CombatContext, FightInfo};
pub use config::{default_formula_params, CombatConstants, ConfigError, FormulaParamTable, FormulaParams};
pub use entity::{ActiveBuff, BuffLedger, Entity, EntityState, Monster, Pet, Player, SkillBar, SkillSlot};
pub use formula::{Combatants, Dispatcher, FormulaError, FormulaPair, FormulaRegistry, FormulaScope};
pub use rng::{resolve_hit, RandomSource, ScriptedRolls};
pub use types::{Amount, AttrId, CombatType, EntityKind, FormulaId, WorldPosition, BASIS_POINTS};
