//! Formula parameter tables
//!
//! Designers tune each formula through named parameters (`par001`,
//! `par002`, ...) plus the skill damage rate/extension. The tables arrive as
//! TOML and seed a [`CombatContext`] before evaluation.

use super::{CombatConstants, ConfigError};
use crate::combat::{CombatContext, DAMAGE_EXT_PARAM, DAMAGE_RATE_PARAM};
use crate::types::FormulaId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Parameters for one formula
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormulaParams {
    pub id: FormulaId,
    /// Skill damage rate in basis points
    #[serde(default)]
    pub damage_rate: Option<f64>,
    /// Flat skill damage extension
    #[serde(default)]
    pub damage_ext: Option<f64>,
    /// Named formula tunables
    #[serde(default)]
    pub params: HashMap<String, f64>,
}

impl FormulaParams {
    /// Copy these parameters into a context
    pub fn apply_to(&self, ctx: &mut CombatContext) {
        if let Some(rate) = self.damage_rate {
            ctx.set_param(DAMAGE_RATE_PARAM, rate);
        }
        if let Some(ext) = self.damage_ext {
            ctx.set_param(DAMAGE_EXT_PARAM, ext);
        }
        for (name, value) in &self.params {
            ctx.set_param(name.clone(), *value);
        }
    }

    /// Build a fresh context carrying these parameters
    pub fn to_context(&self, constants: &CombatConstants) -> CombatContext {
        let mut ctx = CombatContext::from_constants(constants);
        self.apply_to(&mut ctx);
        ctx
    }
}

/// Raw file layout: a list of `[[formulas]]` entries
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FormulaParamsFile {
    #[serde(default)]
    formulas: Vec<FormulaParams>,
}

/// Parameter entries keyed by formula id
#[derive(Debug, Clone, Default)]
pub struct FormulaParamTable {
    entries: HashMap<FormulaId, FormulaParams>,
}

impl FormulaParamTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table, rejecting duplicate ids
    pub fn from_entries(entries: Vec<FormulaParams>) -> Result<Self, ConfigError> {
        let mut table = Self::new();
        for entry in entries {
            if table.entries.contains_key(&entry.id) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate parameters for formula {}",
                    entry.id
                )));
            }
            table.entries.insert(entry.id, entry);
        }
        Ok(table)
    }

    pub fn get(&self, id: FormulaId) -> Option<&FormulaParams> {
        self.entries.get(&id)
    }

    /// Context for a formula; formulas without an entry get an empty parameter bag
    pub fn context_for(&self, id: FormulaId, constants: &CombatConstants) -> CombatContext {
        match self.get(id) {
            Some(params) => params.to_context(constants),
            None => CombatContext::from_constants(constants),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load formula parameters from a TOML file
pub fn load_formula_params(path: &Path) -> Result<FormulaParamTable, ConfigError> {
    let file: FormulaParamsFile = super::load_toml(path)?;
    FormulaParamTable::from_entries(file.formulas)
}

/// Load formula parameters from a TOML string
pub fn parse_formula_params(content: &str) -> Result<FormulaParamTable, ConfigError> {
    let file: FormulaParamsFile = super::parse_toml(content)?;
    FormulaParamTable::from_entries(file.formulas)
}

/// Parameters shipped with the built-in formulas
pub fn default_formula_params() -> FormulaParamTable {
    let toml = include_str!("../../config/formula_params.toml");
    parse_formula_params(toml).unwrap_or_else(|err| {
        tracing::warn!("bundled formula parameters failed to load: {}", err);
        FormulaParamTable::new()
    })
}
