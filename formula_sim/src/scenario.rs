//! Scenario files: who fights whom, with which formula and parameters

use anyhow::{bail, Context, Result};
use formula_core::config::{load_formula_params, parse_toml};
use formula_core::formula::parse_damage_name;
use formula_core::prelude::*;
use formula_core::types::{Amount, FormulaId};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One participant, tagged by kind
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioEntity {
    Player(Player),
    Monster(Monster),
    Pet(Pet),
}

impl ScenarioEntity {
    pub fn as_entity(&self) -> &dyn Entity {
        match self {
            ScenarioEntity::Player(player) => player,
            ScenarioEntity::Monster(monster) => monster,
            ScenarioEntity::Pet(pet) => pet,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Formula id; takes precedence over `name`
    #[serde(default)]
    pub formula: Option<FormulaId>,
    /// Formula name, e.g. `damage_10002`
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_runs")]
    pub runs: u32,
    #[serde(default)]
    pub init_damage: Amount,
    /// Parameter table replacing the bundled one, relative to the scenario file
    #[serde(default)]
    pub params_file: Option<PathBuf>,
    /// Per-scenario parameter overrides (`par001`, `damageRate`, ...)
    #[serde(default)]
    pub params: HashMap<String, f64>,
    #[serde(default)]
    pub attack_target_count: Option<i64>,
    #[serde(default)]
    pub constants: CombatConstants,
    #[serde(default)]
    pub attacker: Option<ScenarioEntity>,
    #[serde(default)]
    pub target: Option<ScenarioEntity>,
    #[serde(default)]
    pub user: Option<ScenarioEntity>,
    /// Directory the scenario was loaded from
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_seed() -> u64 {
    42
}

fn default_runs() -> u32 {
    1
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        let mut scenario =
            Self::parse(&content).with_context(|| format!("Invalid scenario {}", path.display()))?;
        scenario.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(scenario)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = parse_toml(content)?;
        scenario.constants.validate()?;
        if scenario.runs == 0 {
            bail!("runs must be at least 1");
        }
        Ok(scenario)
    }

    /// Formula this scenario evaluates
    pub fn formula_id(&self) -> Result<FormulaId> {
        match (self.formula, self.name.as_deref()) {
            (Some(id), _) => Ok(id),
            (None, Some(name)) => Ok(parse_damage_name(name)?),
            (None, None) => bail!("scenario names no formula; set `formula` or `name`"),
        }
    }

    pub fn param_table(&self) -> Result<FormulaParamTable> {
        match &self.params_file {
            Some(file) => {
                let path = self.base_dir.join(file);
                load_formula_params(&path)
                    .with_context(|| format!("Failed to load parameters from {}", path.display()))
            }
            None => Ok(default_formula_params()),
        }
    }

    /// Fresh context for one run: table entry first, then scenario overrides
    pub fn context(&self, table: &FormulaParamTable, id: FormulaId) -> CombatContext {
        let mut ctx = table.context_for(id, &self.constants);
        for (name, value) in &self.params {
            ctx.set_param(name.clone(), *value);
        }
        match self.attack_target_count {
            Some(count) => ctx.with_attack_target_count(count),
            None => ctx,
        }
    }

    pub fn combatants(&self) -> Combatants<'_> {
        Combatants {
            attacker: self.attacker.as_ref().map(ScenarioEntity::as_entity),
            target: self.target.as_ref().map(ScenarioEntity::as_entity),
            user: self.user.as_ref().map(ScenarioEntity::as_entity),
        }
    }
}
