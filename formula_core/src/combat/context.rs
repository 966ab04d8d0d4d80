//! CombatContext - Per-evaluation scratch space

use super::FightInfo;
use crate::config::CombatConstants;
use crate::types::{Amount, CombatType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Custom parameter holding the skill damage rate, in basis points
pub const DAMAGE_RATE_PARAM: &str = "damageRate";

/// Custom parameter holding the flat skill damage extension
pub const DAMAGE_EXT_PARAM: &str = "damageExt";

/// Scratch space for one formula evaluation
///
/// The caller fills in the custom parameters, runs one formula and reads the
/// damage map and trace back afterwards. Damage entries are only written by
/// formulas, through [`crate::formula::FormulaScope`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatContext {
    /// Damage per combat type; later writes for a type overwrite earlier ones
    damage_by_type: BTreeMap<CombatType, Amount>,
    /// Trace lines, `None` when no log sink is attached
    trace: Option<Vec<String>>,
    /// Caller-supplied tunables (`damageRate`, `par001`, ...)
    custom_params: HashMap<String, f64>,
    /// Combat type the formula settled on, if it chose one
    final_combat_type: Option<CombatType>,
    fight_info: Vec<FightInfo>,
    attack_target_count: i64,
}

/// Formula-written state to restore when an evaluation fails
#[derive(Debug, Clone)]
pub(crate) struct Checkpoint {
    damage_by_type: BTreeMap<CombatType, Amount>,
    trace_len: usize,
    final_combat_type: Option<CombatType>,
    fight_info_len: usize,
}

impl Default for CombatContext {
    fn default() -> Self {
        CombatContext {
            damage_by_type: BTreeMap::new(),
            trace: Some(Vec::new()),
            custom_params: HashMap::new(),
            final_combat_type: None,
            fight_info: Vec::new(),
            attack_target_count: 1,
        }
    }
}

impl CombatContext {
    /// Create a context with a trace sink and a single target
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context following the tunable constants
    pub fn from_constants(constants: &CombatConstants) -> Self {
        CombatContext {
            trace: constants.trace.enabled.then(Vec::new),
            attack_target_count: constants.targets.default_count,
            ..Self::default()
        }
    }

    /// Drop the trace sink; trace appends become no-ops
    pub fn without_trace(mut self) -> Self {
        self.trace = None;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set_param(name, value);
        self
    }

    pub fn with_damage_rate(self, rate: f64) -> Self {
        self.with_param(DAMAGE_RATE_PARAM, rate)
    }

    pub fn with_damage_ext(self, ext: f64) -> Self {
        self.with_param(DAMAGE_EXT_PARAM, ext)
    }

    pub fn with_attack_target_count(mut self, count: i64) -> Self {
        self.attack_target_count = count;
        self
    }

    /// Set a custom parameter before evaluation
    pub fn set_param(&mut self, name: impl Into<String>, value: f64) {
        self.custom_params.insert(name.into(), value);
    }

    /// Look up a custom parameter
    pub fn custom_value(&self, name: &str) -> Option<f64> {
        self.custom_params.get(name).copied()
    }

    pub fn custom_params(&self) -> &HashMap<String, f64> {
        &self.custom_params
    }

    pub fn skill_damage_rate(&self) -> Option<f64> {
        self.custom_value(DAMAGE_RATE_PARAM)
    }

    pub fn skill_damage_ext(&self) -> Option<f64> {
        self.custom_value(DAMAGE_EXT_PARAM)
    }

    /// Number of targets hit by the triggering action
    pub fn attack_target_count(&self) -> i64 {
        self.attack_target_count
    }

    /// Store damage for a combat type
    pub(crate) fn add_combat_damage(&mut self, combat_type: CombatType, amount: Amount) {
        self.damage_by_type.insert(combat_type, amount);
    }

    /// Damage stored for a combat type
    pub fn damage(&self, combat_type: CombatType) -> Option<Amount> {
        self.damage_by_type.get(&combat_type).copied()
    }

    pub fn damage_by_type(&self) -> &BTreeMap<CombatType, Amount> {
        &self.damage_by_type
    }

    /// Sum of damage across all combat types, saturating at the `Amount` bounds
    pub fn total_damage(&self) -> Amount {
        self.damage_by_type
            .values()
            .fold(0, |total: Amount, &amount| total.saturating_add(amount))
    }

    /// Append a trace line; empty lines and contexts without a sink are ignored
    pub fn append_trace(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.is_empty() {
            return;
        }
        if let Some(trace) = self.trace.as_mut() {
            tracing::trace!(target: "formula_core::trace", "{}", line);
            trace.push(line);
        }
    }

    /// Trace lines in the order they were written
    pub fn trace(&self) -> &[String] {
        self.trace.as_deref().unwrap_or(&[])
    }

    pub fn has_trace_sink(&self) -> bool {
        self.trace.is_some()
    }

    pub(crate) fn set_final_combat_type(&mut self, combat_type: CombatType) {
        self.final_combat_type = Some(combat_type);
    }

    pub fn final_combat_type(&self) -> Option<CombatType> {
        self.final_combat_type
    }

    pub(crate) fn add_fight_info(&mut self, info: FightInfo) {
        self.fight_info.push(info);
    }

    pub fn fight_info(&self) -> &[FightInfo] {
        &self.fight_info
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            damage_by_type: self.damage_by_type.clone(),
            trace_len: self.trace().len(),
            final_combat_type: self.final_combat_type,
            fight_info_len: self.fight_info.len(),
        }
    }

    /// Drop everything written since `checkpoint` was taken
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        self.damage_by_type = checkpoint.damage_by_type;
        if let Some(trace) = self.trace.as_mut() {
            trace.truncate(checkpoint.trace_len);
        }
        self.final_combat_type = checkpoint.final_combat_type;
        self.fight_info.truncate(checkpoint.fight_info_len);
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        if self.damage_by_type.is_empty() {
            return "No damage".to_string();
        }

        let parts: Vec<String> = self
            .damage_by_type
            .iter()
            .map(|(combat_type, amount)| format!("{} damage (type {})", amount, combat_type))
            .collect();

        let mut summary = parts.join(", ");
        if let Some(final_type) = self.final_combat_type {
            summary.push_str(&format!(", final type {}", final_type));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context() {
        let ctx = CombatContext::new();
        assert!(ctx.has_trace_sink());
        assert!(ctx.trace().is_empty());
        assert!(ctx.damage_by_type().is_empty());
        assert_eq!(ctx.attack_target_count(), 1);
        assert_eq!(ctx.summary(), "No damage");
    }

    #[test]
    fn test_custom_params() {
        let ctx = CombatContext::new()
            .with_param("par001", 5000.0)
            .with_damage_rate(12000.0);

        assert_eq!(ctx.custom_value("par001"), Some(5000.0));
        assert_eq!(ctx.custom_value("par002"), None);
        assert_eq!(ctx.skill_damage_rate(), Some(12000.0));
        assert_eq!(ctx.skill_damage_ext(), None);
    }

    #[test]
    fn test_damage_ext_param() {
        let ctx = CombatContext::new().with_damage_ext(250.0);

        assert_eq!(ctx.skill_damage_ext(), Some(250.0));
        assert_eq!(ctx.custom_value(DAMAGE_EXT_PARAM), Some(250.0));
        assert_eq!(ctx.skill_damage_rate(), None);
    }

    #[test]
    fn test_total_damage_saturates() {
        let mut ctx = CombatContext::new();
        ctx.add_combat_damage(1, Amount::MAX);
        ctx.add_combat_damage(2, 1);
        assert_eq!(ctx.total_damage(), Amount::MAX);

        ctx.add_combat_damage(1, Amount::MAX - 5);
        ctx.add_combat_damage(2, Amount::MAX - 5);
        assert_eq!(ctx.total_damage(), Amount::MAX);

        ctx.add_combat_damage(1, Amount::MIN);
        ctx.add_combat_damage(2, -1);
        assert_eq!(ctx.total_damage(), Amount::MIN);
    }

    #[test]
    fn test_damage_overwrites_per_type() {
        let mut ctx = CombatContext::new();
        ctx.add_combat_damage(10001, 50);
        ctx.add_combat_damage(10002, 20);
        ctx.add_combat_damage(10001, 75);

        assert_eq!(ctx.damage(10001), Some(75));
        assert_eq!(ctx.damage(10002), Some(20));
        assert_eq!(ctx.total_damage(), 95);
        assert_eq!(ctx.summary(), "75 damage (type 10001), 20 damage (type 10002)");
    }

    #[test]
    fn test_trace_skips_empty_lines() {
        let mut ctx = CombatContext::new();
        ctx.append_trace("first");
        ctx.append_trace("");
        ctx.append_trace(String::from("second"));

        assert_eq!(ctx.trace(), ["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_trace_without_sink_is_noop() {
        let mut ctx = CombatContext::new().without_trace();
        ctx.append_trace("dropped");
        assert!(!ctx.has_trace_sink());
        assert!(ctx.trace().is_empty());
    }

    #[test]
    fn test_from_constants() {
        let mut constants = CombatConstants::default();
        constants.trace.enabled = false;
        constants.targets.default_count = 3;

        let ctx = CombatContext::from_constants(&constants);
        assert!(!ctx.has_trace_sink());
        assert_eq!(ctx.attack_target_count(), 3);
    }

    #[test]
    fn test_rollback_restores_written_state() {
        let mut ctx = CombatContext::new().with_param("par001", 1.0);
        ctx.add_combat_damage(10001, 10);
        ctx.append_trace("kept");
        let before = ctx.clone();

        let checkpoint = ctx.checkpoint();
        ctx.add_combat_damage(10001, 99);
        ctx.add_combat_damage(10002, 5);
        ctx.append_trace("dropped");
        ctx.set_final_combat_type(10002);
        ctx.add_fight_info(FightInfo::new(1, false, 0.0));
        ctx.rollback(checkpoint);

        assert_eq!(ctx, before);
    }

    #[test]
    fn test_fight_info_and_final_type() {
        let mut ctx = CombatContext::new();
        ctx.add_fight_info(FightInfo::new(3, true, 1500.0));
        ctx.set_final_combat_type(10002);
        ctx.add_combat_damage(10002, 40);

        assert_eq!(ctx.fight_info().len(), 1);
        assert!(ctx.fight_info()[0].success);
        assert_eq!(ctx.final_combat_type(), Some(10002));
        assert_eq!(ctx.summary(), "40 damage (type 10002), final type 10002");
    }
}
