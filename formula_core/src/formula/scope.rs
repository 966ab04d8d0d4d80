//! FormulaScope - What a damage function may see and touch

use super::{Combatants, FormulaError, HitRateFn};
use crate::combat::{CombatContext, FightInfo, DAMAGE_EXT_PARAM, DAMAGE_RATE_PARAM};
use crate::config::HitConstants;
use crate::entity::Entity;
use crate::rng::{bounded_random_int, resolve_hit, RandomSource};
use crate::types::{Amount, CombatType, FormulaId};

/// Evaluation scope handed to a damage function
///
/// Wraps the context, the combatants and the random source for one
/// evaluation. The hit roll is drawn at most once: the first call to
/// [`FormulaScope::damage_hit`] rolls against the formula's own hit rate and
/// later calls reuse that outcome.
pub struct FormulaScope<'a> {
    id: FormulaId,
    hit_rate_fn: HitRateFn,
    hit_bounds: &'a HitConstants,
    ctx: &'a mut CombatContext,
    combatants: Combatants<'a>,
    rng: &'a mut dyn RandomSource,
    hit: Option<bool>,
}

impl<'a> FormulaScope<'a> {
    pub(crate) fn new(
        id: FormulaId,
        hit_rate_fn: HitRateFn,
        hit_bounds: &'a HitConstants,
        ctx: &'a mut CombatContext,
        combatants: Combatants<'a>,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        FormulaScope {
            id,
            hit_rate_fn,
            hit_bounds,
            ctx,
            combatants,
            rng,
            hit: None,
        }
    }

    pub fn id(&self) -> FormulaId {
        self.id
    }

    pub fn attacker(&self) -> Option<&'a dyn Entity> {
        self.combatants.attacker
    }

    pub fn target(&self) -> Option<&'a dyn Entity> {
        self.combatants.target
    }

    pub fn user(&self) -> Option<&'a dyn Entity> {
        self.combatants.user
    }

    pub fn context(&self) -> &CombatContext {
        &*self.ctx
    }

    /// Hit rate of this formula, clamped to the configured bounds
    pub fn hit_rate(&self) -> i64 {
        self.hit_bounds
            .clamp((self.hit_rate_fn)(&*self.ctx, &self.combatants))
    }

    /// Whether this evaluation hits; rolls on first use
    pub fn damage_hit(&mut self) -> bool {
        if let Some(hit) = self.hit {
            return hit;
        }

        let rate = self.hit_rate();
        let hit = resolve_hit(&mut *self.rng, rate);
        self.hit = Some(hit);
        self.ctx.append_trace(format!(
            "formula {}: hit rate {} -> {}",
            self.id,
            rate,
            if hit { "hit" } else { "miss" }
        ));
        hit
    }

    /// Outcome of the hit roll, `None` if the formula never rolled
    pub fn hit_outcome(&self) -> Option<bool> {
        self.hit
    }

    /// Required custom parameter
    pub fn param(&self, name: &str) -> Result<f64, FormulaError> {
        self.ctx
            .custom_value(name)
            .ok_or_else(|| FormulaError::MissingParameter {
                formula: self.id,
                name: name.to_string(),
            })
    }

    /// Skill damage rate, in basis points
    pub fn skill_damage_rate(&self) -> Result<f64, FormulaError> {
        self.param(DAMAGE_RATE_PARAM)
    }

    pub fn skill_damage_ext(&self) -> Result<f64, FormulaError> {
        self.param(DAMAGE_EXT_PARAM)
    }

    pub fn attack_target_count(&self) -> i64 {
        self.ctx.attack_target_count()
    }

    /// Store damage for a combat type
    pub fn add_combat_damage(&mut self, combat_type: CombatType, amount: Amount) {
        self.ctx.add_combat_damage(combat_type, amount);
        self.ctx.append_trace(format!(
            "formula {}: {} damage -> type {}",
            self.id, amount, combat_type
        ));
    }

    pub fn set_final_combat_type(&mut self, combat_type: CombatType) {
        self.ctx.set_final_combat_type(combat_type);
    }

    pub fn add_fight_info(&mut self, fight_id: u32, success: bool, value: f64) {
        self.ctx.add_fight_info(FightInfo::new(fight_id, success, value));
    }

    /// Append a free-form trace line
    pub fn log(&mut self, line: impl Into<String>) {
        self.ctx.append_trace(line);
    }

    /// Uniform integer in `[min, max]`
    pub fn rand_int(&mut self, min: i64, max: i64) -> i64 {
        bounded_random_int(&mut *self.rng, min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRolls;
    use crate::types::BASIS_POINTS;

    fn half_rate(_ctx: &CombatContext, _c: &Combatants<'_>) -> i64 {
        5000
    }

    fn over_rate(_ctx: &CombatContext, _c: &Combatants<'_>) -> i64 {
        BASIS_POINTS * 3
    }

    #[test]
    fn test_hit_rolled_once() {
        let bounds = HitConstants::default();
        let mut ctx = CombatContext::new();
        let mut rolls = ScriptedRolls::new(vec![100, 9000]);
        let mut scope = FormulaScope::new(
            1,
            half_rate,
            &bounds,
            &mut ctx,
            Combatants::none(),
            &mut rolls,
        );

        assert_eq!(scope.hit_outcome(), None);
        assert!(scope.damage_hit());
        // Second call reuses the first draw instead of drawing 9000
        assert!(scope.damage_hit());
        assert_eq!(scope.hit_outcome(), Some(true));
        drop(scope);

        assert_eq!(rolls.consumed(), 1);
        assert_eq!(ctx.trace(), ["formula 1: hit rate 5000 -> hit".to_string()]);
    }

    #[test]
    fn test_hit_rate_clamped() {
        let bounds = HitConstants::default();
        let mut ctx = CombatContext::new();
        let mut rolls = ScriptedRolls::fixed(0);
        let scope = FormulaScope::new(2, over_rate, &bounds, &mut ctx, Combatants::none(), &mut rolls);

        assert_eq!(scope.hit_rate(), BASIS_POINTS);
    }

    #[test]
    fn test_missing_param_names_formula() {
        let bounds = HitConstants::default();
        let mut ctx = CombatContext::new().with_param("par001", 2.0);
        let mut rolls = ScriptedRolls::fixed(0);
        let scope = FormulaScope::new(7, half_rate, &bounds, &mut ctx, Combatants::none(), &mut rolls);

        assert_eq!(scope.param("par001"), Ok(2.0));
        assert_eq!(
            scope.param("par002"),
            Err(FormulaError::MissingParameter {
                formula: 7,
                name: "par002".to_string()
            })
        );
        assert!(scope.skill_damage_rate().is_err());
    }

    #[test]
    fn test_side_records() {
        let bounds = HitConstants::default();
        let mut ctx = CombatContext::new();
        let mut rolls = ScriptedRolls::fixed(4);
        let mut scope = FormulaScope::new(3, half_rate, &bounds, &mut ctx, Combatants::none(), &mut rolls);

        scope.add_combat_damage(10001, 12);
        scope.set_final_combat_type(10001);
        scope.add_fight_info(5, false, 0.0);
        scope.log("custom line");
        assert_eq!(scope.rand_int(1, 10), 5);
        drop(scope);

        assert_eq!(ctx.damage(10001), Some(12));
        assert_eq!(ctx.final_combat_type(), Some(10001));
        assert_eq!(ctx.fight_info().len(), 1);
        assert_eq!(ctx.trace().len(), 2);
    }
}
