//! Built-in formulas
//!
//! | Id    | Hit rate                         | Damage on hit                                   |
//! |-------|----------------------------------|-------------------------------------------------|
//! | 10001 | always                           | 100 stored, 0 returned                          |
//! | 10002 | `max(0, 10000 - target evasion)` | `max(1, floor(atk * par001 / 10000) + par002)` |
//! | 10003 | always                           | `ceil(atk * damageRate / 10000)`                |
//!
//! Every formula stores its result under [`combat_type::PRIMARY`], including
//! the 0 written on a miss.

use super::{Combatants, FormulaError, FormulaPair, FormulaScope};
use crate::combat::CombatContext;
use crate::entity::attribute_value;
use crate::types::{attr, combat_type, Amount, FormulaId, BASIS_POINTS};

/// Fixed 100-point strike that reports no primary damage
pub const FIXED_STRIKE: FormulaId = 10001;
/// Attack-scaled hit that can be evaded
pub const SCALED_STRIKE: FormulaId = 10002;
/// Attack scaled by the skill damage rate
pub const SKILL_RATE_STRIKE: FormulaId = 10003;

const FIXED_STRIKE_DAMAGE: Amount = 100;

/// All built-in formula pairs
pub fn formulas() -> [(FormulaId, FormulaPair); 3] {
    [
        (
            FIXED_STRIKE,
            FormulaPair {
                hit_rate: always_hits,
                damage: fixed_strike,
            },
        ),
        (
            SCALED_STRIKE,
            FormulaPair {
                hit_rate: evadable,
                damage: scaled_strike,
            },
        ),
        (
            SKILL_RATE_STRIKE,
            FormulaPair {
                hit_rate: always_hits,
                damage: skill_rate_strike,
            },
        ),
    ]
}

fn always_hits(_ctx: &CombatContext, _combatants: &Combatants<'_>) -> i64 {
    BASIS_POINTS
}

/// `max(0, 10000 - evasion)`, floored so the integer draw compares the same way
fn evadable(_ctx: &CombatContext, combatants: &Combatants<'_>) -> i64 {
    let evasion = attribute_value(combatants.target, attr::EVASION);
    (BASIS_POINTS as f64 - evasion).max(0.0).floor() as i64
}

fn fixed_strike(scope: &mut FormulaScope<'_>, _init_damage: Amount) -> Result<Amount, FormulaError> {
    let stored = if scope.damage_hit() { FIXED_STRIKE_DAMAGE } else { 0 };
    scope.add_combat_damage(combat_type::PRIMARY, stored);
    Ok(0)
}

fn scaled_strike(scope: &mut FormulaScope<'_>, _init_damage: Amount) -> Result<Amount, FormulaError> {
    let init_damage = attribute_value(scope.attacker(), attr::ATTACK);

    let damage = if scope.damage_hit() {
        let ratio = scope.param("par001")?;
        let flat = scope.param("par002")?;
        let base = (init_damage * ratio / BASIS_POINTS as f64).floor() + flat;
        base.max(1.0) as Amount
    } else {
        0
    };

    scope.add_combat_damage(combat_type::PRIMARY, damage);
    Ok(damage)
}

fn skill_rate_strike(scope: &mut FormulaScope<'_>, _init_damage: Amount) -> Result<Amount, FormulaError> {
    let init_damage = attribute_value(scope.attacker(), attr::ATTACK);

    let damage = if scope.damage_hit() {
        let rate = scope.skill_damage_rate()?;
        (init_damage * rate / BASIS_POINTS as f64).ceil() as Amount
    } else {
        0
    };

    scope.add_combat_damage(combat_type::PRIMARY, damage);
    Ok(damage)
}
