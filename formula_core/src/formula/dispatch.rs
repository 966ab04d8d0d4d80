//! Dispatcher - Resolve a formula and run it against a context

use super::{parse_damage_name, Combatants, FormulaError, FormulaPair, FormulaRegistry, FormulaScope};
use crate::combat::CombatContext;
use crate::config::CombatConstants;
use crate::rng::RandomSource;
use crate::types::{Amount, FormulaId};
use tracing::{debug, warn};

/// Owns the formula registry and the constants formulas are evaluated under
///
/// Read-only after construction, so a single dispatcher can serve
/// evaluations running on many threads as long as each brings its own
/// context and random source.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: FormulaRegistry,
    constants: CombatConstants,
}

impl Dispatcher {
    pub fn new(registry: FormulaRegistry) -> Self {
        Dispatcher {
            registry,
            constants: CombatConstants::default(),
        }
    }

    /// Dispatcher over the built-in formulas
    pub fn with_defaults() -> Self {
        Self::new(FormulaRegistry::with_defaults())
    }

    pub fn with_constants(mut self, constants: CombatConstants) -> Self {
        self.constants = constants;
        self
    }

    pub fn registry(&self) -> &FormulaRegistry {
        &self.registry
    }

    pub fn constants(&self) -> &CombatConstants {
        &self.constants
    }

    /// Fresh context following this dispatcher's constants
    pub fn new_context(&self) -> CombatContext {
        CombatContext::from_constants(&self.constants)
    }

    fn lookup(&self, id: FormulaId) -> Result<&FormulaPair, FormulaError> {
        self.registry.get(id).map_err(|err| {
            warn!(formula = id, "formula lookup failed");
            err
        })
    }

    /// Hit rate of a formula in basis points, clamped to the configured bounds
    pub fn hit_rate(
        &self,
        id: FormulaId,
        ctx: &CombatContext,
        combatants: &Combatants<'_>,
    ) -> Result<i64, FormulaError> {
        let pair = self.lookup(id)?;
        Ok(self.constants.hit.clamp((pair.hit_rate)(ctx, combatants)))
    }

    /// Evaluate a damage formula
    ///
    /// Returns the formula's primary damage. Every combat type the formula
    /// wrote, and its trace lines, are left in `ctx`. On any error `ctx` is
    /// left as it was before the call; an unknown id fails before it is
    /// touched.
    pub fn evaluate<R: RandomSource>(
        &self,
        id: FormulaId,
        ctx: &mut CombatContext,
        combatants: Combatants<'_>,
        rng: &mut R,
        init_damage: Amount,
    ) -> Result<Amount, FormulaError> {
        let pair = self.lookup(id)?;

        let checkpoint = ctx.checkpoint();
        let mut scope = FormulaScope::new(
            id,
            pair.hit_rate,
            &self.constants.hit,
            ctx,
            combatants,
            rng as &mut dyn RandomSource,
        );
        let result = (pair.damage)(&mut scope, init_damage);
        let hit = scope.hit_outcome();

        match result {
            Ok(damage) => {
                debug!(formula = id, hit = ?hit, damage, "formula evaluated");
                Ok(damage)
            }
            Err(err) => {
                ctx.rollback(checkpoint);
                warn!(formula = id, error = %err, "formula evaluation failed");
                Err(err)
            }
        }
    }

    /// Evaluate a damage formula addressed by name (`damage_<id>`)
    pub fn evaluate_by_name<R: RandomSource>(
        &self,
        name: &str,
        ctx: &mut CombatContext,
        combatants: Combatants<'_>,
        rng: &mut R,
        init_damage: Amount,
    ) -> Result<Amount, FormulaError> {
        let id = parse_damage_name(name).map_err(|err| {
            warn!(name, "formula name not recognised");
            err
        })?;
        self.evaluate(id, ctx, combatants, rng, init_damage)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}
