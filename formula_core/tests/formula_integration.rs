//! Integration test: Load params -> Build entities -> Dispatch formulas
//!
//! Exercises the public API the way a simulation host drives it.

use formula_core::prelude::*;
use formula_core::config::parse_formula_params;
use formula_core::entity::{attribute_value, distance, entity_kind};
use formula_core::formula::builtin::{FIXED_STRIKE, SCALED_STRIKE, SKILL_RATE_STRIKE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread;

fn make_test_rng() -> StdRng {
    StdRng::seed_from_u64(12345)
}

fn swordsman(attack: f64) -> Player {
    Player::new(
        EntityState::new()
            .with_attribute(attr::ATTACK, attack)
            .with_position(WorldPosition::new(0.0, 0.0, 0.0)),
    )
}

fn wolf(evasion: f64) -> Monster {
    Monster::new(
        EntityState::new()
            .with_attribute(attr::EVASION, evasion)
            .with_position(WorldPosition::new(3.0, 4.0, 0.0)),
        2,
    )
}

#[test]
fn test_bundled_params_drive_scaled_strike() {
    let dispatcher = Dispatcher::with_defaults();
    let params = default_formula_params();
    let mut ctx = params.context_for(SCALED_STRIKE, dispatcher.constants());

    let (attacker, target) = (swordsman(200.0), wolf(0.0));
    let mut rolls = ScriptedRolls::fixed(0);

    let damage = dispatcher
        .evaluate(SCALED_STRIKE, &mut ctx, Combatants::new(&attacker, &target), &mut rolls, 0)
        .unwrap();

    assert_eq!(damage, 103);
    assert_eq!(ctx.damage(combat_type::PRIMARY), Some(103));
    assert_eq!(ctx.total_damage(), 103);
    assert_eq!(
        ctx.trace(),
        [
            "formula 10002: hit rate 10000 -> hit".to_string(),
            "formula 10002: 103 damage -> type 10001".to_string(),
        ]
    );
}

#[test]
fn test_bundled_params_drive_skill_rate_strike() {
    let dispatcher = Dispatcher::with_defaults();
    let mut ctx = default_formula_params().context_for(SKILL_RATE_STRIKE, dispatcher.constants());
    let (attacker, target) = (swordsman(437.0), wolf(9000.0));
    let mut rng = make_test_rng();

    let damage = dispatcher
        .evaluate(SKILL_RATE_STRIKE, &mut ctx, Combatants::new(&attacker, &target), &mut rng, 0)
        .unwrap();

    // Always hits, and the bundled rate is the identity
    assert_eq!(damage, 437);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let dispatcher = Dispatcher::with_defaults();
    let params = default_formula_params();
    let (attacker, target) = (swordsman(200.0), wolf(5000.0));

    let run = || {
        let mut rng = make_test_rng();
        (0..50)
            .map(|_| {
                let mut ctx = params.context_for(SCALED_STRIKE, dispatcher.constants());
                dispatcher
                    .evaluate(SCALED_STRIKE, &mut ctx, Combatants::new(&attacker, &target), &mut rng, 0)
                    .unwrap()
            })
            .collect::<Vec<_>>()
    };

    let first = run();
    assert_eq!(first, run());
    assert!(first.iter().all(|&d| d == 0 || d == 103));
}

#[test]
fn test_evasion_rate_matches_hit_frequency() {
    let dispatcher = Dispatcher::with_defaults();
    let params = default_formula_params();
    let (attacker, target) = (swordsman(200.0), wolf(7500.0));
    let mut rng = make_test_rng();

    let trials = 4000;
    let mut hits = 0;
    for _ in 0..trials {
        let mut ctx = params.context_for(SCALED_STRIKE, dispatcher.constants());
        let damage = dispatcher
            .evaluate(SCALED_STRIKE, &mut ctx, Combatants::new(&attacker, &target), &mut rng, 0)
            .unwrap();
        if damage > 0 {
            hits += 1;
        }
    }

    // Hit rate 2500 out of 10000
    let frequency = hits as f64 / trials as f64;
    assert!((frequency - 0.25).abs() < 0.05, "hit frequency {}", frequency);
}

#[test]
fn test_absent_combatants_read_as_zero() {
    assert_eq!(attribute_value(None, attr::ATTACK), 0.0);
    assert_eq!(entity_kind(None), EntityKind::None);
    assert_eq!(distance(None, None), 0);

    let dispatcher = Dispatcher::with_defaults();
    let mut ctx = CombatContext::new()
        .with_param("par001", 5000.0)
        .with_param("par002", 3.0);
    let mut rolls = ScriptedRolls::fixed(0);

    let damage = dispatcher
        .evaluate(SCALED_STRIKE, &mut ctx, Combatants::none(), &mut rolls, 0)
        .unwrap();
    assert_eq!(damage, 3);
}

#[test]
fn test_unknown_formula_is_reported() {
    let dispatcher = Dispatcher::with_defaults();
    let mut ctx = CombatContext::new();
    let mut rng = make_test_rng();

    let err = dispatcher
        .evaluate(99999, &mut ctx, Combatants::none(), &mut rng, 10)
        .unwrap_err();

    assert_eq!(err, FormulaError::UnknownFormula(99999));
    assert_eq!(err.to_string(), "Unknown formula id: 99999");
    assert!(ctx.damage_by_type().is_empty());
    assert!(ctx.trace().is_empty());
}

#[test]
fn test_sequential_evaluations_share_a_context() {
    let dispatcher = Dispatcher::with_defaults();
    let (attacker, target) = (swordsman(120.0), wolf(0.0));
    let mut ctx = CombatContext::new()
        .with_param("par001", 10000.0)
        .with_param("par002", 0.0)
        .with_damage_rate(5000.0);
    let mut rolls = ScriptedRolls::fixed(0);
    let combatants = Combatants::new(&attacker, &target);

    dispatcher
        .evaluate(FIXED_STRIKE, &mut ctx, combatants, &mut rolls, 0)
        .unwrap();
    assert_eq!(ctx.damage(combat_type::PRIMARY), Some(100));

    // Later formulas overwrite the same combat type
    dispatcher
        .evaluate(SKILL_RATE_STRIKE, &mut ctx, combatants, &mut rolls, 0)
        .unwrap();
    assert_eq!(ctx.damage(combat_type::PRIMARY), Some(60));
    assert_eq!(ctx.trace().len(), 4);
    assert_eq!(ctx.summary(), "60 damage (type 10001)");
}

#[test]
fn test_custom_params_table() {
    let toml = r#"
        [[formulas]]
        id = 10002

        [formulas.params]
        par001 = 20000
        par002 = 0
    "#;
    let params = parse_formula_params(toml).unwrap();
    let dispatcher = Dispatcher::with_defaults();
    let mut ctx = params.context_for(SCALED_STRIKE, dispatcher.constants());
    let (attacker, target) = (swordsman(50.0), wolf(0.0));
    let mut rolls = ScriptedRolls::fixed(0);

    let damage = dispatcher
        .evaluate(SCALED_STRIKE, &mut ctx, Combatants::new(&attacker, &target), &mut rolls, 0)
        .unwrap();
    assert_eq!(damage, 100);
}

#[test]
fn test_untraced_context_still_resolves() {
    let constants = CombatConstants::parse("[trace]\nenabled = false\n").unwrap();
    let dispatcher = Dispatcher::with_defaults().with_constants(constants);
    let mut ctx = dispatcher.new_context();
    let mut rolls = ScriptedRolls::fixed(0);

    dispatcher
        .evaluate(FIXED_STRIKE, &mut ctx, Combatants::none(), &mut rolls, 0)
        .unwrap();

    assert!(!ctx.has_trace_sink());
    assert!(ctx.trace().is_empty());
    assert_eq!(ctx.damage(combat_type::PRIMARY), Some(100));
}

#[test]
fn test_concurrent_evaluations() {
    let dispatcher = Arc::new(Dispatcher::with_defaults());
    let params = Arc::new(default_formula_params());

    let handles: Vec<_> = (0..8u64)
        .map(|worker| {
            let dispatcher = Arc::clone(&dispatcher);
            let params = Arc::clone(&params);
            thread::spawn(move || {
                let attacker = swordsman(200.0 + worker as f64 * 10.0);
                let target = wolf(0.0);
                let mut rng = StdRng::seed_from_u64(worker);
                let mut total = 0;
                for _ in 0..100 {
                    let mut ctx = params.context_for(SCALED_STRIKE, dispatcher.constants());
                    total += dispatcher
                        .evaluate(SCALED_STRIKE, &mut ctx, Combatants::new(&attacker, &target), &mut rng, 0)
                        .unwrap();
                }
                total
            })
        })
        .collect();

    for (worker, handle) in handles.into_iter().enumerate() {
        let per_hit = (200 + worker as i64 * 10) / 2 + 3;
        assert_eq!(handle.join().unwrap(), per_hit * 100);
    }
}
