//! Formula simulator
//!
//! Evaluates one combat formula against a TOML scenario with a seeded
//! generator and prints what the formula wrote.
//! Run with: `cargo run -p formula_sim -- formula_sim/scenarios/duel.toml`

mod scenario;

use anyhow::{Context, Result};
use clap::Parser;
use formula_core::types::{Amount, CombatType, FormulaId};
use formula_core::{CombatContext, Dispatcher};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scenario::Scenario;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

/// Evaluate a combat formula against a scenario
#[derive(Parser)]
#[command(name = "formula_sim")]
#[command(about = "Run combat formulas against TOML scenarios", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario file to evaluate
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Override the scenario seed
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the number of runs
    #[arg(short, long, value_name = "RUNS")]
    runs: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Damage, damage map and trace per run
    Summary,
    /// Full JSON report
    Json,
}

#[derive(Debug, Serialize)]
struct RunReport {
    damage: Amount,
    damage_by_type: BTreeMap<CombatType, Amount>,
    final_combat_type: Option<CombatType>,
    trace: Vec<String>,
}

impl RunReport {
    fn new(damage: Amount, ctx: &CombatContext) -> Self {
        RunReport {
            damage,
            damage_by_type: ctx.damage_by_type().clone(),
            final_combat_type: ctx.final_combat_type(),
            trace: ctx.trace().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    formula: FormulaId,
    seed: u64,
    runs: Vec<RunReport>,
    /// Runs that stored damage under any combat type
    damaging_runs: usize,
    total_damage: Amount,
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<Report> {
    let scenario = Scenario::load(&cli.scenario)?;
    let formula = scenario.formula_id()?;
    let table = scenario.param_table()?;
    let seed = cli.seed.unwrap_or(scenario.seed);
    let runs = cli.runs.unwrap_or(scenario.runs).max(1);

    let dispatcher = Dispatcher::with_defaults().with_constants(scenario.constants.clone());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    info!(formula, seed, runs, "evaluating scenario {}", cli.scenario.display());

    let mut reports = Vec::with_capacity(runs as usize);
    for run in 0..runs {
        let mut ctx = scenario.context(&table, formula);
        let damage = dispatcher
            .evaluate(formula, &mut ctx, scenario.combatants(), &mut rng, scenario.init_damage)
            .with_context(|| format!("Run {} of formula {} failed", run + 1, formula))?;
        reports.push(RunReport::new(damage, &ctx));
    }

    let damaging_runs = reports
        .iter()
        .filter(|r| r.damage_by_type.values().any(|&amount| amount > 0))
        .count();
    let total_damage = sum_damage(&reports);
    Ok(Report {
        formula,
        seed,
        runs: reports,
        damaging_runs,
        total_damage,
    })
}

/// Returned damage over all runs, saturating at the `Amount` bounds
fn sum_damage(reports: &[RunReport]) -> Amount {
    reports
        .iter()
        .fold(0, |total: Amount, report| total.saturating_add(report.damage))
}

fn print_summary(report: &Report) {
    println!("Formula {} (seed {})", report.formula, report.seed);
    for (index, run) in report.runs.iter().enumerate() {
        println!("\nRun {}: {} damage", index + 1, run.damage);
        for (combat_type, amount) in &run.damage_by_type {
            println!("  type {:>6}: {}", combat_type, amount);
        }
        if let Some(final_type) = run.final_combat_type {
            println!("  final type: {}", final_type);
        }
        for line in &run.trace {
            println!("  | {}", line);
        }
    }

    if report.runs.len() > 1 {
        let average = report.total_damage as f64 / report.runs.len() as f64;
        println!(
            "\n{} runs, {} dealt damage, {} total ({:.1} per run)",
            report.runs.len(),
            report.damaging_runs,
            report.total_damage,
            average
        );
    }
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let format = cli.format;
    let report = run(cli)?;

    match format {
        OutputFormat::Summary => print_summary(&report),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
            println!("{}", json);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(damage: Amount) -> RunReport {
        RunReport {
            damage,
            damage_by_type: BTreeMap::from([(10001, damage)]),
            final_combat_type: None,
            trace: Vec::new(),
        }
    }

    #[test]
    fn test_sum_damage() {
        assert_eq!(sum_damage(&[]), 0);
        assert_eq!(sum_damage(&[report(103), report(0), report(97)]), 200);
    }

    #[test]
    fn test_sum_damage_saturates() {
        let huge = 9_000_000_000_000_000_000;
        assert_eq!(sum_damage(&[report(huge), report(huge)]), Amount::MAX);
    }
}
