//! CLI commands

use lendpool_core::PoolParams;
use lendpool_ledger::PoolConfig;
use rust_decimal::Decimal;
use std::path::Path;

use crate::script::{format_units, Script};
use crate::simulation::{Simulation, SimulationReport};

/// Load and validate a pool configuration
pub fn check_config(path: &Path) -> anyhow::Result<PoolParams> {
    let config = PoolConfig::from_file(path)?;
    let params = config.params()?;

    println!("✅ {} is valid", path.display());
    println!("   admin:                 {}", config.admin);
    println!(
        "   assets:                borrow {} / collateral {}",
        config.borrow_asset, config.collateral_asset
    );
    println!("   max LTV:               {}", percent(params.max_ltv_bps));
    println!(
        "   liquidation threshold: {}",
        percent(params.liquidation_threshold_bps)
    );
    println!(
        "   liquidation bonus:     {}",
        percent(params.liquidation_bonus_bps)
    );
    println!(
        "   borrow rate:           {} ({} APR)",
        params.borrow_rate,
        apr(params.borrow_rate)
    );
    println!(
        "   supply rate:           {} ({} APR)",
        params.supply_rate,
        apr(params.supply_rate)
    );
    Ok(params)
}

/// Replay a script against a fresh pool and print the outcome
pub async fn simulate(
    config_path: &Path,
    script_path: &Path,
    journal: Option<&Path>,
) -> anyhow::Result<SimulationReport> {
    let config = PoolConfig::from_file(config_path)?;
    let script = Script::from_file(script_path)?;
    let simulation = Simulation::new(&config, &script, journal)?;

    let outcomes = simulation.run(&script.steps).await?;
    for outcome in &outcomes {
        let mark = if outcome.is_ok() { "✅" } else { "❌" };
        println!("{} [{:>3}] {:<28} {}", mark, outcome.index, outcome.step, outcome.detail);
    }

    let report = simulation.report(outcomes).await?;
    let decimals = script.token_decimals;
    println!();
    println!("Pool at t={}", report.ledger_time);
    println!("   supplied:    {}", format_units(report.pool.total_supplied, decimals));
    println!("   borrowed:    {}", format_units(report.pool.total_borrowed, decimals));
    println!("   collateral:  {}", format_units(report.pool.total_collateral, decimals));
    println!("   utilization: {}", percent(report.utilization_bps));
    for snapshot in &report.accounts {
        println!(
            "   {:<12} supplied {} collateral {} debt {} status {:?}",
            snapshot.account.to_string(),
            format_units(snapshot.supply.total, decimals),
            format_units(snapshot.collateral, decimals),
            format_units(snapshot.debt, decimals),
            snapshot.status
        );
    }
    if let Some(path) = journal {
        println!("Events journaled to {}", path.display());
    }
    Ok(report)
}

fn percent(bps: u128) -> String {
    i128::try_from(bps)
        .ok()
        .and_then(|raw| Decimal::try_from_i128_with_scale(raw, 2).ok())
        .map(|value| format!("{}%", value.normalize()))
        .unwrap_or_else(|| format!("{} bp", bps))
}

fn apr(rate: u128) -> String {
    i128::try_from(rate)
        .ok()
        .and_then(|raw| Decimal::try_from_i128_with_scale(raw, 16).ok())
        .map(|value| format!("{}%", value.normalize()))
        .unwrap_or_else(|| format!("{} / 1e18", rate))
}
