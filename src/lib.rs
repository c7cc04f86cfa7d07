pub mod cli;
pub mod core;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::contribution::ContributionAllocator;
use crate::core::history::HistoryTracker;
use crate::core::market::MarketSnapshot;
use crate::core::rebalance::RebalanceAnalyzer;
use crate::core::valuation::ValuationEngine;
use crate::store::disk::FjallStore;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Full daily report: holdings, drift and contribution suggestion.
    Report,
    /// Allocation drift table only.
    Drift,
    /// Contribution plan for an amount (defaults to the configured one).
    Contribute { amount: Option<f64> },
}

pub fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    market_data_path: Option<&str>,
) -> Result<()> {
    info!("Portfolio valuation starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let market_path = match market_data_path {
        Some(path) => PathBuf::from(path),
        None => config.default_market_data_path()?,
    };
    // The collector owns this file; a missing or broken snapshot degrades
    // to zero quotes instead of failing the run.
    let snapshot_file = match MarketSnapshot::load_from_path(&market_path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(
                "Market snapshot unavailable at {}: {e:#}; valuing with an empty table",
                market_path.display()
            );
            MarketSnapshot::default()
        }
    };
    let (market, indicators) = snapshot_file.into_parts();

    let state_path = config.default_data_path()?.join("state");
    let store = FjallStore::open(&state_path).context("Failed to open the state store")?;

    let today = chrono::Local::now().date_naive();
    let settings = &config.settings;

    let engine = ValuationEngine::new(&market, &indicators, settings, &store);
    let snapshot = engine.value_portfolio(&config.holdings, today);
    let variation_pct = HistoryTracker::new(&store).record(today, snapshot.total_value);
    let drift = RebalanceAnalyzer::new(&config.target_allocation, settings.drift_band_pct)
        .analyze(&snapshot);

    match command {
        AppCommand::Report => {
            let amount = settings.monthly_contribution;
            let plan = ContributionAllocator::new(settings.fixed_income_ceiling_pct)
                .allocate(amount, &drift);
            cli::report::run(
                today,
                &snapshot,
                variation_pct,
                &indicators,
                &drift,
                amount,
                &plan,
                settings,
            )
        }
        AppCommand::Drift => cli::drift::run(&drift),
        AppCommand::Contribute { amount } => {
            let amount = amount.unwrap_or(settings.monthly_contribution);
            let plan = ContributionAllocator::new(settings.fixed_income_ceiling_pct)
                .allocate(amount, &drift);
            cli::contribute::run(amount, &plan)
        }
    }
}
