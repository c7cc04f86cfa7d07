//! Market data inputs supplied by the external collector.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// A single ticker's quote with the fundamentals the collector provides.
/// Every field is defaulted so a sparse snapshot file still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetQuote {
    pub price: f64,
    pub name: String,
    pub change_1d_pct: f64,
    pub change_12m_pct: f64,
    pub dividend_yield_pct: f64,
    pub price_to_book: f64,
    pub price_to_earnings: f64,
    pub return_on_equity_pct: f64,
    pub sector: String,
    pub recommendation: String,
}

/// Reference rates published alongside the quotes. Absent fields are zero
/// and trigger the engine's fallback rules downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicIndicators {
    pub policy_rate_pct: f64,
    pub interbank_rate_pct: f64,
    pub fx_reference_rate: f64,
}

/// On-disk shape of the snapshot file the collector writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSnapshot {
    pub quotes: HashMap<String, AssetQuote>,
    pub indicators: EconomicIndicators,
}

impl MarketSnapshot {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read market snapshot: {}",
                path.as_ref().display()
            )
        })?;
        let snapshot: Self = serde_json::from_str(&raw).with_context(|| {
            format!(
                "Failed to parse market snapshot: {}",
                path.as_ref().display()
            )
        })?;
        debug!(quotes = snapshot.quotes.len(), "Loaded market snapshot");
        Ok(snapshot)
    }

    pub fn into_parts(self) -> (MarketDataTable, EconomicIndicators) {
        (MarketDataTable::new(self.quotes), self.indicators)
    }
}

/// Lookup table from ticker to quote. Unknown tickers resolve to an
/// all-zero quote rather than an error.
#[derive(Debug, Default)]
pub struct MarketDataTable {
    quotes: HashMap<String, AssetQuote>,
}

impl MarketDataTable {
    pub fn new(quotes: HashMap<String, AssetQuote>) -> Self {
        Self { quotes }
    }

    pub fn quote(&self, ticker: &str) -> AssetQuote {
        match self.quotes.get(ticker) {
            Some(quote) => quote.clone(),
            None => {
                debug!(ticker, "No quote in market data, using zero defaults");
                AssetQuote::default()
            }
        }
    }

    /// Quoted price for `ticker`, if the ticker is present at all.
    pub fn price(&self, ticker: &str) -> Option<f64> {
        self.quotes.get(ticker).map(|q| q.price)
    }
}
