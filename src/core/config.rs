use crate::core::category::AssetCategory;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// One position of the portfolio as declared in the config file.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HoldingConfig {
    pub ticker: String,
    pub quantity: f64,
    pub category: AssetCategory,
    /// Average cost per unit; enables profit/loss columns when set.
    #[serde(default)]
    pub cost_basis: Option<f64>,
    /// Marks the cash-equivalent position whose value comes from the
    /// persisted accrual state. `quantity` seeds that state on first run.
    #[serde(default)]
    pub accruing: bool,
}

/// One bucket of the target allocation policy. Order in the config file
/// defines the drift table order.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TargetWeight {
    pub category: String,
    /// Target share of the portfolio as a fraction (0.35 = 35%).
    pub weight: f64,
}

/// Engine constants. Everything policy-like is kept here so tests and the
/// config file can override it.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EngineSettings {
    pub home_currency: String,
    /// Ticker whose quoted price is the home-currency FX rate.
    pub fx_ticker: String,
    /// Rate applied when the FX ticker is missing or non-positive.
    pub fallback_fx_rate: f64,
    /// Drift beyond this many percentage points flags BUY/SELL.
    pub drift_band_pct: f64,
    /// Fixed income above this current weight is treated as dry powder and
    /// excluded from contribution suggestions.
    pub fixed_income_ceiling_pct: f64,
    /// Multiplier over the base rate for the accruing deposit (1.15 = 115%).
    pub accrual_spread: f64,
    /// Subtracted from the policy rate to approximate the interbank rate.
    pub policy_rate_haircut_pct: f64,
    /// Base rate used when the indicator set carries no policy rate.
    pub fallback_policy_rate_pct: f64,
    /// Default amount distributed by the contribute command.
    pub monthly_contribution: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            home_currency: "BRL".to_string(),
            fx_ticker: "BRL=X".to_string(),
            fallback_fx_rate: 5.0,
            drift_band_pct: 5.0,
            fixed_income_ceiling_pct: 40.0,
            accrual_spread: 1.15,
            policy_rate_haircut_pct: 0.10,
            fallback_policy_rate_pct: 11.75,
            monthly_contribution: 250.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub holdings: Vec<HoldingConfig>,
    pub target_allocation: Vec<TargetWeight>,
    #[serde(default)]
    pub settings: EngineSettings,
    pub data_path: Option<String>,
    pub market_data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("br", "carteira", "carteira")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("br", "carteira", "carteira")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Path of the market snapshot file the collector maintains.
    pub fn default_market_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.market_data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(self.default_data_path()?.join("market.json"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
