//! Core business logic: valuation, history, drift and contribution.

pub mod accrual;
pub mod category;
pub mod config;
pub mod contribution;
pub mod history;
pub mod log;
pub mod market;
pub mod rebalance;
pub mod valuation;

// Re-export main types for cleaner imports
pub use accrual::AccrualState;
pub use category::AssetCategory;
pub use config::{AppConfig, EngineSettings, HoldingConfig, TargetWeight};
pub use contribution::{ContributionAllocator, ContributionPlan, ContributionSlice};
pub use history::{HistoryEntry, HistoryTracker};
pub use market::{AssetQuote, EconomicIndicators, MarketDataTable, MarketSnapshot};
pub use rebalance::{DriftEntry, DriftStatus, RebalanceAnalyzer};
pub use valuation::{PortfolioSnapshot, ValuationEngine, ValuedHolding};
