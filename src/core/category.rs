use serde::{Deserialize, Serialize};

/// Asset categories recognized by the valuation engine. Each category picks
/// a valuation rule and maps to at most one bucket of the target allocation
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    BrEquity,
    RealEstateFund,
    Etf,
    UsReit,
    UsEquity,
    Crypto,
    FixedIncome,
    Other,
}

impl From<&str> for AssetCategory {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "br_equity" | "stock" | "stocks" => AssetCategory::BrEquity,
            "real_estate_fund" | "fii" | "fiis" => AssetCategory::RealEstateFund,
            "etf" | "etfs" => AssetCategory::Etf,
            "us_reit" | "reit" | "reits" => AssetCategory::UsReit,
            "us_equity" | "us_stocks" => AssetCategory::UsEquity,
            "crypto" | "cryptocurrency" => AssetCategory::Crypto,
            "fixed_income" | "debt" | "income" => AssetCategory::FixedIncome,
            _ => AssetCategory::Other,
        }
    }
}

impl AssetCategory {
    /// Name of the target-allocation bucket this category belongs to.
    /// `Other` has no bucket and is left out of the drift grouping.
    pub fn policy_name(&self) -> Option<&'static str> {
        match self {
            AssetCategory::BrEquity => Some("Equities BR"),
            AssetCategory::RealEstateFund => Some("Real Estate Funds"),
            AssetCategory::Etf => Some("ETFs"),
            AssetCategory::UsReit => Some("US REITs"),
            AssetCategory::UsEquity => Some("US Equities"),
            AssetCategory::Crypto => Some("Crypto"),
            AssetCategory::FixedIncome => Some("Fixed Income"),
            AssetCategory::Other => None,
        }
    }

    /// Returns a display label for report sections.
    pub fn label(&self) -> &'static str {
        match self {
            AssetCategory::BrEquity => "Equities BR",
            AssetCategory::RealEstateFund => "Real Estate Funds",
            AssetCategory::Etf => "ETFs",
            AssetCategory::UsReit => "US REITs",
            AssetCategory::UsEquity => "US Equities",
            AssetCategory::Crypto => "Crypto",
            AssetCategory::FixedIncome => "Fixed Income",
            AssetCategory::Other => "Other",
        }
    }
}
