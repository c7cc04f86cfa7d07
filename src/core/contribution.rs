//! Distribution of a new contribution across under-weighted buckets.

use crate::core::category::AssetCategory;
use crate::core::rebalance::DriftEntry;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ContributionSlice {
    pub category: String,
    pub amount: f64,
}

/// Outcome of a contribution run. `Balanced` is the explicit no-suggestion
/// signal for a portfolio with nothing under-weighted to fund.
#[derive(Debug, Clone, PartialEq)]
pub enum ContributionPlan {
    Balanced,
    Suggestions(Vec<ContributionSlice>),
}

/// Splits an amount across under-weighted buckets in proportion to their
/// gap. Fixed income above the ceiling is dry powder, not a target.
pub struct ContributionAllocator {
    fixed_income_ceiling_pct: f64,
}

impl ContributionAllocator {
    pub fn new(fixed_income_ceiling_pct: f64) -> Self {
        Self {
            fixed_income_ceiling_pct,
        }
    }

    pub fn allocate(&self, amount: f64, drift: &[DriftEntry]) -> ContributionPlan {
        let fixed_income = AssetCategory::FixedIncome.policy_name();

        let candidates: Vec<&DriftEntry> = drift
            .iter()
            .filter(|entry| entry.diff < 0.0)
            .filter(|entry| {
                let over_ceiling = Some(entry.category.as_str()) == fixed_income
                    && entry.current_pct > self.fixed_income_ceiling_pct;
                if over_ceiling {
                    debug!(
                        category = %entry.category,
                        current_pct = entry.current_pct,
                        "Fixed income above ceiling, excluded from contribution"
                    );
                }
                !over_ceiling
            })
            .collect();

        if candidates.is_empty() {
            return ContributionPlan::Balanced;
        }

        let total_gap: f64 = candidates.iter().map(|entry| entry.diff.abs()).sum();
        let slices = candidates
            .iter()
            .map(|entry| ContributionSlice {
                category: entry.category.clone(),
                amount: if total_gap > 0.0 {
                    amount * entry.diff.abs() / total_gap
                } else {
                    0.0
                },
            })
            .collect();

        ContributionPlan::Suggestions(slices)
    }
}
