//! Drift of the current allocation against the target policy.

use crate::core::config::TargetWeight;
use crate::core::valuation::PortfolioSnapshot;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftStatus {
    Buy,
    Sell,
    Ok,
}

impl fmt::Display for DriftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DriftStatus::Buy => "BUY",
            DriftStatus::Sell => "SELL",
            DriftStatus::Ok => "OK",
        };
        write!(f, "{s}")
    }
}

/// One policy bucket's drift. `diff` is current minus target, in
/// percentage points.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftEntry {
    pub category: String,
    pub current_pct: f64,
    pub target_pct: f64,
    pub diff: f64,
    pub status: DriftStatus,
}

/// Groups a snapshot by policy bucket and flags drift outside the band.
pub struct RebalanceAnalyzer<'a> {
    policy: &'a [TargetWeight],
    band_pct: f64,
}

impl<'a> RebalanceAnalyzer<'a> {
    pub fn new(policy: &'a [TargetWeight], band_pct: f64) -> Self {
        Self { policy, band_pct }
    }

    /// One entry per policy bucket, in policy order. Buckets with no
    /// holdings report a current weight of 0. Holdings whose category maps
    /// to no bucket are left out of the sums.
    pub fn analyze(&self, snapshot: &PortfolioSnapshot) -> Vec<DriftEntry> {
        let mut value_by_bucket: HashMap<&str, f64> = HashMap::new();
        for holding in &snapshot.holdings {
            if let Some(bucket) = holding.category.policy_name() {
                *value_by_bucket.entry(bucket).or_insert(0.0) += holding.value;
            }
        }

        self.policy
            .iter()
            .map(|target| {
                let bucket_value = value_by_bucket
                    .get(target.category.as_str())
                    .copied()
                    .unwrap_or(0.0);
                let current_pct = if snapshot.total_value > 0.0 {
                    bucket_value / snapshot.total_value * 100.0
                } else {
                    0.0
                };
                let target_pct = target.weight * 100.0;
                let diff = current_pct - target_pct;

                let status = if diff > self.band_pct {
                    DriftStatus::Sell
                } else if diff < -self.band_pct {
                    DriftStatus::Buy
                } else {
                    DriftStatus::Ok
                };

                DriftEntry {
                    category: target.category.clone(),
                    current_pct,
                    target_pct,
                    diff,
                    status,
                }
            })
            .collect()
    }
}
