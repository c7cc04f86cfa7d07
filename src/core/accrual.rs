//! Accrued value of the cash-equivalent fixed income position.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Persisted running value of the accruing deposit. One record exists per
/// data directory; it is read and rolled forward on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccrualState {
    pub value: f64,
    pub last_update: NaiveDate,
}

impl AccrualState {
    pub fn new(value: f64, last_update: NaiveDate) -> Self {
        Self { value, last_update }
    }

    /// Rolls the stored value forward to `today`. Returns the state
    /// unchanged when `today` is not after the stored date.
    ///
    /// Elapsed calendar days are compounded against a 252-day
    /// annualization, so weekends accrue as if they were trading days.
    /// Known approximation inherited from the reference behavior.
    pub fn accrued(&self, today: NaiveDate, annual_rate_pct: f64, spread: f64) -> AccrualState {
        if today <= self.last_update {
            return self.clone();
        }

        let elapsed_days = (today - self.last_update).num_days() as f64;
        let daily_rate =
            ((1.0 + annual_rate_pct / 100.0).powf(1.0 / TRADING_DAYS_PER_YEAR) - 1.0) * spread;

        AccrualState {
            value: self.value * (1.0 + daily_rate).powf(elapsed_days),
            last_update: today,
        }
    }
}
