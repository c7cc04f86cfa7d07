//! Day-over-day tracking of the portfolio's total value.

use crate::store::StateStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// One persisted total-value record. At most one exists per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub value: f64,
}

/// Persists one total per day and reports the variation against the most
/// recent prior day. History is best-effort telemetry: load and save
/// failures are logged and never abort the run.
pub struct HistoryTracker<'a> {
    store: &'a dyn StateStore,
}

impl<'a> HistoryTracker<'a> {
    pub fn new(store: &'a dyn StateStore) -> Self {
        Self { store }
    }

    /// Upserts `total` under `today` and returns the day-over-day variation
    /// percent. The first recorded day reports 0.
    pub fn record(&self, today: NaiveDate, total: f64) -> f64 {
        let mut entries = match self.store.load_history() {
            Ok(entries) => entries,
            Err(e) => {
                error!("Failed to load history, starting empty: {e:#}");
                Vec::new()
            }
        };
        // Storage order is not guaranteed.
        entries.sort_by_key(|e| e.date);

        let variation = entries
            .iter()
            .rev()
            .find(|e| e.date < today)
            .map(|prev| {
                if prev.value > 0.0 {
                    (total - prev.value) / prev.value * 100.0
                } else {
                    0.0
                }
            })
            .unwrap_or(0.0);

        match entries.iter_mut().find(|e| e.date == today) {
            Some(entry) => entry.value = total,
            None => entries.push(HistoryEntry { date: today, value: total }),
        }

        if let Err(e) = self.store.save_history(&entries) {
            error!("Failed to persist history: {e:#}");
        } else {
            debug!(%today, total, variation, "Recorded portfolio total");
        }
        variation
    }
}
