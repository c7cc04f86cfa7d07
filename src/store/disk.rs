use super::StateStore;
use crate::core::accrual::AccrualState;
use crate::core::history::HistoryEntry;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const ACCRUAL_KEY: &str = "state";

/// Persistent state store backed by a fjall keyspace with one partition per
/// record kind. Values are JSON; history entries are keyed by ISO date, so
/// writing a date that already exists overwrites it.
pub struct FjallStore {
    keyspace: Keyspace,
    accrual: PartitionHandle,
    history: PartitionHandle,
}

impl FjallStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        std::fs::create_dir_all(path.as_ref()).with_context(|| {
            format!(
                "Failed to create state directory: {}",
                path.as_ref().display()
            )
        })?;

        let keyspace = fjall::Config::new(path.as_ref())
            .open()
            .with_context(|| format!("Failed to open state store: {}", path.as_ref().display()))?;
        let accrual = keyspace.open_partition("accrual", PartitionCreateOptions::default())?;
        let history = keyspace.open_partition("history", PartitionCreateOptions::default())?;

        Ok(Self {
            keyspace,
            accrual,
            history,
        })
    }

    fn persist(&self) -> Result<()> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

impl StateStore for FjallStore {
    fn load_accrual(&self) -> Result<Option<AccrualState>> {
        match self.accrual.get(ACCRUAL_KEY)? {
            Some(raw) => {
                let state =
                    serde_json::from_slice(&raw).context("Malformed accrual state record")?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    fn save_accrual(&self, state: &AccrualState) -> Result<()> {
        self.accrual.insert(ACCRUAL_KEY, serde_json::to_vec(state)?)?;
        debug!(value = state.value, date = %state.last_update, "Saved accrual state");
        self.persist()
    }

    fn load_history(&self) -> Result<Vec<HistoryEntry>> {
        let mut entries = Vec::new();
        for kv in self.history.iter() {
            let (key, raw) = kv?;
            let date: NaiveDate = std::str::from_utf8(&key)
                .context("Non-UTF8 history key")?
                .parse()
                .context("Malformed history date key")?;
            let value: f64 =
                serde_json::from_slice(&raw).context("Malformed history value record")?;
            entries.push(HistoryEntry { date, value });
        }
        Ok(entries)
    }

    fn save_history(&self, entries: &[HistoryEntry]) -> Result<()> {
        for entry in entries {
            self.history
                .insert(entry.date.to_string(), serde_json::to_vec(&entry.value)?)?;
        }
        debug!(entries = entries.len(), "Saved history log");
        self.persist()
    }
}
