use super::StateStore;
use crate::core::accrual::AccrualState;
use crate::core::history::HistoryEntry;
use anyhow::Result;
use std::sync::RwLock;

/// In-memory state store. Keeps engine tests independent of the disk
/// format and of any real data directory.
#[derive(Default)]
pub struct MemoryStore {
    accrual: RwLock<Option<AccrualState>>,
    history: RwLock<Vec<HistoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load_accrual(&self) -> Result<Option<AccrualState>> {
        Ok(self.accrual.read().unwrap().clone())
    }

    fn save_accrual(&self, state: &AccrualState) -> Result<()> {
        *self.accrual.write().unwrap() = Some(state.clone());
        Ok(())
    }

    fn load_history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.history.read().unwrap().clone())
    }

    fn save_history(&self, entries: &[HistoryEntry]) -> Result<()> {
        *self.history.write().unwrap() = entries.to_vec();
        Ok(())
    }
}
