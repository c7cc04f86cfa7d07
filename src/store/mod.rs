pub mod disk;
pub mod memory;

use crate::core::accrual::AccrualState;
use crate::core::history::HistoryEntry;
use anyhow::Result;

/// Narrow persistence port for the two records the engine keeps between
/// runs. Implementations own the format; the engine only sees the shapes.
pub trait StateStore {
    fn load_accrual(&self) -> Result<Option<AccrualState>>;
    fn save_accrual(&self, state: &AccrualState) -> Result<()>;
    fn load_history(&self) -> Result<Vec<HistoryEntry>>;
    fn save_history(&self, entries: &[HistoryEntry]) -> Result<()>;
}
