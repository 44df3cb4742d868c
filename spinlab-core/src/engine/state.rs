//! Engine configuration and run result types.

use super::stats::SessionStats;
use crate::domain::{Chips, SpinRecord};
use serde::{Deserialize, Serialize};

/// House rules for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Hard ceiling on spins consumed per run, waits included.
    pub max_spins: u32,
    /// Informational only: accepted as configuration but not enforced as a
    /// floor by the engine.
    pub table_min: Chips,
    /// Maximum total stake per spin. Values ≤ 0 disable the cap.
    pub table_max: Chips,
}

impl TableConfig {
    pub fn new(max_spins: u32, table_min: Chips, table_max: Chips) -> Self {
        TableConfig {
            max_spins,
            table_min,
            table_max,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            max_spins: 1_000,
            table_min: 1,
            table_max: 5_000,
        }
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HaltReason {
    /// Spin budget exhausted.
    SpinBudget,
    /// Bankroll fell to the configured stop-loss.
    StopLoss,
    /// Bankroll reached the configured take-profit.
    TakeProfit,
    /// Bankroll reached zero.
    Bankrupt,
    /// The next wager set could not be covered even after scaling; the
    /// partial ledger is still a valid result.
    InsufficientBankroll,
}

/// Result of a complete run: the full ordered ledger plus aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub records: Vec<SpinRecord>,
    pub stats: SessionStats,
    pub halt: HaltReason,
    /// Times an inner-loop safety ceiling fired. Nonzero means the run
    /// degraded (a sequence was cut short) but stayed valid.
    pub guard_trips: u32,
}

impl RunResult {
    /// Statistics over the first `k` ledger entries, for playback.
    pub fn stats_at(&self, k: usize) -> SessionStats {
        let k = k.min(self.records.len());
        SessionStats::from_records(&self.records[..k], self.stats.initial_bankroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_config_defaults() {
        let table = TableConfig::default();
        assert_eq!(table.max_spins, 1_000);
        assert_eq!(table.table_max, 5_000);
    }

    #[test]
    fn halt_reason_serde_tags() {
        let json = serde_json::to_string(&HaltReason::InsufficientBankroll).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_BANKROLL\"");
    }
}
