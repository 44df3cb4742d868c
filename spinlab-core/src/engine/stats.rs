//! Session statistics — pure incremental fold over the ledger.
//!
//! The accumulator supports prefix folds: pushing the first `k` records
//! yields exactly the statistics of a run halted after those records, which
//! is what interactive playback needs. Wait entries are invisible to the
//! fold — they change neither counts, streaks, nor bankroll extrema.

use crate::domain::{Chips, SpinRecord};
use serde::{Deserialize, Serialize};

/// Aggregate statistics for one run (or any ledger prefix).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub initial_bankroll: Chips,
    pub final_bankroll: Chips,
    /// Betting spins settled. Waits are excluded.
    pub spins: usize,
    /// Spins with net > 0.
    pub wins: usize,
    /// Spins with net < 0. Break-even spins count as neither.
    pub losses: usize,
    pub longest_win_streak: usize,
    pub longest_loss_streak: usize,
    /// Most negative (bankroll − initial) seen; 0 if never below water.
    pub max_drawdown: Chips,
    /// Most positive (bankroll − initial) seen; 0 if never above water.
    pub max_upside: Chips,
    /// (final − initial) / initial × 100; 0 when initial is 0.
    pub roi: f64,
}

impl SessionStats {
    /// Fold a full ledger (or any prefix of one).
    pub fn from_records(records: &[SpinRecord], initial_bankroll: Chips) -> Self {
        let mut acc = StatsAccumulator::new(initial_bankroll);
        for rec in records {
            acc.push(rec);
        }
        acc.finish()
    }
}

/// Incremental statistics accumulator.
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    initial: Chips,
    bankroll: Chips,
    spins: usize,
    wins: usize,
    losses: usize,
    win_streak: usize,
    loss_streak: usize,
    longest_win_streak: usize,
    longest_loss_streak: usize,
    max_drawdown: Chips,
    max_upside: Chips,
}

impl StatsAccumulator {
    pub fn new(initial_bankroll: Chips) -> Self {
        StatsAccumulator {
            initial: initial_bankroll,
            bankroll: initial_bankroll,
            spins: 0,
            wins: 0,
            losses: 0,
            win_streak: 0,
            loss_streak: 0,
            longest_win_streak: 0,
            longest_loss_streak: 0,
            max_drawdown: 0,
            max_upside: 0,
        }
    }

    /// Fold one ledger entry. Wait entries are skipped entirely.
    pub fn push(&mut self, rec: &SpinRecord) {
        if rec.is_wait() {
            return;
        }
        self.spins += 1;
        self.bankroll = rec.bankroll;

        let delta = self.bankroll - self.initial;
        self.max_drawdown = self.max_drawdown.min(delta);
        self.max_upside = self.max_upside.max(delta);

        if rec.net > 0 {
            self.wins += 1;
            self.win_streak += 1;
            self.loss_streak = 0;
            self.longest_win_streak = self.longest_win_streak.max(self.win_streak);
        } else if rec.net < 0 {
            self.losses += 1;
            self.loss_streak += 1;
            self.win_streak = 0;
            self.longest_loss_streak = self.longest_loss_streak.max(self.loss_streak);
        } else {
            // Break-even: neither a win nor a loss, and both streaks end.
            self.win_streak = 0;
            self.loss_streak = 0;
        }
    }

    pub fn finish(&self) -> SessionStats {
        let roi = if self.initial == 0 {
            0.0
        } else {
            (self.bankroll - self.initial) as f64 / self.initial as f64 * 100.0
        };
        SessionStats {
            initial_bankroll: self.initial,
            final_bankroll: self.bankroll,
            spins: self.spins,
            wins: self.wins,
            losses: self.losses,
            longest_win_streak: self.longest_win_streak,
            longest_loss_streak: self.longest_loss_streak,
            max_drawdown: self.max_drawdown,
            max_upside: self.max_upside,
            roi,
        }
    }
}
