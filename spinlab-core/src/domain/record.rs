//! SpinRecord — the immutable, append-only ledger entry for one spin.

use super::pocket::Pocket;
use super::wager::{Chips, Wager};
use serde::{Deserialize, Serialize};

/// One wager as placed on a specific spin, with its resolution.
///
/// The embedded wager is a snapshot of the scaled amounts actually staked;
/// later progression steps never touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedWager {
    pub wager: Wager,
    pub won: bool,
    /// Gross payout: stake + winnings on a win, 0 on a loss.
    pub payout: Chips,
    /// Net change from this wager alone.
    pub net: Chips,
}

/// Ledger entry for one spin. Created once, never mutated.
///
/// Wait spins carry an empty wager list; they still consume a spin and
/// produce exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinRecord {
    /// Zero-based spin index within the run.
    pub spin: usize,
    pub pocket: Pocket,
    pub wagers: Vec<PlacedWager>,
    pub bet_total: Chips,
    pub payout_total: Chips,
    /// `payout_total - bet_total`.
    pub net: Chips,
    /// Bankroll after this spin settled.
    pub bankroll: Chips,
    /// Human-readable tag describing what the strategy was doing.
    pub action: String,
}

impl SpinRecord {
    /// True for spins consumed without placing any wager.
    pub fn is_wait(&self) -> bool {
        self.wagers.is_empty()
    }

    /// A spin counts as a win iff it gained money.
    pub fn is_win(&self) -> bool {
        self.net > 0
    }

    pub fn is_loss(&self) -> bool {
        self.net < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_records_are_neither_win_nor_loss() {
        let rec = SpinRecord {
            spin: 0,
            pocket: Pocket::number(4).unwrap(),
            wagers: Vec::new(),
            bet_total: 0,
            payout_total: 0,
            net: 0,
            bankroll: 500,
            action: "wait 1/3".into(),
        };
        assert!(rec.is_wait());
        assert!(!rec.is_win());
        assert!(!rec.is_loss());
    }

    #[test]
    fn serde_roundtrip() {
        let rec = SpinRecord {
            spin: 7,
            pocket: Pocket::DOUBLE_ZERO,
            wagers: vec![PlacedWager {
                wager: Wager::red(10),
                won: false,
                payout: 0,
                net: -10,
            }],
            bet_total: 10,
            payout_total: 0,
            net: -10,
            bankroll: 490,
            action: "bet x1".into(),
        };
        let json = serde_json::to_string(&rec).unwrap();
        let back: SpinRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }
}
