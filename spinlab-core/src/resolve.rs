//! Bet resolver — scores one wager against one spin outcome.
//!
//! Resolution is a pure function of the (wager, pocket) pair. All payout
//! arithmetic is exact `i64`: gross payout on a win is the stake returned
//! plus `stake * ratio` winnings; a losing wager pays zero.

use crate::domain::{Chips, Pocket, PocketColor, Wager, WagerKind};
use serde::{Deserialize, Serialize};

/// Outcome of resolving a single wager against a single spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub won: bool,
    /// Gross payout: stake + winnings on a win, 0 on a loss.
    pub payout: Chips,
}

impl Resolution {
    /// Net change to the bankroll for this wager.
    pub fn net(&self, stake: Chips) -> Chips {
        self.payout - stake
    }
}

/// Resolve a wager against a spin outcome.
pub fn resolve(wager: &Wager, pocket: Pocket) -> Resolution {
    let won = wins(wager, pocket);
    let payout = if won {
        wager.amount + wager.amount * wager.kind.payout_ratio()
    } else {
        0
    };
    Resolution { won, payout }
}

fn wins(wager: &Wager, pocket: Pocket) -> bool {
    match wager.kind {
        // The basket wins on its five pockets and nothing else; the zeros
        // are winning outcomes here, unlike every outside bet.
        WagerKind::Basket => wager.covers(pocket.value()),

        // Even-money bets lose unconditionally on 0 and 00 — the house-edge
        // rule that distinguishes the American game.
        WagerKind::RedBlack => {
            !pocket.is_zero()
                && match label(wager) {
                    Some("red") => pocket.color() == PocketColor::Red,
                    Some("black") => pocket.color() == PocketColor::Black,
                    _ => false,
                }
        }
        WagerKind::EvenOdd => {
            !pocket.is_zero()
                && match label(wager) {
                    Some("even") => pocket.is_even(),
                    Some("odd") => pocket.is_odd(),
                    _ => false,
                }
        }
        WagerKind::HighLow => {
            !pocket.is_zero()
                && match label(wager) {
                    Some("high") => pocket.is_high(),
                    Some("low") => pocket.is_low(),
                    _ => false,
                }
        }

        // Two-to-one bets also lose on zeros. Membership against the
        // explicit set when populated; otherwise the label names the
        // column/dozen and the layout arithmetic decides.
        WagerKind::Column => {
            !pocket.is_zero()
                && if wager.numbers.is_empty() {
                    labeled_index(wager) == pocket.column()
                } else {
                    wager.covers(pocket.value())
                }
        }
        WagerKind::Dozen => {
            !pocket.is_zero()
                && if wager.numbers.is_empty() {
                    labeled_index(wager) == pocket.dozen()
                } else {
                    wager.covers(pocket.value())
                }
        }

        // Inside bets: plain membership. 0 and 00 are ordinary coverable
        // numbers here, not special cases.
        WagerKind::Straight
        | WagerKind::Split
        | WagerKind::Street
        | WagerKind::Corner
        | WagerKind::Line => wager.covers(pocket.value()),
    }
}

fn label(wager: &Wager) -> Option<&str> {
    wager.label.as_deref()
}

fn labeled_index(wager: &Wager) -> Option<u8> {
    wager.label.as_deref()?.trim().parse().ok()
}
