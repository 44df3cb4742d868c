//! Wager — a stake on a subset of pockets or a named outside category.

use super::pocket::DOUBLE_ZERO;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Amount type for all money arithmetic. Whole chips only — payout ratios
/// are exact integers, so resolution never rounds.
pub type Chips = i64;

/// The eleven supported bet shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WagerKind {
    Straight,
    Split,
    Street,
    Corner,
    /// The five-number 0/00/1/2/3 bet, unique to the American layout.
    Basket,
    Line,
    Column,
    Dozen,
    RedBlack,
    EvenOdd,
    HighLow,
}

impl WagerKind {
    /// Winnings per unit staked. Gross payout on a win is
    /// `stake + stake * ratio`.
    pub fn payout_ratio(self) -> Chips {
        match self {
            WagerKind::Straight => 35,
            WagerKind::Split => 17,
            WagerKind::Street => 11,
            WagerKind::Corner => 8,
            WagerKind::Basket => 6,
            WagerKind::Line => 5,
            WagerKind::Column | WagerKind::Dozen => 2,
            WagerKind::RedBlack | WagerKind::EvenOdd | WagerKind::HighLow => 1,
        }
    }

    /// Expected size of the covered-number set, where fixed.
    fn expected_coverage(self) -> Option<usize> {
        match self {
            WagerKind::Straight => Some(1),
            WagerKind::Split => Some(2),
            WagerKind::Street => Some(3),
            WagerKind::Corner => Some(4),
            WagerKind::Basket => Some(5),
            WagerKind::Line => Some(6),
            // Outside bets may carry an explicit set or rely on the label.
            _ => None,
        }
    }
}

/// Errors from wager construction and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WagerError {
    #[error("wager amount must be positive, got {0}")]
    NonPositiveAmount(Chips),
    #[error("covered number {0} is outside the wheel (0-36, 37 for 00)")]
    NumberOutOfRange(u8),
    #[error("{kind:?} covers {got} numbers, expected {expected}")]
    WrongCoverage {
        kind: WagerKind,
        got: usize,
        expected: usize,
    },
    #[error("{0:?} requires a label naming the pick")]
    MissingLabel(WagerKind),
    #[error("{kind:?} does not cover a valid layout block starting at {start}")]
    MisalignedBlock { kind: WagerKind, start: u8 },
}

/// A stake placed on a set of pockets.
///
/// `numbers` is canonical: sorted ascending, deduplicated, with 00 stored as
/// 37. A wager is immutable once placed — progressions scale copies via
/// [`Wager::scaled`], never the recorded snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wager {
    pub kind: WagerKind,
    /// Covered pocket values, canonical order.
    #[serde(default)]
    pub numbers: Vec<u8>,
    pub amount: Chips,
    /// Disambiguating pick for outside bets: "red"/"black", "even"/"odd",
    /// "high"/"low", or "1"/"2"/"3" for dozens and columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Wager {
    /// Build a wager with a canonicalized number set.
    pub fn new(kind: WagerKind, numbers: Vec<u8>, amount: Chips, label: Option<String>) -> Self {
        let mut wager = Wager {
            kind,
            numbers,
            amount,
            label,
        };
        wager.canonicalize();
        wager
    }

    /// Sort and deduplicate the covered-number set.
    ///
    /// Equality and stacking comparisons rely on this ordering, so it is
    /// re-applied after deserialization as well.
    pub fn canonicalize(&mut self) {
        self.numbers.sort_unstable();
        self.numbers.dedup();
    }

    /// Membership test against the normalized pocket value.
    pub fn covers(&self, value: u8) -> bool {
        self.numbers.contains(&value)
    }

    /// A copy with the amount multiplied. Flooring is a no-op here because
    /// the multiplier is integral; table-max scaling floors separately.
    pub fn scaled(&self, multiplier: Chips) -> Self {
        Wager {
            amount: self.amount * multiplier,
            ..self.clone()
        }
    }

    /// A copy with an explicit amount.
    pub fn with_amount(&self, amount: Chips) -> Self {
        Wager {
            amount,
            ..self.clone()
        }
    }

    /// Structural validation: positive amount, in-range numbers, coverage
    /// size per kind, labels where required.
    pub fn validate(&self) -> Result<(), WagerError> {
        if self.amount <= 0 {
            return Err(WagerError::NonPositiveAmount(self.amount));
        }
        if let Some(&n) = self.numbers.iter().find(|&&n| n > DOUBLE_ZERO) {
            return Err(WagerError::NumberOutOfRange(n));
        }
        if let Some(expected) = self.kind.expected_coverage() {
            if self.numbers.len() != expected {
                return Err(WagerError::WrongCoverage {
                    kind: self.kind,
                    got: self.numbers.len(),
                    expected,
                });
            }
        }
        match self.kind {
            WagerKind::RedBlack | WagerKind::EvenOdd | WagerKind::HighLow => {
                if self.label.is_none() {
                    return Err(WagerError::MissingLabel(self.kind));
                }
            }
            WagerKind::Column | WagerKind::Dozen => {
                if self.numbers.is_empty() && self.label.is_none() {
                    return Err(WagerError::MissingLabel(self.kind));
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ── Constructors for the standard shapes ─────────────────────────

    pub fn straight(number: u8, amount: Chips) -> Self {
        Wager::new(WagerKind::Straight, vec![number], amount, None)
    }

    pub fn split(a: u8, b: u8, amount: Chips) -> Self {
        Wager::new(WagerKind::Split, vec![a, b], amount, None)
    }

    /// Three-number row starting at `row_start` (1, 4, 7, … 34).
    pub fn street(row_start: u8, amount: Chips) -> Result<Self, WagerError> {
        if row_start == 0 || row_start > 34 || (row_start - 1) % 3 != 0 {
            return Err(WagerError::MisalignedBlock {
                kind: WagerKind::Street,
                start: row_start,
            });
        }
        Ok(Wager::new(
            WagerKind::Street,
            vec![row_start, row_start + 1, row_start + 2],
            amount,
            None,
        ))
    }

    /// Four-number block whose lowest number is `top_left` (not in the
    /// rightmost layout column, not past 34).
    pub fn corner(top_left: u8, amount: Chips) -> Result<Self, WagerError> {
        if top_left == 0 || top_left > 34 || top_left % 3 == 0 {
            return Err(WagerError::MisalignedBlock {
                kind: WagerKind::Corner,
                start: top_left,
            });
        }
        Ok(Wager::new(
            WagerKind::Corner,
            vec![top_left, top_left + 1, top_left + 3, top_left + 4],
            amount,
            None,
        ))
    }

    /// The 0/00/1/2/3 basket.
    pub fn basket(amount: Chips) -> Self {
        Wager::new(
            WagerKind::Basket,
            vec![0, DOUBLE_ZERO, 1, 2, 3],
            amount,
            None,
        )
    }

    /// Six-number double row starting at `row_start` (1, 4, 7, … 31).
    pub fn line(row_start: u8, amount: Chips) -> Result<Self, WagerError> {
        if row_start == 0 || row_start > 31 || (row_start - 1) % 3 != 0 {
            return Err(WagerError::MisalignedBlock {
                kind: WagerKind::Line,
                start: row_start,
            });
        }
        Ok(Wager::new(
            WagerKind::Line,
            (row_start..row_start + 6).collect(),
            amount,
            None,
        ))
    }

    /// Column 1–3, with the explicit twelve-number set populated.
    pub fn column(index: u8, amount: Chips) -> Self {
        let numbers = (1..=36u8).filter(|n| n % 3 == index % 3).collect();
        Wager::new(
            WagerKind::Column,
            numbers,
            amount,
            Some(index.to_string()),
        )
    }

    /// Dozen 1–3, with the explicit twelve-number set populated.
    pub fn dozen(index: u8, amount: Chips) -> Self {
        let start = (index - 1) * 12 + 1;
        Wager::new(
            WagerKind::Dozen,
            (start..start + 12).collect(),
            amount,
            Some(index.to_string()),
        )
    }

    pub fn red(amount: Chips) -> Self {
        Wager::new(WagerKind::RedBlack, Vec::new(), amount, Some("red".into()))
    }

    pub fn black(amount: Chips) -> Self {
        Wager::new(
            WagerKind::RedBlack,
            Vec::new(),
            amount,
            Some("black".into()),
        )
    }

    pub fn even(amount: Chips) -> Self {
        Wager::new(WagerKind::EvenOdd, Vec::new(), amount, Some("even".into()))
    }

    pub fn odd(amount: Chips) -> Self {
        Wager::new(WagerKind::EvenOdd, Vec::new(), amount, Some("odd".into()))
    }

    pub fn low(amount: Chips) -> Self {
        Wager::new(WagerKind::HighLow, Vec::new(), amount, Some("low".into()))
    }

    pub fn high(amount: Chips) -> Self {
        Wager::new(WagerKind::HighLow, Vec::new(), amount, Some("high".into()))
    }
}

/// Sum of amounts across a wager set.
pub fn total_amount(wagers: &[Wager]) -> Chips {
    wagers.iter().map(|w| w.amount).sum()
}
