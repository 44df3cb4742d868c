//! Pocket — one of the 38 divisions of an American wheel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of pockets on an American wheel: 0–36 plus 00.
pub const POCKET_COUNT: u8 = 38;

/// Sentinel value for the double-zero pocket.
///
/// Wager number sets store 00 as this value so that membership tests stay
/// plain integer comparisons.
pub const DOUBLE_ZERO: u8 = 37;

/// The red numbers of the standard layout. Everything else in 1–36 is black.
pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// One spin outcome: a pocket on the wheel.
///
/// Internally 0–36 map to themselves and 00 is stored as [`DOUBLE_ZERO`].
/// Constructed fresh per spin and immutable afterwards. Serialized as the
/// bare normalized value; deserialization rejects values off the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct Pocket(u8);

impl From<Pocket> for u8 {
    fn from(pocket: Pocket) -> u8 {
        pocket.0
    }
}

impl TryFrom<u8> for Pocket {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Pocket::new(value).ok_or_else(|| format!("pocket value {value} is outside the wheel"))
    }
}

/// Pocket color: 0 and 00 are green, 1–36 alternate per the fixed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PocketColor {
    Red,
    Black,
    Green,
}

impl Pocket {
    /// The double-zero pocket.
    pub const DOUBLE_ZERO: Pocket = Pocket(DOUBLE_ZERO);

    /// Build a pocket from its normalized value (0–36, or 37 for 00).
    ///
    /// Returns `None` for values outside the wheel.
    pub fn new(value: u8) -> Option<Self> {
        (value < POCKET_COUNT).then_some(Pocket(value))
    }

    /// Build a pocket from a plain number 0–36.
    pub fn number(n: u8) -> Option<Self> {
        (n <= 36).then_some(Pocket(n))
    }

    /// Normalized value: 0–36, or 37 for 00.
    pub fn value(self) -> u8 {
        self.0
    }

    /// True for 0 and 00.
    pub fn is_zero(self) -> bool {
        self.0 == 0 || self.0 == DOUBLE_ZERO
    }

    pub fn color(self) -> PocketColor {
        if self.is_zero() {
            PocketColor::Green
        } else if RED_NUMBERS.contains(&self.0) {
            PocketColor::Red
        } else {
            PocketColor::Black
        }
    }

    /// True for even numbers 2–36. Zeros are neither even nor odd.
    pub fn is_even(self) -> bool {
        !self.is_zero() && self.0 % 2 == 0
    }

    /// True for odd numbers 1–35.
    pub fn is_odd(self) -> bool {
        !self.is_zero() && self.0 % 2 == 1
    }

    /// True for 1–18.
    pub fn is_low(self) -> bool {
        (1..=18).contains(&self.0)
    }

    /// True for 19–36.
    pub fn is_high(self) -> bool {
        (19..=36).contains(&self.0)
    }

    /// Dozen index 1–3, or `None` for zeros.
    pub fn dozen(self) -> Option<u8> {
        if self.is_zero() {
            None
        } else {
            Some((self.0 - 1) / 12 + 1)
        }
    }

    /// Column index 1–3 by layout row, or `None` for zeros.
    ///
    /// Remainder 1 is the bottom row (1, 4, 7, …), remainder 2 the middle
    /// row (2, 5, 8, …), remainder 0 the top row (3, 6, 9, …).
    pub fn column(self) -> Option<u8> {
        if self.is_zero() {
            return None;
        }
        Some(match self.0 % 3 {
            1 => 1,
            2 => 2,
            _ => 3,
        })
    }
}

impl fmt::Display for Pocket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == DOUBLE_ZERO {
            write!(f, "00")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
