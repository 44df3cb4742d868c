//! Domain types for SpinLab.

pub mod pocket;
pub mod record;
pub mod wager;

pub use pocket::{Pocket, PocketColor, DOUBLE_ZERO, POCKET_COUNT, RED_NUMBERS};
pub use record::{PlacedWager, SpinRecord};
pub use wager::{total_amount, Chips, Wager, WagerError, WagerKind};
