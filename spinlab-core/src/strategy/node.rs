//! Strategy nodes — the units of the betting decision tree.

use crate::domain::{Chips, Pocket, PocketColor, Wager};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node within [`super::Strategy::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Progression applied to the multiplier after a wait completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostWaitAction {
    Double,
    Triple,
    AddUnit,
    SubtractUnit,
    Reset,
}

/// Exit rule for a martingale sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MartingaleLimit {
    /// Double until the first win or the bankroll is gone.
    UntilBankrupt,
    /// Double on losses until cumulative sequence profit reaches the target.
    ProfitTarget { target: Chips },
    /// Exactly this many spins, win or lose.
    SpinCount { spins: u32 },
}

/// Exit rule for a repeat-until sequence. The first condition reached ends
/// the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepeatLimit {
    SpinCount { spins: u32 },
    WinCount { wins: u32 },
    ProfitTarget { target: Chips },
    LossLimit { limit: Chips },
}

/// Named outcome predicate for wait-until-condition nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpinPredicate {
    Red,
    Black,
    Even,
    Odd,
    Low,
    High,
    /// 0 or 00.
    Zero,
    Number { value: u8 },
}

impl SpinPredicate {
    pub fn matches(self, pocket: Pocket) -> bool {
        match self {
            SpinPredicate::Red => pocket.color() == PocketColor::Red,
            SpinPredicate::Black => pocket.color() == PocketColor::Black,
            SpinPredicate::Even => pocket.is_even(),
            SpinPredicate::Odd => pocket.is_odd(),
            SpinPredicate::Low => pocket.is_low(),
            SpinPredicate::High => pocket.is_high(),
            SpinPredicate::Zero => pocket.is_zero(),
            SpinPredicate::Number { value } => pocket.value() == value,
        }
    }
}

impl fmt::Display for SpinPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpinPredicate::Red => write!(f, "red"),
            SpinPredicate::Black => write!(f, "black"),
            SpinPredicate::Even => write!(f, "even"),
            SpinPredicate::Odd => write!(f, "odd"),
            SpinPredicate::Low => write!(f, "low"),
            SpinPredicate::High => write!(f, "high"),
            SpinPredicate::Zero => write!(f, "zero"),
            SpinPredicate::Number { value } => {
                if *value == crate::domain::DOUBLE_ZERO {
                    write!(f, "00")
                } else {
                    write!(f, "{value}")
                }
            }
        }
    }
}

/// What a node does when the traversal cursor reaches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// Bet the active wagers right away. The usual root.
    StartImmediately,
    /// Bet an explicit wager list (replacing the active base).
    CustomBet,
    /// Repeat the inherited wagers unchanged.
    SameBet,
    /// Double the inherited multiplier, then bet once.
    Double,
    /// Triple the inherited multiplier, then bet once.
    Triple,
    /// Add one unit to the inherited multiplier, then bet once.
    AddUnit,
    /// Subtract one unit (floored at 1), then bet once.
    SubtractUnit,
    /// Jump back to the root with base wagers and multiplier reloaded.
    /// Consumes no spin.
    Reset,
    /// Sit out `spins` spins, optionally adjust the multiplier, then bet.
    WaitSpins {
        spins: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        then: Option<PostWaitAction>,
    },
    /// Sit out spins until the predicate matches, then bet.
    WaitCondition { until: SpinPredicate },
    /// Bounded doubling sequence.
    Martingale { limit: MartingaleLimit },
    /// Repeat the active wagers until an exit condition fires.
    RepeatUntil { until: RepeatLimit },
}

impl NodeKind {
    /// Short tag used in ledger action strings.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::StartImmediately => "start",
            NodeKind::CustomBet => "custom",
            NodeKind::SameBet => "same",
            NodeKind::Double => "double",
            NodeKind::Triple => "triple",
            NodeKind::AddUnit => "add-unit",
            NodeKind::SubtractUnit => "subtract-unit",
            NodeKind::Reset => "reset",
            NodeKind::WaitSpins { .. } => "wait",
            NodeKind::WaitCondition { .. } => "wait-for",
            NodeKind::Martingale { .. } => "martingale",
            NodeKind::RepeatUntil { .. } => "repeat",
        }
    }
}

/// One node of the strategy tree.
///
/// Nodes are immutable descriptors: the simulation carries its own cursor
/// and scaling state, so one tree can drive any number of concurrent runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyNode {
    pub kind: NodeKind,
    /// Explicit wager list. Non-empty means this node replaces the active
    /// base when entered.
    #[serde(default)]
    pub wagers: Vec<Wager>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_win: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_loss: Option<NodeId>,
}

impl StrategyNode {
    pub fn new(kind: NodeKind) -> Self {
        StrategyNode {
            kind,
            wagers: Vec::new(),
            on_win: None,
            on_loss: None,
        }
    }

    pub fn with_wagers(mut self, wagers: Vec<Wager>) -> Self {
        self.wagers = wagers;
        self
    }

    pub fn on_win(mut self, id: NodeId) -> Self {
        self.on_win = Some(id);
        self
    }

    pub fn on_loss(mut self, id: NodeId) -> Self {
        self.on_loss = Some(id);
        self
    }

    /// Both branches to the same child.
    pub fn then(mut self, id: NodeId) -> Self {
        self.on_win = Some(id);
        self.on_loss = Some(id);
        self
    }
}
