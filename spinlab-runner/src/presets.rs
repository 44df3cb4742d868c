//! Built-in strategy presets.
//!
//! Each preset is a small, fully-validated tree built around a base unit
//! stake. They double as living documentation of the node kinds: flat
//! betting, doubling progressions, unit ladders, waits, and grinds.

use spinlab_core::domain::{Chips, Wager};
use spinlab_core::strategy::{
    MartingaleLimit, NodeKind, RepeatLimit, SpinPredicate, Strategy, StrategyNode,
};

/// Names accepted by [`build`], in display order.
pub const PRESET_NAMES: &[&str] = &[
    "flat_red",
    "martingale",
    "dalembert",
    "paroli",
    "wait_for_red",
    "grind",
    "james_bond",
];

/// Build a named preset around a base unit stake. Returns `None` for an
/// unknown name.
pub fn build(name: &str, unit: Chips) -> Option<Strategy> {
    let strategy = match name {
        "flat_red" => flat_red(unit),
        "martingale" => martingale(unit),
        "dalembert" => dalembert(unit),
        "paroli" => paroli(unit),
        "wait_for_red" => wait_for_red(unit),
        "grind" => grind(unit),
        "james_bond" => james_bond(unit),
        _ => return None,
    };
    Some(strategy)
}

/// One-line description for CLI listings.
pub fn describe(name: &str) -> &'static str {
    match name {
        "flat_red" => "flat unit on red, forever",
        "martingale" => "double on loss until the first win or the bankroll is gone",
        "dalembert" => "unit up on loss, unit down on win, capped three deep",
        "paroli" => "let winnings ride through two doubles, then bank",
        "wait_for_red" => "sit out until red shows, then bet black",
        "grind" => "repeat a unit on red until five units ahead",
        "james_bond" => "high 14, line 13-18 for 5, basket for 1 — every spin",
        _ => "",
    }
}

/// Flat unit on red, self-looping at the root.
fn flat_red(unit: Chips) -> Strategy {
    let mut s = Strategy::new(0, 0);
    let root = s.add(
        StrategyNode::new(NodeKind::StartImmediately).with_wagers(vec![Wager::red(unit)]),
    );
    s.nodes[root.0].on_win = Some(root);
    s.nodes[root.0].on_loss = Some(root);
    s
}

/// Classic open-ended martingale. The loss side is implicitly terminal.
fn martingale(unit: Chips) -> Strategy {
    let mut s = Strategy::new(0, 0);
    let root = s.add(
        StrategyNode::new(NodeKind::Martingale {
            limit: MartingaleLimit::UntilBankrupt,
        })
        .with_wagers(vec![Wager::red(unit)]),
    );
    s.nodes[root.0].on_win = Some(root);
    s
}

/// D'Alembert ladder, capped three steps deep. Each rung adds a unit on a
/// loss and hands wins to a subtract-unit node that falls back to the root.
fn dalembert(unit: Chips) -> Strategy {
    let mut s = Strategy::new(0, 0);
    let root = s.add(
        StrategyNode::new(NodeKind::StartImmediately).with_wagers(vec![Wager::red(unit)]),
    );
    let a1 = s.add(StrategyNode::new(NodeKind::AddUnit));
    let a2 = s.add(StrategyNode::new(NodeKind::AddUnit));
    let a3 = s.add(StrategyNode::new(NodeKind::AddUnit));
    let s1 = s.add(StrategyNode::new(NodeKind::SubtractUnit).then(root));
    let s2 = s.add(StrategyNode::new(NodeKind::SubtractUnit).then(root));
    let s3 = s.add(StrategyNode::new(NodeKind::SubtractUnit).then(root));

    s.nodes[root.0].on_win = Some(root);
    s.nodes[root.0].on_loss = Some(a1);
    s.nodes[a1.0].on_win = Some(s1);
    s.nodes[a1.0].on_loss = Some(a2);
    s.nodes[a2.0].on_win = Some(s2);
    s.nodes[a2.0].on_loss = Some(a3);
    s.nodes[a3.0].on_win = Some(s3);
    s.nodes[a3.0].on_loss = Some(root);
    s
}

/// Positive progression: ride two consecutive wins at double stakes, then
/// bank by returning to the root.
fn paroli(unit: Chips) -> Strategy {
    let mut s = Strategy::new(0, 0);
    let root = s.add(
        StrategyNode::new(NodeKind::StartImmediately).with_wagers(vec![Wager::black(unit)]),
    );
    let d1 = s.add(StrategyNode::new(NodeKind::Double));
    let d2 = s.add(StrategyNode::new(NodeKind::Double));

    s.nodes[root.0].on_win = Some(d1);
    s.nodes[root.0].on_loss = Some(root);
    s.nodes[d1.0].on_win = Some(d2);
    s.nodes[d1.0].on_loss = Some(root);
    s.nodes[d2.0].on_win = Some(root);
    s.nodes[d2.0].on_loss = Some(root);
    s
}

/// Sit out until red appears, then bet black; double once after a loss.
fn wait_for_red(unit: Chips) -> Strategy {
    let mut s = Strategy::new(0, 0);
    let root = s.add(
        StrategyNode::new(NodeKind::WaitCondition {
            until: SpinPredicate::Red,
        })
        .with_wagers(vec![Wager::black(unit)]),
    );
    let double = s.add(StrategyNode::new(NodeKind::Double).then(root));

    s.nodes[root.0].on_win = Some(root);
    s.nodes[root.0].on_loss = Some(double);
    s
}

/// Repeat a flat unit on red until five units ahead (or a loss streak
/// forces the sequence's other exits).
fn grind(unit: Chips) -> Strategy {
    let mut s = Strategy::new(0, 0);
    let root = s.add(
        StrategyNode::new(NodeKind::RepeatUntil {
            until: RepeatLimit::ProfitTarget { target: 5 * unit },
        })
        .with_wagers(vec![Wager::red(unit)]),
    );
    s.nodes[root.0].on_win = Some(root);
    s.nodes[root.0].on_loss = Some(root);
    s
}

/// The three-way coverage bet: 14 units on high, 5 on the 13–18 line, 1 on
/// the basket. Only the second dozen's misses hurt.
fn james_bond(unit: Chips) -> Strategy {
    let mut s = Strategy::new(0, 0);
    let line = Wager::line(13, 5 * unit).expect("13 starts a double row");
    let root = s.add(StrategyNode::new(NodeKind::StartImmediately).with_wagers(vec![
        Wager::high(14 * unit),
        line,
        Wager::basket(unit),
    ]));
    s.nodes[root.0].on_win = Some(root);
    s.nodes[root.0].on_loss = Some(root);
    s
}
