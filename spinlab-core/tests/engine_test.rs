//! End-to-end engine tests: progression sub-loops, waits, halts, and
//! ledger/statistics agreement.

use spinlab_core::domain::{Chips, Wager};
use spinlab_core::engine::{run_simulation, HaltReason, TableConfig};
use spinlab_core::strategy::{
    MartingaleLimit, NodeKind, RepeatLimit, SpinPredicate, Strategy, StrategyNode,
};
use spinlab_core::wheel::{ScriptedWheel, Wheel};

/// Root-only tree: bet red, loop forever.
fn red_self_loop(amount: Chips) -> Strategy {
    let mut s = Strategy::new(0, 0);
    let root = s.add(
        StrategyNode::new(NodeKind::StartImmediately).with_wagers(vec![Wager::red(amount)]),
    );
    s.nodes[root.0].on_win = Some(root);
    s.nodes[root.0].on_loss = Some(root);
    s
}

/// Root-only martingale tree with the given limit.
fn martingale_loop(amount: Chips, limit: MartingaleLimit) -> Strategy {
    let mut s = Strategy::new(0, 0);
    let root = s.add(
        StrategyNode::new(NodeKind::Martingale { limit }).with_wagers(vec![Wager::red(amount)]),
    );
    s.nodes[root.0].on_win = Some(root);
    s.nodes[root.0].on_loss = Some(root);
    s
}

fn bets(records: &[spinlab_core::domain::SpinRecord]) -> Vec<Chips> {
    records.iter().map(|r| r.bet_total).collect()
}

// ── Martingale ───────────────────────────────────────────────────────

#[test]
fn martingale_spin_count_bounds_the_sequence() {
    let strategy = martingale_loop(10, MartingaleLimit::SpinCount { spins: 3 });
    let table = TableConfig::new(6, 1, 100_000);
    // Six straight losses (2 is black).
    let mut wheel = ScriptedWheel::new(&[2, 2, 2, 2, 2, 2]);
    let result = run_simulation(&strategy, &table, 10_000, &mut wheel);

    // Two visits of exactly three spins each; the multiplier strictly
    // doubles after each loss within a visit and the loss branch back to
    // the root reloads a fresh sequence.
    assert_eq!(bets(&result.records), vec![10, 20, 40, 10, 20, 40]);
    assert_eq!(result.halt, HaltReason::SpinBudget);
}

#[test]
fn martingale_until_bankrupt_stops_on_first_win() {
    let strategy = martingale_loop(10, MartingaleLimit::UntilBankrupt);
    let table = TableConfig::new(3, 1, 100_000);
    // Loss, loss, win.
    let mut wheel = ScriptedWheel::new(&[2, 2, 1]);
    let result = run_simulation(&strategy, &table, 500, &mut wheel);

    assert_eq!(bets(&result.records), vec![10, 20, 40]);
    // -10 -20 +40 = +10: the sequence ends above its start.
    assert_eq!(result.stats.final_bankroll, 510);
}

#[test]
fn martingale_profit_target_resets_multiplier_on_win() {
    let strategy = martingale_loop(10, MartingaleLimit::ProfitTarget { target: 25 });
    let table = TableConfig::new(6, 1, 100_000);
    // Alternate loss/win: each pair nets +10, so the target of 25 is
    // reached after the third winning pair.
    let mut wheel = ScriptedWheel::new(&[2, 1, 2, 1, 2, 1]);
    let result = run_simulation(&strategy, &table, 1_000, &mut wheel);

    // Doubling after each loss, snapping back to 1 after each win.
    assert_eq!(bets(&result.records), vec![10, 20, 10, 20, 10, 20]);
    assert_eq!(result.stats.final_bankroll, 1_030);
}

#[test]
fn martingale_abandons_sequence_past_table_max() {
    let strategy = martingale_loop(10, MartingaleLimit::UntilBankrupt);
    let table = TableConfig::new(10, 1, 100);
    let mut wheel = ScriptedWheel::new(&[2, 2, 2, 2, 2, 2, 2, 2, 2, 2]);
    let result = run_simulation(&strategy, &table, 10_000, &mut wheel);

    // 10, 20, 40, 80 — the next double (160) would exceed the table max,
    // so the sequence is abandoned and the cursor loops back to the root.
    assert_eq!(
        bets(&result.records),
        vec![10, 20, 40, 80, 10, 20, 40, 80, 10, 20]
    );
}

#[test]
fn martingale_multiplier_ceiling_trips_the_guard() {
    let strategy = martingale_loop(10, MartingaleLimit::UntilBankrupt);
    // No table max: only the multiplier ceiling can stop the doubling.
    let table = TableConfig::new(20, 1, 0);
    let mut wheel = ScriptedWheel::new(&[2]);
    let result = run_simulation(&strategy, &table, 1_000_000, &mut wheel);

    // Multiplier path 1, 2, 4, … 8192 (14 spins); 16384 crosses the
    // ceiling and force-exits the sequence.
    assert_eq!(result.records[13].bet_total, 10 * 8192);
    assert!(result.guard_trips >= 1);
    assert_eq!(result.halt, HaltReason::SpinBudget);
}

// ── Repeat-until ─────────────────────────────────────────────────────

fn repeat_loop(until: RepeatLimit) -> Strategy {
    let mut s = Strategy::new(0, 0);
    let root = s.add(
        StrategyNode::new(NodeKind::RepeatUntil { until }).with_wagers(vec![Wager::red(10)]),
    );
    s.nodes[root.0].on_win = Some(root);
    s.nodes[root.0].on_loss = Some(root);
    s
}

#[test]
fn repeat_until_win_count() {
    let strategy = repeat_loop(RepeatLimit::WinCount { wins: 2 });
    let table = TableConfig::new(4, 1, 5_000);
    let mut wheel = ScriptedWheel::new(&[2, 1, 2, 1]);
    let result = run_simulation(&strategy, &table, 500, &mut wheel);
    // The second win lands on the fourth spin, exactly at the budget.
    assert_eq!(result.records.len(), 4);
    assert_eq!(result.stats.wins, 2);
}

#[test]
fn repeat_until_loss_limit() {
    let strategy = repeat_loop(RepeatLimit::LossLimit { limit: 30 });
    let table = TableConfig::new(100, 1, 5_000);
    let mut wheel = ScriptedWheel::new(&[2, 2, 2, 1, 1, 1, 1, 1, 1, 1]);
    let result = run_simulation(&strategy, &table, 500, &mut wheel);
    // Three losses reach the limit; the sequence exits via the win branch
    // back to the root, which starts a fresh sequence.
    assert_eq!(result.records[2].bankroll, 470);
    assert!(result.records.len() > 3);
}

#[test]
fn repeat_until_profit_target() {
    let strategy = repeat_loop(RepeatLimit::ProfitTarget { target: 20 });
    let table = TableConfig::new(2, 1, 5_000);
    let mut wheel = ScriptedWheel::new(&[1, 1]);
    let result = run_simulation(&strategy, &table, 500, &mut wheel);
    assert_eq!(result.records.len(), 2);
    assert_eq!(result.stats.final_bankroll, 520);
}

// ── Waits ────────────────────────────────────────────────────────────

#[test]
fn wait_spins_records_empty_wagers_then_bets() {
    let mut s = Strategy::new(0, 0);
    let root = s.add(
        StrategyNode::new(NodeKind::WaitSpins {
            spins: 3,
            then: Some(spinlab_core::strategy::PostWaitAction::Double),
        })
        .with_wagers(vec![Wager::red(10)]),
    );
    s.nodes[root.0].on_win = Some(root);
    s.nodes[root.0].on_loss = Some(root);

    let table = TableConfig::new(4, 1, 5_000);
    let mut wheel = ScriptedWheel::new(&[5, 9, 14, 1]);
    let result = run_simulation(&s, &table, 500, &mut wheel);

    assert_eq!(result.records.len(), 4);
    assert!(result.records[..3].iter().all(|r| r.is_wait()));
    // Post-wait double: the real spin bets 20, not 10.
    assert_eq!(result.records[3].bet_total, 20);
    // Waits are exempt from win/loss statistics.
    assert_eq!(result.stats.spins, 1);
    assert_eq!(result.stats.wins, 1);
}

#[test]
fn wait_condition_consumes_spins_until_match() {
    let mut s = Strategy::new(0, 0);
    let root = s.add(
        StrategyNode::new(NodeKind::WaitCondition {
            until: SpinPredicate::Red,
        })
        .with_wagers(vec![Wager::red(10)]),
    );
    s.nodes[root.0].on_win = Some(root);
    s.nodes[root.0].on_loss = Some(root);

    let table = TableConfig::new(10, 1, 5_000);
    // Black, zero, black, then red 1 satisfies the predicate; the next
    // spin (19, red) is the betting spin.
    let mut wheel = ScriptedWheel::new(&[2, 0, 13, 1, 19]);
    let result = run_simulation(&s, &table, 500, &mut wheel);

    assert!(result.records[..4].iter().all(|r| r.is_wait()));
    assert!(!result.records[4].is_wait());
    assert_eq!(result.records[4].net, 10);
    assert!(result
        .records[0]
        .action
        .contains("red"));
}

// ── Ledger and statistics agreement ──────────────────────────────────

#[test]
fn bankroll_identity_over_a_long_seeded_run() {
    let strategy = red_self_loop(10);
    let table = TableConfig::new(500, 1, 5_000);
    let mut wheel = Wheel::seeded(1234);
    let result = run_simulation(&strategy, &table, 1_000, &mut wheel);

    let mut prev = 1_000;
    for rec in &result.records {
        assert_eq!(rec.bankroll, prev + rec.net);
        prev = rec.bankroll;
    }
    assert_eq!(result.stats.final_bankroll, prev);
    assert_eq!(result.stats.wins + result.stats.losses, result.stats.spins);
}

#[test]
fn prefix_stats_match_a_run_halted_early() {
    let strategy = red_self_loop(10);
    let full_table = TableConfig::new(200, 1, 5_000);
    let mut wheel = Wheel::seeded(99);
    let full = run_simulation(&strategy, &full_table, 1_000, &mut wheel);

    for k in [0usize, 1, 17, 100, 200] {
        let short_table = TableConfig::new(k as u32, 1, 5_000);
        let mut wheel = Wheel::seeded(99);
        let halted = run_simulation(&strategy, &short_table, 1_000, &mut wheel);
        assert_eq!(full.stats_at(k), halted.stats, "prefix length {k}");
    }
}

#[test]
fn identical_seeds_reproduce_identical_ledgers() {
    let strategy = red_self_loop(25);
    let table = TableConfig::new(300, 1, 5_000);
    let a = run_simulation(&strategy, &table, 2_000, &mut Wheel::seeded(7));
    let b = run_simulation(&strategy, &table, 2_000, &mut Wheel::seeded(7));
    assert_eq!(a, b);
}

#[test]
fn every_consumed_spin_produces_exactly_one_record() {
    let mut s = Strategy::new(0, 0);
    let root = s.add(
        StrategyNode::new(NodeKind::WaitSpins {
            spins: 2,
            then: None,
        })
        .with_wagers(vec![Wager::red(10)]),
    );
    s.nodes[root.0].on_win = Some(root);
    s.nodes[root.0].on_loss = Some(root);

    let table = TableConfig::new(30, 1, 5_000);
    let mut wheel = Wheel::seeded(5);
    let result = run_simulation(&s, &table, 500, &mut wheel);
    assert_eq!(result.records.len(), 30);
    for (i, rec) in result.records.iter().enumerate() {
        assert_eq!(rec.spin, i);
    }
}

#[test]
fn validated_strategies_run_clean() {
    let strategy = red_self_loop(10);
    strategy.validate().expect("self-loop root is legal");
    let table = TableConfig::new(50, 1, 5_000);
    let result = run_simulation(&strategy, &table, 500, &mut Wheel::seeded(3));
    assert_eq!(result.guard_trips, 0);
}
