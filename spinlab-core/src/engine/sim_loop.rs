//! Spin-by-spin simulation loop — the heart of the engine.
//!
//! The loop owns a cursor into the strategy tree, the active base wager
//! set, and an integer multiplier. Nodes are immutable descriptors; all
//! mutable state lives here, so one tree can drive any number of
//! concurrent runs.
//!
//! Per visit, dispatch is by node kind:
//! - single-spin kinds: one spin at base × multiplier, then branch
//! - martingale / repeat-until: bounded inner loops
//! - waits: no-wager spins, then one real betting spin
//! - reset: jump to the root without consuming a spin

use super::state::{HaltReason, RunResult, TableConfig};
use super::stats::SessionStats;
use crate::domain::{total_amount, Chips, PlacedWager, SpinRecord, Wager};
use crate::resolve::resolve;
use crate::strategy::{
    MartingaleLimit, NodeId, NodeKind, PostWaitAction, RepeatLimit, SpinPredicate, Strategy,
};
use crate::wheel::Spin;

/// Practical upper bound on the progression multiplier. Crossing it exits
/// the sequence as if its natural condition had fired.
pub const MULTIPLIER_CEILING: Chips = 10_000;

/// Per-visit ceiling on inner-loop spins (martingale, repeat-until).
pub const MAX_SEQUENCE_SPINS: u32 = 10_000;

/// Ceiling on spins consumed hunting a wait-condition predicate.
pub const MAX_CONDITION_WAIT: u32 = 10_000;

/// Run one full simulation to termination.
///
/// The strategy is read-only; callers that want authoring-time diagnostics
/// should run [`Strategy::validate`] first. The engine itself never errors
/// on structure: an absent child resets the cursor to the root.
pub fn run_simulation(
    strategy: &Strategy,
    table: &TableConfig,
    initial_bankroll: Chips,
    wheel: &mut impl Spin,
) -> RunResult {
    let base = strategy
        .root_node()
        .map(|n| n.wagers.clone())
        .unwrap_or_default();

    let mut sim = Sim {
        strategy,
        table,
        wheel,
        cursor: strategy.root,
        base,
        multiplier: 1,
        bankroll: initial_bankroll,
        spin_index: 0,
        records: Vec::new(),
        guard_trips: 0,
    };

    let halt = sim.run();
    let stats = SessionStats::from_records(&sim.records, initial_bankroll);
    RunResult {
        records: sim.records,
        stats,
        halt,
        guard_trips: sim.guard_trips,
    }
}

struct Sim<'a, S: Spin> {
    strategy: &'a Strategy,
    table: &'a TableConfig,
    wheel: &'a mut S,
    cursor: NodeId,
    /// The wager template currently in force, unscaled.
    base: Vec<Wager>,
    multiplier: Chips,
    bankroll: Chips,
    spin_index: usize,
    records: Vec<SpinRecord>,
    guard_trips: u32,
}

impl<S: Spin> Sim<'_, S> {
    fn run(&mut self) -> HaltReason {
        // Steps that consume no spin (resets, abandoned sequences) are
        // legal, but a full traversal cycle that never places a wager can
        // make no progress at all. Cap consecutive idle steps at one lap
        // around the arena.
        let idle_limit = self.strategy.nodes.len().saturating_mul(2) + 2;
        let mut idle_steps = 0usize;
        loop {
            if let Some(halt) = self.halt_check() {
                return halt;
            }
            let before = self.spin_index;
            if let Err(halt) = self.step() {
                return halt;
            }
            if self.spin_index == before {
                idle_steps += 1;
                if idle_steps > idle_limit {
                    self.guard_trips += 1;
                    return HaltReason::InsufficientBankroll;
                }
            } else {
                idle_steps = 0;
            }
        }
    }

    /// Terminal conditions, checked before every spin.
    fn halt_check(&self) -> Option<HaltReason> {
        if self.bankroll <= 0 {
            return Some(HaltReason::Bankrupt);
        }
        if self.strategy.stop_loss > 0 && self.bankroll <= self.strategy.stop_loss {
            return Some(HaltReason::StopLoss);
        }
        if self.strategy.take_profit > 0 && self.bankroll >= self.strategy.take_profit {
            return Some(HaltReason::TakeProfit);
        }
        if self.spin_index >= self.table.max_spins as usize {
            return Some(HaltReason::SpinBudget);
        }
        None
    }

    /// Process one node visit.
    fn step(&mut self) -> Result<(), HaltReason> {
        let node = match self.strategy.node(self.cursor) {
            Some(n) => n,
            None => {
                // Rehydrated tree with a dangling root: nothing to play.
                return Err(HaltReason::InsufficientBankroll);
            }
        };
        let kind = node.kind.clone();
        let (on_win, on_loss) = (node.on_win, node.on_loss);

        match kind {
            NodeKind::Reset => {
                self.reset_to_root();
                Ok(())
            }
            NodeKind::Martingale { limit } => self.martingale_visit(limit, on_win, on_loss),
            NodeKind::RepeatUntil { until } => self.repeat_visit(until, on_win),
            NodeKind::WaitSpins { spins, then } => {
                self.wait_spins_visit(spins, then, on_win, on_loss)
            }
            NodeKind::WaitCondition { until } => self.wait_condition_visit(until, on_win, on_loss),
            _ => self.betting_visit(kind.label(), on_win, on_loss),
        }
    }

    // ── Node visits ──────────────────────────────────────────────────

    /// Single-spin kinds: bet base × multiplier once and branch on net.
    fn betting_visit(
        &mut self,
        label: &str,
        on_win: Option<NodeId>,
        on_loss: Option<NodeId>,
    ) -> Result<(), HaltReason> {
        let wagers = scale_down(self.active_wagers(), self.table.table_max);
        if total_amount(&wagers) > self.bankroll {
            return Err(HaltReason::InsufficientBankroll);
        }
        let action = format!("{label} x{}", self.multiplier);
        let net = self.settle(wagers, action);
        self.follow(if net > 0 { on_win } else { on_loss });
        Ok(())
    }

    /// Bounded doubling sequence.
    ///
    /// Exceeding the table max abandons the sequence outright (no scaling);
    /// exceeding the bankroll caps the stake to what is left. Branch
    /// selection treats "ended at or above the sequence's starting
    /// bankroll" as the win.
    fn martingale_visit(
        &mut self,
        limit: MartingaleLimit,
        on_win: Option<NodeId>,
        on_loss: Option<NodeId>,
    ) -> Result<(), HaltReason> {
        let sequence_start = self.bankroll;
        let mut mult = self.multiplier;
        let mut sequence_spins: u32 = 0;

        loop {
            if let Some(halt) = self.halt_check() {
                return Err(halt);
            }
            if sequence_spins >= MAX_SEQUENCE_SPINS || mult > MULTIPLIER_CEILING {
                self.guard_trips += 1;
                break;
            }

            let wagers: Vec<Wager> = self.base.iter().map(|w| w.scaled(mult)).collect();
            let total = total_amount(&wagers);
            if self.table.table_max > 0 && total > self.table.table_max {
                break; // abandon the sequence
            }
            let wagers = if total > self.bankroll {
                scale_down(wagers, self.bankroll)
            } else {
                wagers
            };
            if total_amount(&wagers) > self.bankroll {
                break; // cannot cover even the floored minimum
            }

            let net = self.settle(wagers, format!("martingale x{mult}"));
            sequence_spins += 1;
            let won = net > 0;

            match limit {
                MartingaleLimit::UntilBankrupt => {
                    if won || self.bankroll <= 0 {
                        break;
                    }
                    mult *= 2;
                }
                MartingaleLimit::ProfitTarget { target } => {
                    if self.bankroll - sequence_start >= target {
                        break;
                    }
                    // A win resets the doubling streak even while the
                    // sequence keeps chasing the target.
                    mult = if won { 1 } else { mult * 2 };
                }
                MartingaleLimit::SpinCount { spins } => {
                    if sequence_spins >= spins {
                        break;
                    }
                    mult = if won { 1 } else { mult * 2 };
                }
            }
        }

        self.multiplier = mult.min(MULTIPLIER_CEILING);
        let sequence_won = self.bankroll >= sequence_start;
        self.follow(if sequence_won { on_win } else { on_loss });
        Ok(())
    }

    /// Repeat the active wagers until an exit condition fires. Always
    /// continues via the win branch.
    fn repeat_visit(
        &mut self,
        until: RepeatLimit,
        on_win: Option<NodeId>,
    ) -> Result<(), HaltReason> {
        let sequence_start = self.bankroll;
        let mut wins: u32 = 0;
        let mut spins: u32 = 0;

        loop {
            if let Some(halt) = self.halt_check() {
                return Err(halt);
            }
            if spins >= MAX_SEQUENCE_SPINS {
                self.guard_trips += 1;
                break;
            }

            let wagers = scale_down(self.active_wagers(), self.table.table_max);
            if total_amount(&wagers) > self.bankroll {
                return Err(HaltReason::InsufficientBankroll);
            }
            let net = self.settle(wagers, format!("repeat #{}", spins + 1));
            spins += 1;
            if net > 0 {
                wins += 1;
            }

            let done = match until {
                RepeatLimit::SpinCount { spins: n } => spins >= n,
                RepeatLimit::WinCount { wins: n } => wins >= n,
                RepeatLimit::ProfitTarget { target } => self.bankroll - sequence_start >= target,
                RepeatLimit::LossLimit { limit } => sequence_start - self.bankroll >= limit,
            };
            if done {
                break;
            }
        }

        self.follow(on_win);
        Ok(())
    }

    /// Sit out N spins, optionally adjust the multiplier, then play one
    /// real betting spin through this node's children.
    fn wait_spins_visit(
        &mut self,
        spins: u32,
        then: Option<PostWaitAction>,
        on_win: Option<NodeId>,
        on_loss: Option<NodeId>,
    ) -> Result<(), HaltReason> {
        for i in 0..spins {
            if let Some(halt) = self.halt_check() {
                return Err(halt);
            }
            self.record_wait(format!("wait {}/{}", i + 1, spins));
        }
        match then {
            Some(PostWaitAction::Double) => self.bump_multiplier(self.multiplier * 2),
            Some(PostWaitAction::Triple) => self.bump_multiplier(self.multiplier * 3),
            Some(PostWaitAction::AddUnit) => self.bump_multiplier(self.multiplier + 1),
            Some(PostWaitAction::SubtractUnit) => self.multiplier = (self.multiplier - 1).max(1),
            Some(PostWaitAction::Reset) => {
                self.multiplier = 1;
                if let Some(root) = self.strategy.root_node() {
                    self.base = root.wagers.clone();
                }
            }
            None => {}
        }
        if let Some(halt) = self.halt_check() {
            return Err(halt);
        }
        self.betting_visit("bet", on_win, on_loss)
    }

    /// Sit out spins until the predicate matches (hard-capped), then play
    /// one real betting spin.
    fn wait_condition_visit(
        &mut self,
        until: SpinPredicate,
        on_win: Option<NodeId>,
        on_loss: Option<NodeId>,
    ) -> Result<(), HaltReason> {
        let mut waited: u32 = 0;
        loop {
            if let Some(halt) = self.halt_check() {
                return Err(halt);
            }
            if waited >= MAX_CONDITION_WAIT {
                self.guard_trips += 1;
                break;
            }
            let pocket = self.record_wait(format!("wait-for {until}"));
            waited += 1;
            if until.matches(pocket) {
                break;
            }
        }
        if let Some(halt) = self.halt_check() {
            return Err(halt);
        }
        self.betting_visit("bet", on_win, on_loss)
    }

    // ── Mechanics ────────────────────────────────────────────────────

    fn active_wagers(&self) -> Vec<Wager> {
        self.base.iter().map(|w| w.scaled(self.multiplier)).collect()
    }

    /// Draw, resolve every wager, append exactly one ledger entry, and
    /// apply the net to the bankroll. Returns the net.
    fn settle(&mut self, wagers: Vec<Wager>, action: String) -> Chips {
        let pocket = self.wheel.spin();
        let mut placed = Vec::with_capacity(wagers.len());
        let mut bet_total = 0;
        let mut payout_total = 0;
        for wager in wagers {
            let resolution = resolve(&wager, pocket);
            bet_total += wager.amount;
            payout_total += resolution.payout;
            placed.push(PlacedWager {
                won: resolution.won,
                payout: resolution.payout,
                net: resolution.payout - wager.amount,
                wager,
            });
        }
        let net = payout_total - bet_total;
        self.bankroll += net;
        self.records.push(SpinRecord {
            spin: self.spin_index,
            pocket,
            wagers: placed,
            bet_total,
            payout_total,
            net,
            bankroll: self.bankroll,
            action,
        });
        self.spin_index += 1;
        net
    }

    /// Consume one spin without placing a wager.
    fn record_wait(&mut self, action: String) -> crate::domain::Pocket {
        let pocket = self.wheel.spin();
        self.records.push(SpinRecord {
            spin: self.spin_index,
            pocket,
            wagers: Vec::new(),
            bet_total: 0,
            payout_total: 0,
            net: 0,
            bankroll: self.bankroll,
            action,
        });
        self.spin_index += 1;
        pocket
    }

    /// Move to a chosen child. An absent or root-pointing child resets the
    /// cursor to the root. A child with explicit wagers replaces the base
    /// and resets the multiplier; otherwise the child's own modifier folds
    /// into the inherited multiplier at transition time.
    fn follow(&mut self, child: Option<NodeId>) {
        let Some(id) = child else {
            return self.reset_to_root();
        };
        if id == self.strategy.root || id.0 >= self.strategy.nodes.len() {
            return self.reset_to_root();
        }

        let next = &self.strategy.nodes[id.0];
        if !next.wagers.is_empty() {
            self.base = next.wagers.clone();
            self.multiplier = 1;
        } else {
            match next.kind {
                NodeKind::Double => self.bump_multiplier(self.multiplier * 2),
                NodeKind::Triple => self.bump_multiplier(self.multiplier * 3),
                NodeKind::AddUnit => self.bump_multiplier(self.multiplier + 1),
                NodeKind::SubtractUnit => self.multiplier = (self.multiplier - 1).max(1),
                _ => {}
            }
        }
        self.cursor = id;
    }

    /// Raise the multiplier, clamping at the safety ceiling.
    fn bump_multiplier(&mut self, target: Chips) {
        if target > MULTIPLIER_CEILING {
            if self.multiplier <= MULTIPLIER_CEILING {
                self.guard_trips += 1;
            }
            self.multiplier = MULTIPLIER_CEILING;
        } else {
            self.multiplier = target;
        }
    }

    fn reset_to_root(&mut self) {
        self.cursor = self.strategy.root;
        if let Some(root) = self.strategy.root_node() {
            self.base = root.wagers.clone();
        }
        self.multiplier = 1;
    }
}

/// Proportionally shrink a wager set whose total exceeds `cap`, flooring
/// each amount at one unit. A cap ≤ 0 disables the limit.
fn scale_down(wagers: Vec<Wager>, cap: Chips) -> Vec<Wager> {
    if cap <= 0 {
        return wagers;
    }
    let total = total_amount(&wagers);
    if total <= cap {
        return wagers;
    }
    wagers
        .into_iter()
        .map(|w| {
            let scaled = (w.amount * cap / total).max(1);
            w.with_amount(scaled)
        })
        .collect()
}
