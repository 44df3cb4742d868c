//! Trial aggregation metrics — pure functions over a batch of outcomes.
//!
//! Every metric is outcome list in, scalar out. No dependencies on the
//! runner or the engine loop.

use serde::{Deserialize, Serialize};
use spinlab_core::domain::Chips;
use spinlab_core::engine::HaltReason;

use crate::runner::TrialOutcome;

/// Aggregate metrics for a batch of independent trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub trials: usize,
    pub mean_final_bankroll: f64,
    pub median_final_bankroll: Chips,
    pub p05_final_bankroll: Chips,
    pub p25_final_bankroll: Chips,
    pub p75_final_bankroll: Chips,
    pub p95_final_bankroll: Chips,
    pub best_final_bankroll: Chips,
    pub worst_final_bankroll: Chips,
    /// Fraction of trials that ended bankrupt.
    pub bust_rate: f64,
    /// Fraction of trials that hit the take-profit target.
    pub take_profit_rate: f64,
    pub mean_spins: f64,
    pub mean_roi: f64,
}

impl TrialSummary {
    /// Compute all metrics from a batch of outcomes (any order).
    pub fn compute(outcomes: &[TrialOutcome]) -> Self {
        let mut finals: Vec<Chips> = outcomes.iter().map(|o| o.final_bankroll()).collect();
        finals.sort_unstable();

        TrialSummary {
            trials: outcomes.len(),
            mean_final_bankroll: mean(&finals),
            median_final_bankroll: percentile(&finals, 0.50),
            p05_final_bankroll: percentile(&finals, 0.05),
            p25_final_bankroll: percentile(&finals, 0.25),
            p75_final_bankroll: percentile(&finals, 0.75),
            p95_final_bankroll: percentile(&finals, 0.95),
            best_final_bankroll: finals.last().copied().unwrap_or(0),
            worst_final_bankroll: finals.first().copied().unwrap_or(0),
            bust_rate: halt_rate(outcomes, HaltReason::Bankrupt),
            take_profit_rate: halt_rate(outcomes, HaltReason::TakeProfit),
            mean_spins: mean_of(outcomes, |o| o.result.records.len() as f64),
            mean_roi: mean_of(outcomes, |o| o.result.stats.roi),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Nearest-rank percentile over a sorted slice. Returns 0 when empty.
pub fn percentile(sorted: &[Chips], p: f64) -> Chips {
    if sorted.is_empty() {
        return 0;
    }
    let rank = ((sorted.len() - 1) as f64 * p).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

/// Fraction of trials that halted for the given reason.
pub fn halt_rate(outcomes: &[TrialOutcome], reason: HaltReason) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    let hits = outcomes.iter().filter(|o| o.result.halt == reason).count();
    hits as f64 / outcomes.len() as f64
}

fn mean(values: &[Chips]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

fn mean_of(outcomes: &[TrialOutcome], f: impl Fn(&TrialOutcome) -> f64) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    outcomes.iter().map(f).sum::<f64>() / outcomes.len() as f64
}
