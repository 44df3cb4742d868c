//! Exports — ledger CSV, trial CSV, and the markdown session report.
//!
//! The ledger export is one row per step (index, outcome, totals, bankroll,
//! win flag, action tag) with a trailing summary block, which is the shape
//! downstream spreadsheet users expect.

use anyhow::Result;
use std::path::Path;

use spinlab_core::engine::{HaltReason, RunResult, SessionStats};

use crate::config::StrategySource;
use crate::runner::{BatchResult, TrialOutcome};

/// Write one run's full ledger as CSV, with a trailing summary block.
pub fn write_ledger_csv(path: impl AsRef<Path>, result: &RunResult) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    writer.write_record([
        "spin", "pocket", "bet_total", "payout", "net", "bankroll", "win", "action",
    ])?;
    for rec in &result.records {
        writer.write_record([
            rec.spin.to_string(),
            rec.pocket.to_string(),
            rec.bet_total.to_string(),
            rec.payout_total.to_string(),
            rec.net.to_string(),
            rec.bankroll.to_string(),
            rec.is_win().to_string(),
            rec.action.clone(),
        ])?;
    }
    writer.write_record([""])?;
    for (key, value) in summary_rows(&result.stats) {
        writer.write_record([key, value])?;
    }
    writer.write_record(["halt".into(), format!("{:?}", result.halt)])?;
    writer.write_record(["guard_trips".into(), result.guard_trips.to_string()])?;
    writer.flush()?;
    Ok(())
}

/// Write one row per trial: seed, spin count, final bankroll, ROI, halt.
pub fn write_trials_csv(path: impl AsRef<Path>, outcomes: &[TrialOutcome]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["trial", "seed", "spins", "final_bankroll", "roi", "halt"])?;
    for outcome in outcomes {
        writer.write_record([
            outcome.trial.to_string(),
            outcome.seed.to_string(),
            outcome.result.records.len().to_string(),
            outcome.final_bankroll().to_string(),
            format!("{:.2}", outcome.result.stats.roi),
            format!("{:?}", outcome.result.halt),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the markdown session report for a batch.
pub fn render_report(batch: &BatchResult) -> String {
    let mut out = String::new();
    let summary = &batch.summary;

    out.push_str("# SpinLab session report\n\n");
    out.push_str(&format!(
        "- Generated: {}\n",
        chrono::Utc::now().to_rfc3339()
    ));
    out.push_str(&format!("- Run id: `{}`\n", batch.run_id));
    out.push_str(&format!("- Strategy: {}\n", strategy_label(&batch.config.strategy)));
    out.push_str(&format!(
        "- Bankroll: {} (stop-loss {}, take-profit {})\n",
        batch.config.session.bankroll,
        batch.config.session.stop_loss,
        batch.config.session.take_profit
    ));
    out.push_str(&format!(
        "- Table: max {} spins, stakes capped at {}\n",
        batch.config.table.max_spins, batch.config.table.table_max
    ));
    out.push_str(&format!(
        "- Trials: {} (master seed {})\n\n",
        summary.trials, batch.config.trials.master_seed
    ));

    out.push_str("## Outcome distribution\n\n");
    out.push_str("| metric | value |\n|---|---|\n");
    out.push_str(&format!(
        "| mean final bankroll | {:.2} |\n",
        summary.mean_final_bankroll
    ));
    out.push_str(&format!(
        "| median final bankroll | {} |\n",
        summary.median_final_bankroll
    ));
    out.push_str(&format!(
        "| p05 / p95 | {} / {} |\n",
        summary.p05_final_bankroll, summary.p95_final_bankroll
    ));
    out.push_str(&format!(
        "| best / worst | {} / {} |\n",
        summary.best_final_bankroll, summary.worst_final_bankroll
    ));
    out.push_str(&format!("| bust rate | {:.1}% |\n", summary.bust_rate * 100.0));
    out.push_str(&format!(
        "| take-profit rate | {:.1}% |\n",
        summary.take_profit_rate * 100.0
    ));
    out.push_str(&format!("| mean spins | {:.1} |\n", summary.mean_spins));
    out.push_str(&format!("| mean ROI | {:.2}% |\n\n", summary.mean_roi));

    if let Some(median) = batch.median_outcome() {
        let stats = &median.result.stats;
        out.push_str("## Median trial\n\n");
        out.push_str(&format!(
            "Trial {} (seed {}): {} → {} over {} betting spins ({} wins / {} losses), \
             longest streaks W{}/L{}, drawdown {}, upside {}, ROI {:.2}%. Halted: {}.\n",
            median.trial,
            median.seed,
            stats.initial_bankroll,
            stats.final_bankroll,
            stats.spins,
            stats.wins,
            stats.losses,
            stats.longest_win_streak,
            stats.longest_loss_streak,
            stats.max_drawdown,
            stats.max_upside,
            stats.roi,
            halt_label(median.result.halt),
        ));
    }
    out
}

/// Write the markdown session report to disk.
pub fn write_report(path: impl AsRef<Path>, batch: &BatchResult) -> Result<()> {
    std::fs::write(path, render_report(batch))?;
    Ok(())
}

fn summary_rows(stats: &SessionStats) -> Vec<(String, String)> {
    vec![
        ("initial_bankroll".into(), stats.initial_bankroll.to_string()),
        ("final_bankroll".into(), stats.final_bankroll.to_string()),
        ("spins".into(), stats.spins.to_string()),
        ("wins".into(), stats.wins.to_string()),
        ("losses".into(), stats.losses.to_string()),
        (
            "longest_win_streak".into(),
            stats.longest_win_streak.to_string(),
        ),
        (
            "longest_loss_streak".into(),
            stats.longest_loss_streak.to_string(),
        ),
        ("max_drawdown".into(), stats.max_drawdown.to_string()),
        ("max_upside".into(), stats.max_upside.to_string()),
        ("roi".into(), format!("{:.2}", stats.roi)),
    ]
}

fn strategy_label(source: &StrategySource) -> String {
    match source {
        StrategySource::Preset { preset, unit } => format!("preset `{preset}` (unit {unit})"),
        StrategySource::File { file } => format!("document `{}`", file.display()),
    }
}

fn halt_label(halt: HaltReason) -> &'static str {
    match halt {
        HaltReason::SpinBudget => "spin budget exhausted",
        HaltReason::StopLoss => "stop-loss reached",
        HaltReason::TakeProfit => "take-profit reached",
        HaltReason::Bankrupt => "bankrupt",
        HaltReason::InsufficientBankroll => "could not cover the next wager",
    }
}
