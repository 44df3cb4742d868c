//! Trial runner — wires together configuration, presets, and the engine.
//!
//! Three entry points:
//! - `run_once()`: one seeded session. Used by the CLI `run` command.
//! - `run_trials()`: N independent sessions in parallel (rayon), each with
//!   a hierarchy-derived sub-seed, sorted by final bankroll.
//! - `run_from_config()`: validates and resolves a `RunConfig`, then runs
//!   the whole batch and aggregates.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use spinlab_core::domain::Chips;
use spinlab_core::engine::{run_simulation, RunResult, TableConfig};
use spinlab_core::rng::RngHierarchy;
use spinlab_core::schema::{SchemaError, StrategyDocument};
use spinlab_core::strategy::{Strategy, StrategyError};
use spinlab_core::wheel::Wheel;

use crate::config::{ConfigError, RunConfig, StrategySource};
use crate::presets;
use crate::trial_metrics::TrialSummary;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyError),
    #[error("strategy document error: {0}")]
    Schema(#[from] SchemaError),
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}

/// One completed trial: the seed that produced it plus the full result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub trial: u64,
    pub seed: u64,
    pub result: RunResult,
}

impl TrialOutcome {
    pub fn final_bankroll(&self) -> Chips {
        self.result.stats.final_bankroll
    }
}

/// A complete batch: every trial outcome (sorted by final bankroll) plus
/// aggregate metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub run_id: String,
    pub config: RunConfig,
    /// Sorted ascending by final bankroll; ties break by trial index.
    pub outcomes: Vec<TrialOutcome>,
    pub summary: TrialSummary,
}

impl BatchResult {
    /// The median-outcome trial, the natural pick for display.
    pub fn median_outcome(&self) -> Option<&TrialOutcome> {
        self.outcomes.get(self.outcomes.len() / 2)
    }
}

/// Resolve the configured strategy source into a validated tree, with the
/// session's stop-loss/take-profit applied.
pub fn load_strategy(config: &RunConfig) -> Result<Strategy, RunError> {
    let mut strategy = match &config.strategy {
        StrategySource::Preset { preset, unit } => presets::build(preset, *unit)
            .ok_or_else(|| RunError::UnknownPreset(preset.clone()))?,
        StrategySource::File { file } => StrategyDocument::load(file)?.strategy,
    };
    // Session bounds override whatever the strategy carried; zero means
    // "leave the authored value alone".
    if config.session.stop_loss != 0 {
        strategy.stop_loss = config.session.stop_loss;
    }
    if config.session.take_profit != 0 {
        strategy.take_profit = config.session.take_profit;
    }
    strategy.validate()?;
    Ok(strategy)
}

/// Run a single seeded session.
pub fn run_once(
    strategy: &Strategy,
    table: &TableConfig,
    bankroll: Chips,
    trial: u64,
    seed: u64,
) -> TrialOutcome {
    let mut wheel = Wheel::seeded(seed);
    let result = run_simulation(strategy, table, bankroll, &mut wheel);
    TrialOutcome {
        trial,
        seed,
        result,
    }
}

/// Run `count` independent trials in parallel.
///
/// Each trial clones nothing mutable from its siblings: the tree is shared
/// read-only and every session owns its own wheel, so rayon's scheduling
/// never affects results. The returned vector is sorted by final bankroll
/// (ascending), which makes percentile picks an index lookup.
pub fn run_trials(
    strategy: &Strategy,
    table: &TableConfig,
    bankroll: Chips,
    hierarchy: &RngHierarchy,
    run_id: &str,
    count: u64,
) -> Vec<TrialOutcome> {
    let mut outcomes: Vec<TrialOutcome> = (0..count)
        .into_par_iter()
        .map(|trial| {
            let seed = hierarchy.sub_seed(run_id, trial);
            run_once(strategy, table, bankroll, trial, seed)
        })
        .collect();
    outcomes.sort_by_key(|o| (o.final_bankroll(), o.trial));
    outcomes
}

/// Validate, resolve, run, and aggregate a full configured batch.
pub fn run_from_config(config: &RunConfig) -> Result<BatchResult, RunError> {
    config.validate()?;
    let strategy = load_strategy(config)?;
    let run_id = config.run_id();
    let hierarchy = RngHierarchy::new(config.trials.master_seed);

    let outcomes = run_trials(
        &strategy,
        &config.table,
        config.session.bankroll,
        &hierarchy,
        &run_id,
        config.trials.count,
    );
    let summary = TrialSummary::compute(&outcomes);

    Ok(BatchResult {
        run_id,
        config: config.clone(),
        outcomes,
        summary,
    })
}
