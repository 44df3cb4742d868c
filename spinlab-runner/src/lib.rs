//! SpinLab Runner — simulation orchestration on top of `spinlab-core`.
//!
//! This crate builds on the engine to provide:
//! - TOML run configuration with content-addressed run ids
//! - Named strategy presets (flat, martingale, d'Alembert, paroli, …)
//! - Parallel multi-trial execution with deterministic per-trial seeds
//! - Trial aggregation metrics (percentiles, bust rate, mean ROI)
//! - Ledger/trial CSV exports and a markdown session report

pub mod config;
pub mod export;
pub mod presets;
pub mod runner;
pub mod trial_metrics;

pub use config::{ConfigError, RunConfig, RunId, SessionConfig, StrategySource, TrialConfig};
pub use export::{render_report, write_ledger_csv, write_report, write_trials_csv};
pub use presets::{build as build_preset, describe as describe_preset, PRESET_NAMES};
pub use runner::{load_strategy, run_from_config, run_once, run_trials, BatchResult, RunError, TrialOutcome};
pub use trial_metrics::TrialSummary;
