//! SpinLab CLI — run, trials, validate, and preset listing commands.
//!
//! Commands:
//! - `run` — simulate one session from a TOML config or a named preset
//! - `trials` — run N independent sessions in parallel and aggregate
//! - `validate` — check a saved strategy document before playing it
//! - `presets` — list the built-in strategies

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use spinlab_core::domain::Chips;
use spinlab_core::schema::StrategyDocument;
use spinlab_runner::{
    describe_preset, run_from_config, write_ledger_csv, write_report, write_trials_csv,
    BatchResult, RunConfig, SessionConfig, StrategySource, TrialConfig, PRESET_NAMES,
};

#[derive(Parser)]
#[command(name = "spinlab", about = "SpinLab — roulette strategy simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one session and print the ledger tail and statistics.
    Run {
        /// Path to a TOML run config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Named preset: flat_red, martingale, dalembert, paroli, wait_for_red, grind, james_bond.
        #[arg(long)]
        preset: Option<String>,

        /// Base unit stake for presets.
        #[arg(long, default_value_t = 10)]
        unit: Chips,

        /// Starting bankroll (ignored when --config is given).
        #[arg(long, default_value_t = 1_000)]
        bankroll: Chips,

        /// Spin budget.
        #[arg(long, default_value_t = 500)]
        spins: u32,

        /// Master seed.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Stop once the bankroll falls to this level.
        #[arg(long, default_value_t = 0)]
        stop_loss: Chips,

        /// Stop once the bankroll reaches this level.
        #[arg(long, default_value_t = 0)]
        take_profit: Chips,

        /// Directory for ledger.csv and report.md exports.
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    /// Run many independent sessions and print the outcome distribution.
    Trials {
        /// Path to a TOML run config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Named preset (see `spinlab presets`).
        #[arg(long)]
        preset: Option<String>,

        /// Base unit stake for presets.
        #[arg(long, default_value_t = 10)]
        unit: Chips,

        /// Number of trials (ignored when --config is given).
        #[arg(long, default_value_t = 1_000)]
        count: u64,

        /// Starting bankroll.
        #[arg(long, default_value_t = 1_000)]
        bankroll: Chips,

        /// Spin budget per trial.
        #[arg(long, default_value_t = 500)]
        spins: u32,

        /// Master seed.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Directory for trials.csv and report.md exports.
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
    /// Validate a saved strategy document.
    Validate {
        /// Path to a strategy JSON document.
        file: PathBuf,
    },
    /// List the built-in strategy presets.
    Presets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            preset,
            unit,
            bankroll,
            spins,
            seed,
            stop_loss,
            take_profit,
            export_dir,
        } => {
            let mut config = resolve_config(
                config, preset, unit, bankroll, spins, seed, stop_loss, take_profit,
            )?;
            config.trials.count = 1;
            let batch = run_from_config(&config)?;
            print_single(&batch);
            if let Some(dir) = export_dir {
                export_single(&dir, &batch)?;
            }
            Ok(())
        }
        Commands::Trials {
            config,
            preset,
            unit,
            count,
            bankroll,
            spins,
            seed,
            export_dir,
        } => {
            let mut config = resolve_config(config, preset, unit, bankroll, spins, seed, 0, 0)?;
            if config.trials.count == 1 {
                config.trials.count = count;
            }
            let batch = run_from_config(&config)?;
            print_batch(&batch);
            if let Some(dir) = export_dir {
                export_batch(&dir, &batch)?;
            }
            Ok(())
        }
        Commands::Validate { file } => run_validate(file),
        Commands::Presets => {
            for name in PRESET_NAMES {
                println!("{name:<14} {}", describe_preset(name));
            }
            Ok(())
        }
    }
}

/// Build a RunConfig from either a TOML file or preset + flags.
#[allow(clippy::too_many_arguments)]
fn resolve_config(
    config: Option<PathBuf>,
    preset: Option<String>,
    unit: Chips,
    bankroll: Chips,
    spins: u32,
    seed: u64,
    stop_loss: Chips,
    take_profit: Chips,
) -> Result<RunConfig> {
    if let Some(path) = config {
        return RunConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()));
    }
    let Some(preset) = preset else {
        bail!("either --config or --preset is required");
    };
    let mut run_config = RunConfig {
        session: SessionConfig {
            bankroll,
            stop_loss,
            take_profit,
        },
        table: Default::default(),
        trials: TrialConfig {
            count: 1,
            master_seed: seed,
        },
        strategy: StrategySource::Preset { preset, unit },
    };
    run_config.table.max_spins = spins;
    run_config.validate()?;
    Ok(run_config)
}

fn run_validate(file: PathBuf) -> Result<()> {
    let doc = StrategyDocument::load(&file)
        .with_context(|| format!("loading strategy {}", file.display()))?;
    match doc.strategy.validate() {
        Ok(()) => {
            println!(
                "OK: {} nodes, root carries {} wager(s)",
                doc.strategy.nodes.len(),
                doc.strategy.root_node().map_or(0, |n| n.wagers.len())
            );
            Ok(())
        }
        Err(e) => bail!("invalid strategy: {e}"),
    }
}

fn print_single(batch: &BatchResult) {
    let Some(outcome) = batch.median_outcome() else {
        return;
    };
    let result = &outcome.result;
    let tail_start = result.records.len().saturating_sub(10);

    println!("spin  pocket  bet  payout  net  bankroll  action");
    for rec in &result.records[tail_start..] {
        println!(
            "{:<5} {:<7} {:<4} {:<7} {:<4} {:<9} {}",
            rec.spin, rec.pocket, rec.bet_total, rec.payout_total, rec.net, rec.bankroll,
            rec.action
        );
    }
    if tail_start > 0 {
        println!("({} earlier spins not shown)", tail_start);
    }

    let stats = &result.stats;
    println!();
    println!(
        "{} -> {} over {} betting spins ({} wins / {} losses)",
        stats.initial_bankroll, stats.final_bankroll, stats.spins, stats.wins, stats.losses
    );
    println!(
        "streaks W{}/L{}, drawdown {}, upside {}, ROI {:.2}%",
        stats.longest_win_streak,
        stats.longest_loss_streak,
        stats.max_drawdown,
        stats.max_upside,
        stats.roi
    );
    println!("halt: {:?}, guard trips: {}", result.halt, result.guard_trips);
}

fn print_batch(batch: &BatchResult) {
    let s = &batch.summary;
    println!("run {} — {} trials", batch.run_id, s.trials);
    println!();
    println!("final bankroll  mean {:.2}  median {}", s.mean_final_bankroll, s.median_final_bankroll);
    println!("percentiles     p05 {}  p25 {}  p75 {}  p95 {}",
        s.p05_final_bankroll, s.p25_final_bankroll, s.p75_final_bankroll, s.p95_final_bankroll);
    println!("extremes        worst {}  best {}", s.worst_final_bankroll, s.best_final_bankroll);
    println!("bust rate       {:.1}%", s.bust_rate * 100.0);
    println!("take-profit     {:.1}%", s.take_profit_rate * 100.0);
    println!("mean spins      {:.1}", s.mean_spins);
    println!("mean ROI        {:.2}%", s.mean_roi);
}

fn export_single(dir: &PathBuf, batch: &BatchResult) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    if let Some(outcome) = batch.median_outcome() {
        write_ledger_csv(dir.join("ledger.csv"), &outcome.result)?;
    }
    write_report(dir.join("report.md"), batch)?;
    println!("exported to {}", dir.display());
    Ok(())
}

fn export_batch(dir: &PathBuf, batch: &BatchResult) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    write_trials_csv(dir.join("trials.csv"), &batch.outcomes)?;
    write_report(dir.join("report.md"), batch)?;
    if let Some(median) = batch.median_outcome() {
        write_ledger_csv(dir.join("median-ledger.csv"), &median.result)?;
    }
    println!("exported to {}", dir.display());
    Ok(())
}
