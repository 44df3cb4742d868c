//! Simulation engine — spin loop, configuration, statistics.
//!
//! One visit per node, one ledger entry per spin:
//! 1. Terminal checks (bankroll floor/target, spin budget)
//! 2. Node dispatch (single spin, bounded sub-loop, wait, or reset)
//! 3. Settlement: draw, resolve, append record, update bankroll
//! 4. Traversal: branch on the outcome, fold progressions into the
//!    multiplier

pub mod sim_loop;
pub mod state;
pub mod stats;

pub use sim_loop::{
    run_simulation, MAX_CONDITION_WAIT, MAX_SEQUENCE_SPINS, MULTIPLIER_CEILING,
};
pub use state::{HaltReason, RunResult, TableConfig};
pub use stats::{SessionStats, StatsAccumulator};
