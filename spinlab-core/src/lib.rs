//! SpinLab Core — engine, domain types, strategy trees, statistics.
//!
//! This crate contains the heart of the roulette strategy simulator:
//! - Domain types (pockets, wagers, ledger records)
//! - Exact-integer bet resolver for the eleven bet shapes
//! - Seedable 38-pocket wheel behind the `Spin` trait
//! - Strategy tree with root-only back-edge and authoring validation
//! - Spin-by-spin simulation loop with bounded progression sub-loops
//! - Incremental session statistics (prefix folds for playback)
//! - JSON persistence schema for saved strategies
//! - Deterministic RNG hierarchy for parallel trial batches

pub mod domain;
pub mod engine;
pub mod resolve;
pub mod rng;
pub mod schema;
pub mod strategy;
pub mod wheel;
