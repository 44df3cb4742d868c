//! Wheel — the sole source of non-determinism in a run.
//!
//! Each draw is a uniform IID sample over the 38 pockets; there is no
//! shuffling or depletion. The [`Spin`] trait is the seam the engine spins
//! through, so tests can script exact outcomes.

use crate::domain::{Pocket, POCKET_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Anything that can produce the next spin outcome.
pub trait Spin {
    fn spin(&mut self) -> Pocket;
}

/// A uniformly random American wheel over any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct Wheel<R: Rng> {
    rng: R,
}

impl Wheel<StdRng> {
    /// Deterministic wheel from a 64-bit seed.
    pub fn seeded(seed: u64) -> Self {
        Wheel {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Wheel<R> {
    pub fn new(rng: R) -> Self {
        Wheel { rng }
    }
}

impl<R: Rng> Spin for Wheel<R> {
    fn spin(&mut self) -> Pocket {
        let value = self.rng.gen_range(0..POCKET_COUNT);
        Pocket::new(value).expect("gen_range bounded by POCKET_COUNT")
    }
}

/// A wheel that replays a fixed outcome script, then repeats its last
/// pocket. Test helper for forcing exact win/loss sequences.
#[derive(Debug, Clone)]
pub struct ScriptedWheel {
    script: VecDeque<Pocket>,
    last: Pocket,
}

impl ScriptedWheel {
    /// Build from normalized pocket values (0–36, 37 for 00).
    ///
    /// Panics on an out-of-range value; scripts are test fixtures.
    pub fn new(values: &[u8]) -> Self {
        let script: VecDeque<Pocket> = values
            .iter()
            .map(|&v| Pocket::new(v).expect("scripted pocket out of range"))
            .collect();
        let last = script.back().copied().unwrap_or(Pocket::DOUBLE_ZERO);
        ScriptedWheel { script, last }
    }
}

impl Spin for ScriptedWheel {
    fn spin(&mut self) -> Pocket {
        match self.script.pop_front() {
            Some(p) => {
                self.last = p;
                p
            }
            None => self.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_wheel_is_reproducible() {
        let mut a = Wheel::seeded(42);
        let mut b = Wheel::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.spin(), b.spin());
        }
    }

    #[test]
    fn every_pocket_is_reachable() {
        let mut wheel = Wheel::seeded(7);
        let mut seen = [false; POCKET_COUNT as usize];
        for _ in 0..10_000 {
            seen[wheel.spin().value() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "all 38 pockets should appear");
    }

    #[test]
    fn scripted_wheel_replays_then_repeats() {
        let mut wheel = ScriptedWheel::new(&[17, 0, 37]);
        assert_eq!(wheel.spin().value(), 17);
        assert_eq!(wheel.spin().value(), 0);
        assert_eq!(wheel.spin(), Pocket::DOUBLE_ZERO);
        // Script exhausted: keeps landing on the last pocket.
        assert_eq!(wheel.spin(), Pocket::DOUBLE_ZERO);
    }
}
