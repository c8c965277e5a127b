//! Injectable randomness for damage rolls, weather and AI jitter.
//!
//! Every draw is labelled with a reason so scripted sources can report
//! exactly which roll ran out.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

pub trait BattleRng {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self, reason: &str) -> f64;

    /// Uniform integer in `[1, 100]`.
    fn roll_percent(&mut self, reason: &str) -> u32 {
        let roll = (self.next_unit(reason) * 100.0).floor() as u32 + 1;
        roll.min(100)
    }

    /// Uniform float in `[0, 100)`.
    fn roll_chance(&mut self, reason: &str) -> f64 {
        self.next_unit(reason) * 100.0
    }

    /// Uniform float in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64, reason: &str) -> f64 {
        low + (high - low) * self.next_unit(reason)
    }

    /// Uniform index into a non-empty collection of `len` items.
    fn pick_index(&mut self, len: usize, reason: &str) -> usize {
        assert!(len > 0, "pick_index called with an empty collection for '{}'", reason);
        let index = (self.next_unit(reason) * len as f64).floor() as usize;
        index.min(len - 1)
    }

    /// Uniform integer in `[low, high]`.
    fn range_inclusive(&mut self, low: u32, high: u32, reason: &str) -> u32 {
        let span = (high - low + 1) as usize;
        low + self.pick_index(span, reason) as u32
    }
}

impl<R: BattleRng + ?Sized> BattleRng for &mut R {
    fn next_unit(&mut self, reason: &str) -> f64 {
        (**self).next_unit(reason)
    }
}

/// Production randomness backed by a seedable `StdRng`.
#[derive(Debug, Clone)]
pub struct TurnRng {
    inner: StdRng,
}

impl TurnRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn new_random() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }
}

impl BattleRng for TurnRng {
    fn next_unit(&mut self, reason: &str) -> f64 {
        let value: f64 = self.inner.random();
        trace!(reason, value, "rng draw");
        value
    }
}

/// Replays a fixed list of unit values. Panics when the list runs out, so a
/// test that consumes more randomness than expected fails loudly.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    outcomes: Vec<f64>,
    index: usize,
}

impl ScriptedRng {
    pub fn new_for_test(outcomes: Vec<f64>) -> Self {
        Self { outcomes, index: 0 }
    }

    pub fn consumed(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.len() - self.index
    }
}

impl BattleRng for ScriptedRng {
    fn next_unit(&mut self, reason: &str) -> f64 {
        if self.index >= self.outcomes.len() {
            panic!(
                "ScriptedRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        }
        let outcome = self.outcomes[self.index];

        #[cfg(test)]
        println!("[RNG] Consumed {} for: {}", outcome, reason);

        self.index += 1;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn percent_rolls_cover_one_to_hundred() {
        let mut rng = ScriptedRng::new_for_test(vec![0.0, 0.5, 0.999, 1.0]);
        assert_eq!(rng.roll_percent("low"), 1);
        assert_eq!(rng.roll_percent("mid"), 51);
        assert_eq!(rng.roll_percent("high"), 100);
        assert_eq!(rng.roll_percent("clamped"), 100);
    }

    #[test]
    fn ranges_and_indices() {
        let mut rng = ScriptedRng::new_for_test(vec![0.0, 0.99, 0.5, 0.25]);
        assert_eq!(rng.range_inclusive(3, 6, "low"), 3);
        assert_eq!(rng.range_inclusive(3, 6, "high"), 6);
        assert_eq!(rng.uniform(-10.0, 10.0, "jitter"), 0.0);
        assert_eq!(rng.pick_index(4, "pick"), 1);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "accuracy roll")]
    fn exhausted_script_names_the_draw() {
        let mut rng = ScriptedRng::new_for_test(vec![]);
        rng.roll_percent("accuracy roll");
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = TurnRng::seeded(42);
        let mut b = TurnRng::seeded(42);
        for _ in 0..20 {
            let x = a.next_unit("a");
            assert_eq!(x, b.next_unit("b"));
            assert!((0.0..1.0).contains(&x));
        }
    }
}
