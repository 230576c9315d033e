//! Injectable randomness
//!
//! Every random decision in the simulation goes through [`Dice`], so combat
//! rounds, flee checks and spawn choices can be replayed exactly.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of random decisions
pub trait Dice {
    /// Uniform integer in `min..=max` (returns `min` when the range is empty)
    fn roll(&mut self, min: i32, max: i32) -> i32;

    /// True with the given probability
    fn chance(&mut self, probability: f32) -> bool;

    /// Uniform index into a collection of `len` items (0 when `len <= 1`)
    fn index(&mut self, len: usize) -> usize;
}

/// Deterministic dice backed by ChaCha8
#[derive(Debug, Clone)]
pub struct SimRng {
    rng: ChaCha8Rng,
}

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Dice for SimRng {
    fn roll(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn chance(&mut self, probability: f32) -> bool {
        if probability <= 0.0 {
            false
        } else if probability >= 1.0 {
            true
        } else {
            self.rng.gen::<f32>() < probability
        }
    }

    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// Forces every roll to its maximum, delegating chances and picks
#[derive(Debug, Clone)]
pub struct MaxRolls<D>(pub D);

impl<D: Dice> Dice for MaxRolls<D> {
    fn roll(&mut self, min: i32, max: i32) -> i32 {
        max.max(min)
    }

    fn chance(&mut self, probability: f32) -> bool {
        self.0.chance(probability)
    }

    fn index(&mut self, len: usize) -> usize {
        self.0.index(len)
    }
}

/// Replays queued outcomes
///
/// When a queue runs dry the dice fall back to the quiet answer: rolls give
/// their minimum, chances fail, picks take the first item.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<i32>,
    chances: VecDeque<bool>,
    indices: VecDeque<usize>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = i32>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    pub fn with_chances(mut self, chances: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(chances);
        self
    }

    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, min: i32, max: i32) -> i32 {
        let hi = max.max(min);
        self.rolls
            .pop_front()
            .map(|v| v.clamp(min, hi))
            .unwrap_or(min)
    }

    fn chance(&mut self, _probability: f32) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.indices.pop_front().map(|i| i % len).unwrap_or(0)
    }
}
