//! RNG module - 7-bag next queue with an injectable randomness source
//!
//! Implements the "7-bag" randomization algorithm used in modern Tetris.
//! Each bag contains one of each mino (I, O, T, S, Z, J, L), shuffled.
//! The queue appends whole bags whenever it drops below seven entries, so it can
//! never run dry between draws.
//!
//! Randomness goes through the [`Randomizer`] trait. [`SimpleRng`] is a small LCG
//! for reproducible games; [`ScriptedRng`] replays fixed values for tests.

use std::collections::VecDeque;
use std::fmt;

use crate::types::MinoType;

/// Minimum queue length kept after every draw
pub const MIN_QUEUE_LEN: usize = 7;

/// Source of random numbers for bag shuffling
pub trait Randomizer: Clone + fmt::Debug + PartialEq {
    /// Generate next random u32
    fn next_u32(&mut self) -> u32;

    /// Generate random value in range [0, max)
    fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Current internal state; feeding it back to `new` resumes the sequence
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Randomizer for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

/// Replays a fixed list of values in a loop
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Values that leave every shuffle in canonical order
    pub fn identity() -> Self {
        // next_range(i + 1) == i keeps each element in place.
        Self::new((1..MIN_QUEUE_LEN as u32).rev().collect())
    }
}

impl Randomizer for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

/// Upcoming minos, replenished one shuffled bag at a time
#[derive(Debug, Clone, PartialEq)]
pub struct NextQueue<R: Randomizer = SimpleRng> {
    queue: VecDeque<MinoType>,
    rng: R,
}

impl<R: Randomizer> NextQueue<R> {
    /// Create a queue filled with shuffled bags
    pub fn new(rng: R) -> Self {
        Self::with_prefix(&[], rng)
    }

    /// Create a queue that serves `prefix` first, then shuffled bags
    pub fn with_prefix(prefix: &[MinoType], rng: R) -> Self {
        let mut queue = Self {
            queue: prefix.iter().copied().collect(),
            rng,
        };
        queue.replenish();
        queue
    }

    /// Append shuffled bags until at least `MIN_QUEUE_LEN` minos are queued
    fn replenish(&mut self) {
        while self.queue.len() < MIN_QUEUE_LEN {
            let mut bag = MinoType::ALL;
            self.rng.shuffle(&mut bag);
            self.queue.extend(bag);
        }
    }

    /// Take the front mino
    pub fn pull_front(&mut self) -> MinoType {
        self.replenish();
        let mino = self
            .queue
            .pop_front()
            .expect("queue is replenished before every draw");
        self.replenish();
        mino
    }

    /// Take the mino at `index`, keeping the order of the rest
    pub fn remove_at(&mut self, index: usize) -> Option<MinoType> {
        let mino = self.queue.remove(index);
        self.replenish();
        mino
    }

    /// Front mino without removing it
    pub fn front(&self) -> Option<MinoType> {
        self.queue.front().copied()
    }

    /// First `n` queued minos (fewer if the queue is shorter)
    pub fn peek(&self, n: usize) -> Vec<MinoType> {
        self.queue.iter().take(n).copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = MinoType> + '_ {
        self.queue.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }
}
