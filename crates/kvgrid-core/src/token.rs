//! Sources of short printable-ASCII tokens used as synthetic keys and values

use rand::rngs::ThreadRng;
use rand::Rng;
use std::collections::VecDeque;

/// Lowest printable ASCII byte used in tokens (`!`)
pub const PRINTABLE_MIN: u8 = 33;
/// Highest printable ASCII byte used in tokens (`~`)
pub const PRINTABLE_MAX: u8 = 126;

/// Produces strings of printable ASCII characters
pub trait TokenSource {
    /// Generate a token of exactly `len` characters
    fn token(&mut self, len: usize) -> String;
}

/// Uniformly random tokens over `PRINTABLE_MIN..=PRINTABLE_MAX`
#[derive(Debug, Clone)]
pub struct RandomTokens<R = ThreadRng> {
    rng: R,
}

impl RandomTokens<ThreadRng> {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RandomTokens<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomTokens<R> {
    /// Use a specific generator, e.g. a seeded one
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TokenSource for RandomTokens<R> {
    fn token(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| char::from(self.rng.random_range(PRINTABLE_MIN..=PRINTABLE_MAX)))
            .collect()
    }
}

/// Replays a fixed list of tokens, then falls back to a repeating filler.
///
/// Deterministic stand-in for [`RandomTokens`] when exact output matters.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTokens {
    queue: VecDeque<String>,
}

impl ScriptedTokens {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Tokens not yet handed out
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl TokenSource for ScriptedTokens {
    fn token(&mut self, len: usize) -> String {
        // Scripted tokens are returned as-is, whatever their length
        self.queue.pop_front().unwrap_or_else(|| "x".repeat(len))
    }
}
