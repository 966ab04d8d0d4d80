//! Random hit resolution
//!
//! Hit rates are expressed in basis points: a draw `r` uniform in
//! `[0, 10000)` hits when `r <= hit_rate`. The generator is always supplied
//! by the caller so concurrent evaluations never share one.

use crate::types::BASIS_POINTS;
use rand::Rng;

/// Source of uniform random integers
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`; returns 0 when `bound` is 0
    fn next_below(&mut self, bound: u64) -> u64;
}

impl<R: Rng> RandomSource for R {
    fn next_below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.gen_range(0..bound)
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted
///
/// A draw at or above the requested bound is clamped to `bound - 1`.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    draws: Vec<u64>,
    cursor: usize,
}

impl ScriptedRolls {
    pub fn new(draws: Vec<u64>) -> Self {
        ScriptedRolls { draws, cursor: 0 }
    }

    /// Always return the same draw
    pub fn fixed(draw: u64) -> Self {
        Self::new(vec![draw])
    }

    /// Number of draws consumed so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRolls {
    fn next_below(&mut self, bound: u64) -> u64 {
        if bound == 0 || self.draws.is_empty() {
            self.cursor += 1;
            return 0;
        }
        let draw = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        draw.min(bound - 1)
    }
}

/// Roll against a hit rate in basis points
pub fn resolve_hit<R: RandomSource + ?Sized>(rng: &mut R, hit_rate: i64) -> bool {
    let roll = rng.next_below(BASIS_POINTS as u64) as i64;
    roll <= hit_rate
}

/// Uniform integer in `[min, max]`
///
/// A reversed range (`max < min`) is treated as empty and returns `min`
/// without drawing, instead of sampling from `floor(r * (max - min + 1)) + min`
/// with a negative width.
pub fn bounded_random_int<R: RandomSource + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    let span = max.abs_diff(min).saturating_add(1);
    min.wrapping_add(rng.next_below(span) as i64)
}
