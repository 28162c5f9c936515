//! Random sources used by maze generation.
//!
//! [`RandomSource`] is the seam the generator draws from. Two sources ship:
//!
//! - [`Lcg`]: Park-Miller minimal-standard generator. Same seed, same maze,
//!   on every platform.
//! - [`EntropySource`]: `rand`'s `StdRng` seeded from the OS, for play
//!   sessions that did not ask for a seed.
//!
//! Reference: https://en.wikipedia.org/wiki/Lehmer_random_number_generator

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::MazeError;
use crate::grid::Position;

/// Uniform integer draws and uniform selection.
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`.
    fn random_int(&mut self, bound: usize) -> Result<usize, MazeError>;

    /// Uniform pick over `items` via `random_int(items.len())`.
    fn pick_random<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, MazeError>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return Err(MazeError::EmptySelection);
        }
        let idx = self.random_int(items.len())?;
        Ok(&items[idx])
    }

    /// Uniform cell of a `width` x `height` grid. Draws x first, then y.
    fn random_position(&mut self, width: usize, height: usize) -> Result<Position, MazeError>
    where
        Self: Sized,
    {
        let x = self.random_int(width)?;
        let y = self.random_int(height)?;
        Ok(Position::new(x, y))
    }
}

impl<R: RandomSource> RandomSource for &mut R {
    fn random_int(&mut self, bound: usize) -> Result<usize, MazeError> {
        (**self).random_int(bound)
    }
}

/// Park-Miller Linear Congruential Generator (MINSTD)
///
/// Constants:
/// - Multiplier (a): 48271
/// - Modulus (m): 2^31 - 1 = 2147483647
pub struct Lcg {
    state: u32,
}

impl Lcg {
    const A: u64 = 48271;
    const M: u64 = 2147483647; // 2^31 - 1

    /// Create a new LCG with the given seed
    ///
    /// If seed is 0 (or a multiple of the modulus) it's replaced with 1 to
    /// avoid the degenerate all-zero sequence
    pub fn new(seed: u32) -> Self {
        let state = (seed as u64 % Self::M) as u32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    fn advance(&mut self) {
        // u64 keeps the multiplication from overflowing
        self.state = ((self.state as u64 * Self::A) % Self::M) as u32;
    }
}

impl RandomSource for Lcg {
    /// Pure integer scaling, no floating point: `(state * bound) / M`.
    /// State is always in `[1, M)`, so the result is in `[0, bound)`.
    fn random_int(&mut self, bound: usize) -> Result<usize, MazeError> {
        if bound == 0 {
            return Err(MazeError::InvalidBound(bound));
        }
        self.advance();
        let scaled = (self.state as u64 * bound as u64) / Self::M;
        Ok(scaled as usize)
    }
}

/// OS-seeded randomness for unseeded sessions.
pub struct EntropySource {
    rng: StdRng,
}

impl EntropySource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed-seed variant, mostly useful in tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropySource {
    fn random_int(&mut self, bound: usize) -> Result<usize, MazeError> {
        if bound == 0 {
            return Err(MazeError::InvalidBound(bound));
        }
        Ok(self.rng.gen_range(0..bound))
    }
}
