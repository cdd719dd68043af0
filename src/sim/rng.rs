//! Injected randomness
//!
//! The simulation never reaches for a global RNG. Callers hand in a
//! `RandomSource`, so tests can script exact outcomes.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform random choices
pub trait RandomSource {
    /// Uniform index in `0..len` (`len` must be non-zero)
    fn next_index(&mut self, len: usize) -> usize;
    /// Uniform float in `[0, 1)`
    fn next_unit(&mut self) -> f32;
}

/// Seeded PCG generator used in real play
#[derive(Debug, Clone)]
pub struct SimRng {
    pub seed: u64,
    rng: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SimRng {
    fn next_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed script of choices (wraps around)
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    indices: Vec<usize>,
    units: Vec<f32>,
    index_cursor: usize,
    unit_cursor: usize,
}

impl ScriptedRandom {
    pub fn new(indices: Vec<usize>, units: Vec<f32>) -> Self {
        Self {
            indices,
            units,
            index_cursor: 0,
            unit_cursor: 0,
        }
    }

    /// Always picks the first candidate and zero jitter
    pub fn first() -> Self {
        Self::new(vec![0], vec![0.0])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 || self.indices.is_empty() {
            return 0;
        }
        let value = self.indices[self.index_cursor % self.indices.len()];
        self.index_cursor += 1;
        value % len
    }

    fn next_unit(&mut self) -> f32 {
        if self.units.is_empty() {
            return 0.0;
        }
        let value = self.units[self.unit_cursor % self.units.len()];
        self.unit_cursor += 1;
        value.clamp(0.0, 0.999_999)
    }
}
