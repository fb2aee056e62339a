//! Deterministic seed mixing and the random stream shared by generation phases.

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

use crate::types::Direction;

pub const WALK_STREAM: u64 = 1;
pub const POPULATION_STREAM: u64 = 2;
pub const AGENT_STREAM_BASE: u64 = 0x1000;

/// Seeded random stream. Every draw used by generation and agents goes through
/// here so results depend only on the seed.
#[derive(Clone, Debug)]
pub struct DungeonRng {
    inner: ChaCha8Rng,
}

impl DungeonRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Independent stream for one phase of a run.
    pub fn for_stream(run_seed: u64, stream: u64) -> Self {
        Self::from_seed(mix_seed_stream(run_seed, stream))
    }

    /// Uniform in `0..bound` without modulo bias.
    pub fn below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0);
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let wide = u64::from(self.inner.next_u32()) * u64::from(bound);
            if (wide as u32) >= threshold {
                return (wide >> 32) as u32;
            }
        }
    }

    /// Uniform in `min..=max`.
    pub fn inclusive(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max);
        let span = max - min;
        if span == u32::MAX {
            return self.inner.next_u32();
        }
        min + self.below(span + 1)
    }

    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0 && len <= u32::MAX as usize);
        self.below(len as u32) as usize
    }

    /// Top two bits of one draw pick among the four cardinal directions.
    pub fn direction(&mut self) -> Direction {
        Direction::ALL[(self.inner.next_u32() >> 30) as usize]
    }

    /// Uniform percentile roll in `0..=100`.
    pub fn percentile(&mut self) -> u8 {
        self.below(101) as u8
    }
}

pub fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}
