//! Process-lifetime random stream backing template selection and enemy fire.

use grid_shooter_core::RandomSource;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random source seeded once at process start and never reseeded.
#[derive(Clone, Debug)]
pub(crate) struct ChaChaRandom {
    rng: ChaCha8Rng,
}

impl ChaChaRandom {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for ChaChaRandom {
    fn next_below(&mut self, bound: u32) -> u32 {
        self.rng.gen_range(0..bound.max(1))
    }
}
