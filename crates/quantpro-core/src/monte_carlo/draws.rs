use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies the random stream consumed by each revaluation of a
/// bump-and-revalue Greek.
///
/// Every simulation in the engine reads its randomness from a stream handed
/// out here, so the choice between independent and shared draws lives in one
/// place.
pub trait DrawStrategy {
    /// Stream for the next revaluation.
    fn next_stream(&mut self) -> StdRng;

    fn name(&self) -> &'static str;
}

/// Fresh, independent draws for every revaluation.
#[derive(Debug, Clone)]
pub struct IndependentDraws {
    source: StdRng,
}

impl IndependentDraws {
    pub fn new(source: StdRng) -> Self {
        Self { source }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl DrawStrategy for IndependentDraws {
    fn next_stream(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.source.gen())
    }

    fn name(&self) -> &'static str {
        "independent"
    }
}

/// Every revaluation replays the same stream (common random numbers).
///
/// Bumped and unbumped prices then share their shocks, which cancels most of
/// the sampling noise in the differences.
#[derive(Debug, Clone, Copy)]
pub struct CommonRandomNumbers {
    seed: u64,
}

impl CommonRandomNumbers {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy().gen())
    }
}

impl DrawStrategy for CommonRandomNumbers {
    fn next_stream(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    fn name(&self) -> &'static str {
        "common_random_numbers"
    }
}
