//! Risk-neutral lognormal path generation.
//!
//! `ln S_t = ln S_0 + Σ [(r - q - σ²/2)·Δt + σ·√Δt·Z_k]` with `Δt = T/steps`.
//! Paths are independent and simulated in fixed-size chunks; each chunk owns
//! an RNG seeded from the caller's stream before any chunk runs, so the output
//! does not depend on whether chunks run sequentially or on rayon workers.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

use crate::types::MarketParameters;

/// Paths simulated per RNG chunk.
pub const PATHS_PER_CHUNK: usize = 4096;

/// Fill `shocks` with independent standard normal draws.
///
/// This is the only place simulation randomness is sampled.
#[inline]
pub fn fill_standard_normal(rng: &mut StdRng, shocks: &mut [f64]) {
    let normal = Normal::standard();
    for z in shocks.iter_mut() {
        *z = rng.sample(&normal);
    }
}

/// Per-step drift and diffusion of the discretized log process.
#[derive(Debug, Clone, Copy)]
pub struct LogEulerScheme {
    log_spot: f64,
    drift: f64,
    diffusion: f64,
    steps: usize,
}

impl LogEulerScheme {
    pub fn new(params: &MarketParameters, steps: usize) -> Self {
        let dt = params.tenor / steps as f64;
        let sigma = params.volatility;
        Self {
            log_spot: params.spot.ln(),
            drift: (params.risk_free_rate - params.dividend_yield - 0.5 * sigma * sigma) * dt,
            diffusion: sigma * dt.sqrt(),
            steps,
        }
    }

    fn simulate_chunk(&self, n_paths: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut shocks = vec![0.0; self.steps];
        (0..n_paths)
            .map(|_| {
                fill_standard_normal(&mut rng, &mut shocks);
                shocks
                    .iter()
                    .fold(self.log_spot, |log_s, z| log_s + self.drift + self.diffusion * z)
                    .exp()
            })
            .collect()
    }
}

#[inline]
fn chunk_len(chunk: usize, n_paths: usize) -> usize {
    PATHS_PER_CHUNK.min(n_paths - chunk * PATHS_PER_CHUNK)
}

/// Simulate `n_paths` terminal spots, in path order.
///
/// Callers are expected to have validated the parameters; `steps` and
/// `n_paths` must be at least one.
pub fn simulate_terminal_spots<R: Rng>(
    params: &MarketParameters,
    steps: usize,
    n_paths: usize,
    rng: &mut R,
) -> Vec<f64> {
    let scheme = LogEulerScheme::new(params, steps);
    let n_chunks = n_paths.div_ceil(PATHS_PER_CHUNK);
    let seeds: Vec<u64> = (0..n_chunks).map(|_| rng.gen()).collect();

    tracing::debug!(
        paths = n_paths,
        steps,
        chunks = n_chunks,
        "simulating terminal spots"
    );

    #[cfg(feature = "parallel")]
    let chunks: Vec<Vec<f64>> = seeds
        .par_iter()
        .enumerate()
        .map(|(i, &seed)| scheme.simulate_chunk(chunk_len(i, n_paths), seed))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let chunks: Vec<Vec<f64>> = seeds
        .iter()
        .enumerate()
        .map(|(i, &seed)| scheme.simulate_chunk(chunk_len(i, n_paths), seed))
        .collect();

    chunks.concat()
}
