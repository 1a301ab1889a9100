#[cfg(feature = "parallel")]
use rayon::prelude::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::QuantProError;
use crate::monte_carlo::draws::{CommonRandomNumbers, DrawStrategy, IndependentDraws};
use crate::monte_carlo::paths::simulate_terminal_spots;
use crate::types::*;
use crate::QuantProResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Discretization, path count and finite-difference bump sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_time_steps")]
    pub time_steps: usize,
    #[serde(default = "default_num_paths")]
    pub num_paths: usize,
    /// Absolute spot bump for delta and gamma.
    #[serde(default = "default_spot_bump")]
    pub spot_bump: f64,
    /// Absolute volatility bump for vega (0.01 = one vol point).
    #[serde(default = "default_volatility_bump")]
    pub volatility_bump: f64,
    /// Absolute rate bump for rho.
    #[serde(default = "default_rate_bump")]
    pub rate_bump: f64,
}

fn default_time_steps() -> usize {
    100
}

fn default_num_paths() -> usize {
    10_000
}

fn default_spot_bump() -> f64 {
    1.0
}

fn default_volatility_bump() -> f64 {
    0.01
}

fn default_rate_bump() -> f64 {
    0.0001
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_steps: default_time_steps(),
            num_paths: default_num_paths(),
            spot_bump: default_spot_bump(),
            volatility_bump: default_volatility_bump(),
            rate_bump: default_rate_bump(),
        }
    }
}

impl SimulationConfig {
    pub fn new(
        time_steps: usize,
        num_paths: usize,
        spot_bump: f64,
        volatility_bump: f64,
        rate_bump: f64,
    ) -> QuantProResult<Self> {
        let config = Self {
            time_steps,
            num_paths,
            spot_bump,
            volatility_bump,
            rate_bump,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> QuantProResult<()> {
        if self.time_steps < 1 {
            return Err(QuantProError::domain("time_steps", "must be at least 1"));
        }
        if self.num_paths < 1 {
            return Err(QuantProError::domain("num_paths", "must be at least 1"));
        }
        for (field, bump) in [
            ("spot_bump", self.spot_bump),
            ("volatility_bump", self.volatility_bump),
            ("rate_bump", self.rate_bump),
        ] {
            if !(bump.is_finite() && bump > 0.0) {
                return Err(QuantProError::domain(field, "must be positive"));
            }
        }
        Ok(())
    }
}

/// Discounted payoff mean and its standard error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationEstimate {
    pub price: f64,
    pub std_error: f64,
    pub num_paths: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloInput {
    #[serde(flatten)]
    pub market: MarketParameters,
    #[serde(flatten)]
    pub config: SimulationConfig,
    /// Optional seed for reproducibility.
    pub seed: Option<u64>,
    /// Share draws between bumped revaluations instead of drawing afresh.
    #[serde(default)]
    pub common_random_numbers: bool,
    #[serde(default = "default_include_scatter")]
    pub include_scatter: bool,
}

fn default_include_scatter() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloOutput {
    pub call: PricingResult,
    pub put: PricingResult,
    pub call_std_error: f64,
    pub put_std_error: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scatter: Option<Vec<CurvePoint>>,
}

/// Below this path count independent-draw gamma is mostly noise.
const NOISY_GREEKS_PATHS: usize = 10_000;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_inputs(params: &MarketParameters, config: &SimulationConfig) -> QuantProResult<()> {
    config.validate()?;
    for (field, value) in [("spot", params.spot), ("strike", params.strike)] {
        if !(value.is_finite() && value > 0.0) {
            return Err(QuantProError::domain(field, "must be positive"));
        }
    }
    if !(params.volatility.is_finite() && params.volatility >= 0.0) {
        return Err(QuantProError::domain("volatility", "must not be negative"));
    }
    if !(params.tenor.is_finite() && params.tenor >= 0.0) {
        return Err(QuantProError::domain("tenor", "must not be negative"));
    }
    Ok(())
}

fn validate_greek_inputs(params: &MarketParameters, config: &SimulationConfig) -> QuantProResult<()> {
    validate_inputs(params, config)?;
    if params.tenor <= 0.0 {
        return Err(QuantProError::domain(
            "tenor",
            "must be positive; the theta bump is tenor / time_steps",
        ));
    }
    if config.spot_bump >= params.spot {
        return Err(QuantProError::domain(
            "spot_bump",
            "must be smaller than spot so the down-bumped spot stays positive",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

fn estimate<R: Rng>(
    side: OptionSide,
    params: &MarketParameters,
    config: &SimulationConfig,
    rng: &mut R,
) -> SimulationEstimate {
    let spots = simulate_terminal_spots(params, config.time_steps, config.num_paths, rng);
    let discount = params.discount_factor();
    let n = spots.len() as f64;

    let payoffs: Vec<f64> = spots
        .iter()
        .map(|&s| discount * side.payoff(s, params.strike))
        .collect();
    let mean = payoffs.iter().sum::<f64>() / n;
    let std_error = if payoffs.len() > 1 {
        let variance = payoffs.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (n - 1.0);
        (variance / n).sqrt()
    } else {
        0.0
    };

    SimulationEstimate {
        price: mean,
        std_error,
        num_paths: spots.len(),
    }
}

/// Discounted expected payoff with its standard error.
pub fn simulate_estimate<R: Rng>(
    side: OptionSide,
    params: &MarketParameters,
    config: &SimulationConfig,
    rng: &mut R,
) -> QuantProResult<SimulationEstimate> {
    validate_inputs(params, config)?;
    Ok(estimate(side, params, config, rng))
}

/// Monte Carlo price: `e^{-rT} · mean(payoff(S_T))` over `num_paths` paths.
pub fn simulate_price<R: Rng>(
    side: OptionSide,
    params: &MarketParameters,
    config: &SimulationConfig,
    rng: &mut R,
) -> QuantProResult<f64> {
    Ok(simulate_estimate(side, params, config, rng)?.price)
}

// ---------------------------------------------------------------------------
// Bump-and-revalue Greeks
// ---------------------------------------------------------------------------

/// Indices into the revaluation table built by [`simulate_greeks`].
mod reval {
    pub const PRICE: usize = 0;
    pub const DELTA_UP: usize = 1;
    pub const DELTA_BASE: usize = 2;
    pub const GAMMA_UP: usize = 3;
    pub const GAMMA_BASE: usize = 4;
    pub const GAMMA_DOWN: usize = 5;
    pub const THETA_UP: usize = 6;
    pub const THETA_BASE: usize = 7;
    pub const VEGA_UP: usize = 8;
    pub const VEGA_BASE: usize = 9;
    pub const RHO_UP: usize = 10;
    pub const RHO_BASE: usize = 11;
    pub const COUNT: usize = 12;
}

fn revalue_all(
    side: OptionSide,
    scenarios: &[MarketParameters],
    config: &SimulationConfig,
    streams: Vec<StdRng>,
) -> Vec<f64> {
    #[cfg(feature = "parallel")]
    let values: Vec<f64> = scenarios
        .par_iter()
        .zip(streams.into_par_iter())
        .map(|(p, mut rng)| estimate(side, p, config, &mut rng).price)
        .collect();

    #[cfg(not(feature = "parallel"))]
    let values: Vec<f64> = scenarios
        .iter()
        .zip(streams)
        .map(|(p, mut rng)| estimate(side, p, config, &mut rng).price)
        .collect();

    values
}

/// Price and Greeks by finite differences on simulated prices.
///
/// Delta, vega and rho are forward differences, gamma a central second
/// difference over spot, theta a forward difference in tenor with bump
/// `tenor / time_steps`. Every term of every difference is a separate
/// simulation whose stream comes from `draws`: with [`IndependentDraws`] the
/// terms are statistically independent and the Greeks carry the full
/// sampling noise (gamma most of all); [`CommonRandomNumbers`] replays one
/// stream instead.
///
/// Units follow [`PricingResult`]: theta per calendar day (as `-∂V/∂T`),
/// vega and rho per one-point move.
pub fn simulate_greeks<D: DrawStrategy>(
    side: OptionSide,
    params: &MarketParameters,
    config: &SimulationConfig,
    draws: &mut D,
) -> QuantProResult<PricingResult> {
    validate_greek_inputs(params, config)?;

    let h_s = config.spot_bump;
    let h_v = config.volatility_bump;
    let h_r = config.rate_bump;
    let h_t = params.tenor / config.time_steps as f64;

    let mut scenarios = [*params; reval::COUNT];
    scenarios[reval::DELTA_UP] = params.with_spot(params.spot + h_s);
    scenarios[reval::GAMMA_UP] = params.with_spot(params.spot + h_s);
    scenarios[reval::GAMMA_DOWN] = params.with_spot(params.spot - h_s);
    scenarios[reval::THETA_UP] = params.with_tenor(params.tenor + h_t);
    scenarios[reval::VEGA_UP] = params.with_volatility(params.volatility + h_v);
    scenarios[reval::RHO_UP] = params.with_risk_free_rate(params.risk_free_rate + h_r);

    // Streams are drawn in table order before any revaluation runs.
    let streams: Vec<StdRng> = (0..reval::COUNT).map(|_| draws.next_stream()).collect();

    tracing::debug!(
        ?side,
        strategy = draws.name(),
        revaluations = reval::COUNT,
        paths = config.num_paths,
        "bump-and-revalue greeks"
    );

    let v = revalue_all(side, &scenarios, config, streams);

    let delta = (v[reval::DELTA_UP] - v[reval::DELTA_BASE]) / h_s;
    let gamma =
        (v[reval::GAMMA_UP] - 2.0 * v[reval::GAMMA_BASE] + v[reval::GAMMA_DOWN]) / (h_s * h_s);
    let dv_dt = (v[reval::THETA_UP] - v[reval::THETA_BASE]) / h_t;
    let vega = (v[reval::VEGA_UP] - v[reval::VEGA_BASE]) / h_v;
    let rho = (v[reval::RHO_UP] - v[reval::RHO_BASE]) / h_r;

    Ok(PricingResult {
        price: v[reval::PRICE],
        delta,
        gamma,
        theta: -dv_dt / DAYS_PER_YEAR,
        vega: vega / PER_POINT,
        rho: rho / PER_POINT,
    })
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

/// One point per simulated path: terminal spot with the call and put payoff
/// there, sorted ascending by spot. For plotting only.
pub fn simulation_scatter<R: Rng>(
    params: &MarketParameters,
    config: &SimulationConfig,
    rng: &mut R,
) -> QuantProResult<Vec<CurvePoint>> {
    validate_inputs(params, config)?;
    let mut spots = simulate_terminal_spots(params, config.time_steps, config.num_paths, rng);
    spots.sort_by(f64::total_cmp);
    Ok(spots
        .into_iter()
        .map(|spot| CurvePoint {
            spot,
            call: OptionSide::Call.payoff(spot, params.strike),
            put: OptionSide::Put.payoff(spot, params.strike),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Public API: full Monte Carlo report
// ---------------------------------------------------------------------------

/// Price and Greeks for both sides plus the terminal-spot scatter.
pub fn run_monte_carlo_pricing(
    input: &MonteCarloInput,
) -> QuantProResult<ComputationOutput<MonteCarloOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let params = &input.market;
    let config = &input.config;

    validate_greek_inputs(params, config)?;

    let mut rng = match input.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let mut results = Vec::with_capacity(2);
    for side in OptionSide::BOTH {
        let est = estimate(side, params, config, &mut rng);
        let greeks = if input.common_random_numbers {
            simulate_greeks(side, params, config, &mut CommonRandomNumbers::new(rng.gen()))?
        } else {
            simulate_greeks(side, params, config, &mut IndependentDraws::seeded(rng.gen()))?
        };
        results.push((
            PricingResult {
                price: est.price,
                ..greeks
            },
            est.std_error,
        ));
    }
    let (put, put_std_error) = results[1];
    let (call, call_std_error) = results[0];

    let scatter = if input.include_scatter {
        Some(simulation_scatter(params, config, &mut rng)?)
    } else {
        None
    };

    if params.volatility == 0.0 {
        warnings.push("Zero volatility: every path follows the deterministic drift".into());
    }
    if !input.common_random_numbers && config.num_paths < NOISY_GREEKS_PATHS {
        warnings.push(format!(
            "Greeks use independent draws per bump with only {} paths; gamma in particular is noisy",
            config.num_paths
        ));
    }

    let output = MonteCarloOutput {
        call,
        put,
        call_std_error,
        put_std_error,
        scatter,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Monte Carlo (risk-neutral GBM, bump-and-revalue Greeks)",
        &serde_json::json!({
            "spot": params.spot,
            "strike": params.strike,
            "volatility": params.volatility,
            "risk_free_rate": params.risk_free_rate,
            "dividend_yield": params.dividend_yield,
            "tenor": params.tenor,
            "time_steps": config.time_steps,
            "num_paths": config.num_paths,
            "spot_bump": config.spot_bump,
            "volatility_bump": config.volatility_bump,
            "rate_bump": config.rate_bump,
            "seed": input.seed,
            "draws": if input.common_random_numbers { "common_random_numbers" } else { "independent" },
        }),
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
