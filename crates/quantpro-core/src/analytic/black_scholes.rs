use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use std::time::Instant;

use crate::error::QuantProError;
use crate::types::*;
use crate::QuantProResult;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackScholesInput {
    #[serde(flatten)]
    pub market: MarketParameters,
    /// Spacing of the price-vs-spot curve.
    #[serde(default = "default_grid_step")]
    pub grid_step: f64,
}

fn default_grid_step() -> f64 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackScholesOutput {
    pub call: PricingResult,
    pub put: PricingResult,
    /// `(C - P) - (S·e^{-qT} - K·e^{-rT})`; zero up to rounding.
    pub put_call_parity_gap: f64,
    pub curve: Vec<CurvePoint>,
}

/// Prices below this are reported as effectively worthless.
const WORTHLESS_THRESHOLD: f64 = 1e-8;

/// Upper bound on curve nodes; finer grids are rejected before allocating.
pub const MAX_CURVE_POINTS: usize = 1_000_000;

// ---------------------------------------------------------------------------
// Normal distribution helpers
// ---------------------------------------------------------------------------

#[inline]
fn norm_cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}

#[inline]
fn norm_pdf(x: f64) -> f64 {
    Normal::standard().pdf(x)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_market(params: &MarketParameters) -> QuantProResult<()> {
    for (field, value) in [("spot", params.spot), ("strike", params.strike)] {
        if !(value.is_finite() && value > 0.0) {
            return Err(QuantProError::domain(field, "must be positive"));
        }
    }
    if !(params.volatility.is_finite() && params.volatility > 0.0) {
        return Err(QuantProError::domain(
            "volatility",
            "must be positive for the closed-form model",
        ));
    }
    if !(params.tenor.is_finite() && params.tenor > 0.0) {
        return Err(QuantProError::domain(
            "tenor",
            "must be positive for the closed-form model",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Black-Scholes internals
// ---------------------------------------------------------------------------

struct BsTerms {
    d1: f64,
    d2: f64,
    sqrt_t: f64,
    exp_neg_qt: f64,
    exp_neg_rt: f64,
}

fn compute_terms(params: &MarketParameters) -> BsTerms {
    let MarketParameters {
        spot: s,
        strike: k,
        volatility: sigma,
        risk_free_rate: r,
        dividend_yield: q,
        tenor: t,
    } = *params;

    let sqrt_t = t.sqrt();
    let sigma_sqrt_t = sigma * sqrt_t;
    let d1 = ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / sigma_sqrt_t;
    BsTerms {
        d1,
        d2: d1 - sigma_sqrt_t,
        sqrt_t,
        exp_neg_qt: (-q * t).exp(),
        exp_neg_rt: (-r * t).exp(),
    }
}

fn bs_price(side: OptionSide, params: &MarketParameters, terms: &BsTerms) -> f64 {
    let s_fwd = params.spot * terms.exp_neg_qt;
    let k_disc = params.strike * terms.exp_neg_rt;
    match side {
        OptionSide::Call => s_fwd * norm_cdf(terms.d1) - k_disc * norm_cdf(terms.d2),
        OptionSide::Put => k_disc * norm_cdf(-terms.d2) - s_fwd * norm_cdf(-terms.d1),
    }
}

fn bs_result(side: OptionSide, params: &MarketParameters, terms: &BsTerms) -> PricingResult {
    let MarketParameters {
        spot: s,
        strike: k,
        volatility: sigma,
        risk_free_rate: r,
        dividend_yield: q,
        tenor: t,
    } = *params;
    let nd1 = norm_pdf(terms.d1);
    let sigma_sqrt_t = sigma * terms.sqrt_t;

    // Gamma and vega do not depend on the side.
    let gamma = terms.exp_neg_qt * nd1 / (s * sigma_sqrt_t);
    let vega = s * terms.sqrt_t * terms.exp_neg_qt * nd1 / PER_POINT;
    let decay = -s * sigma * terms.exp_neg_qt * nd1 / (2.0 * terms.sqrt_t);

    let (delta, theta_annual, rho) = match side {
        OptionSide::Call => (
            terms.exp_neg_qt * norm_cdf(terms.d1),
            decay - r * k * terms.exp_neg_rt * norm_cdf(terms.d2)
                + q * s * terms.exp_neg_qt * norm_cdf(terms.d1),
            k * t * terms.exp_neg_rt * norm_cdf(terms.d2),
        ),
        OptionSide::Put => (
            -terms.exp_neg_qt * norm_cdf(-terms.d1),
            decay + r * k * terms.exp_neg_rt * norm_cdf(-terms.d2)
                - q * s * terms.exp_neg_qt * norm_cdf(-terms.d1),
            -k * t * terms.exp_neg_rt * norm_cdf(-terms.d2),
        ),
    };

    PricingResult {
        price: bs_price(side, params, terms),
        delta,
        gamma,
        theta: theta_annual / DAYS_PER_YEAR,
        vega,
        rho: rho / PER_POINT,
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Closed-form Black-Scholes price and Greeks of a European option with a
/// continuous dividend yield.
///
/// Fails with a domain error when volatility or tenor is not strictly
/// positive, since `d1` divides by `σ√T`.
pub fn analytic_price(side: OptionSide, params: &MarketParameters) -> QuantProResult<PricingResult> {
    validate_market(params)?;
    let terms = compute_terms(params);
    Ok(bs_result(side, params, &terms))
}

/// Call and put prices on a spot grid running from `S/2` to `3S/2`.
///
/// The grid starts at `S/2` and advances by `grid_step`; the upper bound is
/// included when a grid node lands on it. Steps that would produce more than
/// [`MAX_CURVE_POINTS`] points are rejected.
pub fn analytic_curve(params: &MarketParameters, grid_step: f64) -> QuantProResult<Vec<CurvePoint>> {
    validate_market(params)?;
    if !(grid_step.is_finite() && grid_step > 0.0) {
        return Err(QuantProError::domain("grid_step", "must be positive"));
    }

    let lower = params.spot / 2.0;
    let width = params.spot;
    let nodes = (width / grid_step + 1e-9).floor();
    if !(nodes < MAX_CURVE_POINTS as f64) {
        return Err(QuantProError::domain(
            "grid_step",
            format!("too fine: the curve would exceed {MAX_CURVE_POINTS} points"),
        ));
    }
    let nodes = nodes as usize;

    let curve = (0..=nodes)
        .map(|i| {
            let bumped = params.with_spot(lower + i as f64 * grid_step);
            let terms = compute_terms(&bumped);
            CurvePoint {
                spot: bumped.spot,
                call: bs_price(OptionSide::Call, &bumped, &terms),
                put: bs_price(OptionSide::Put, &bumped, &terms),
            }
        })
        .collect();
    Ok(curve)
}

/// Price both sides, check put-call parity and build the plotting curve.
pub fn price_european_options(
    input: &BlackScholesInput,
) -> QuantProResult<ComputationOutput<BlackScholesOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let params = &input.market;

    let call = analytic_price(OptionSide::Call, params)?;
    let put = analytic_price(OptionSide::Put, params)?;
    let curve = analytic_curve(params, input.grid_step)?;

    for (label, result) in [("call", &call), ("put", &put)] {
        if result.price < WORTHLESS_THRESHOLD {
            warnings.push(format!(
                "{label} is deep out of the money; price and Greeks are effectively zero"
            ));
        }
    }

    let output = BlackScholesOutput {
        put_call_parity_gap: (call.price - put.price) - params.forward_value(),
        call,
        put,
        curve,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Black-Scholes (continuous dividend yield)",
        &serde_json::json!({
            "spot": params.spot,
            "strike": params.strike,
            "volatility": params.volatility,
            "risk_free_rate": params.risk_free_rate,
            "dividend_yield": params.dividend_yield,
            "tenor": params.tenor,
            "grid_step": input.grid_step,
            "theta_units": "per calendar day",
            "vega_rho_units": "per 1% move",
        }),
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
