use serde::{Deserialize, Serialize};

use crate::QuantProResult;

/// Calendar days used to express theta per day.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Vega and rho are quoted per one point (1%) move.
pub const PER_POINT: f64 = 100.0;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionSide {
    Call,
    Put,
}

impl OptionSide {
    pub const BOTH: [OptionSide; 2] = [OptionSide::Call, OptionSide::Put];

    /// Exercise value at maturity for a terminal spot.
    #[inline]
    pub fn payoff(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionSide::Call => (spot - strike).max(0.0),
            OptionSide::Put => (strike - spot).max(0.0),
        }
    }
}

/// Market inputs shared by both pricers. All rates are decimals (0.05 = 5%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParameters {
    pub spot: f64,
    pub strike: f64,
    /// Annualized volatility.
    pub volatility: f64,
    pub risk_free_rate: f64,
    #[serde(default)]
    pub dividend_yield: f64,
    /// Time to expiry in years.
    pub tenor: f64,
}

impl MarketParameters {
    pub fn new(
        spot: f64,
        strike: f64,
        volatility: f64,
        risk_free_rate: f64,
        dividend_yield: f64,
        tenor: f64,
    ) -> Self {
        Self {
            spot,
            strike,
            volatility,
            risk_free_rate,
            dividend_yield,
            tenor,
        }
    }

    pub fn with_spot(&self, spot: f64) -> Self {
        Self { spot, ..*self }
    }

    pub fn with_volatility(&self, volatility: f64) -> Self {
        Self { volatility, ..*self }
    }

    pub fn with_risk_free_rate(&self, risk_free_rate: f64) -> Self {
        Self {
            risk_free_rate,
            ..*self
        }
    }

    pub fn with_tenor(&self, tenor: f64) -> Self {
        Self { tenor, ..*self }
    }

    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.risk_free_rate * self.tenor).exp()
    }

    /// `S·e^{-qT} - K·e^{-rT}`, the value of a long call / short put pair.
    pub fn forward_value(&self) -> f64 {
        self.spot * (-self.dividend_yield * self.tenor).exp() - self.strike * self.discount_factor()
    }
}

/// Price and Greeks for one option side.
///
/// Theta is per calendar day, vega per vol point and rho per rate point,
/// whichever pricer produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PricingResult {
    pub price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

/// One point of a plotting series, ordered by spot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub spot: f64,
    pub call: f64,
    pub put: f64,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> QuantProResult<ComputationOutput<T>> {
    Ok(ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions)?,
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    })
}
