use clap::Args;
use serde_json::Value;

use quantpro_core::analytic::black_scholes::{self, BlackScholesInput};
use quantpro_core::MarketParameters;

use crate::input;

/// Arguments for closed-form option pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BlackScholesArgs {
    /// Spot price of the underlying
    #[arg(long)]
    pub spot: Option<f64>,

    /// Strike price
    #[arg(long)]
    pub strike: Option<f64>,

    /// Annualized volatility (e.g. 0.2 for 20%)
    #[arg(long, alias = "vol")]
    pub volatility: Option<f64>,

    /// Continuously compounded risk-free rate (e.g. 0.05 for 5%)
    #[arg(long, alias = "rate")]
    pub risk_free_rate: Option<f64>,

    /// Continuous dividend yield
    #[arg(long, default_value = "0")]
    pub dividend_yield: f64,

    /// Time to expiry in years
    #[arg(long)]
    pub tenor: Option<f64>,

    /// Spot spacing of the price curve
    #[arg(long, default_value = "0.5")]
    pub grid_step: f64,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_black_scholes(args: BlackScholesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bs_input: BlackScholesInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        BlackScholesInput {
            market: MarketParameters {
                spot: args.spot.ok_or("--spot is required (or provide --input)")?,
                strike: args.strike.ok_or("--strike is required (or provide --input)")?,
                volatility: args
                    .volatility
                    .ok_or("--volatility is required (or provide --input)")?,
                risk_free_rate: args
                    .risk_free_rate
                    .ok_or("--risk-free-rate is required (or provide --input)")?,
                dividend_yield: args.dividend_yield,
                tenor: args.tenor.ok_or("--tenor is required (or provide --input)")?,
            },
            grid_step: args.grid_step,
        }
    };

    let result = black_scholes::price_european_options(&bs_input)?;
    Ok(serde_json::to_value(result)?)
}
