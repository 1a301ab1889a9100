use clap::Args;
use serde_json::Value;

use quantpro_core::monte_carlo::engine::{self, MonteCarloInput, SimulationConfig};
use quantpro_core::MarketParameters;

use crate::input;

/// Arguments for Monte Carlo option pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct MonteCarloArgs {
    /// Spot price of the underlying
    #[arg(long)]
    pub spot: Option<f64>,

    /// Strike price
    #[arg(long)]
    pub strike: Option<f64>,

    /// Annualized volatility (e.g. 0.2 for 20%)
    #[arg(long, alias = "vol")]
    pub volatility: Option<f64>,

    /// Continuously compounded risk-free rate
    #[arg(long, alias = "rate")]
    pub risk_free_rate: Option<f64>,

    /// Continuous dividend yield
    #[arg(long, default_value = "0")]
    pub dividend_yield: f64,

    /// Time to expiry in years
    #[arg(long)]
    pub tenor: Option<f64>,

    /// Time steps per path
    #[arg(long)]
    pub time_steps: Option<usize>,

    /// Number of simulated paths
    #[arg(long, alias = "paths")]
    pub num_paths: Option<usize>,

    /// Spot bump for delta and gamma
    #[arg(long)]
    pub spot_bump: Option<f64>,

    /// Volatility bump for vega
    #[arg(long)]
    pub volatility_bump: Option<f64>,

    /// Rate bump for rho
    #[arg(long)]
    pub rate_bump: Option<f64>,

    /// Seed for reproducible results
    #[arg(long)]
    pub seed: Option<u64>,

    /// Reuse the same draws for every bumped revaluation
    #[arg(long)]
    pub common_random_numbers: bool,

    /// Leave the per-path scatter out of the output
    #[arg(long)]
    pub no_scatter: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn config_from_args(args: &MonteCarloArgs) -> SimulationConfig {
    let defaults = SimulationConfig::default();
    SimulationConfig {
        time_steps: args.time_steps.unwrap_or(defaults.time_steps),
        num_paths: args.num_paths.unwrap_or(defaults.num_paths),
        spot_bump: args.spot_bump.unwrap_or(defaults.spot_bump),
        volatility_bump: args.volatility_bump.unwrap_or(defaults.volatility_bump),
        rate_bump: args.rate_bump.unwrap_or(defaults.rate_bump),
    }
}

pub fn run_monte_carlo(args: MonteCarloArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mc_input: MonteCarloInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        MonteCarloInput {
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
            config: config_from_args(&args),
            seed: args.seed,
            common_random_numbers: args.common_random_numbers,
            include_scatter: !args.no_scatter,
        }
    };

    let result = engine::run_monte_carlo_pricing(&mc_input)?;
    Ok(serde_json::to_value(result)?)
}
