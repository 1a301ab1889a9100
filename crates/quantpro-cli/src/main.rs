mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::black_scholes::BlackScholesArgs;
use commands::monte_carlo::MonteCarloArgs;
use commands::volatility::VolatilityArgs;

/// European option pricing and risk
#[derive(Parser)]
#[command(
    name = "quantpro",
    version,
    about = "European option pricing, Greeks and historical volatility",
    long_about = "Prices European calls and puts with the closed-form Black-Scholes model \
                  or a Monte Carlo simulation, reports price and Greeks for both sides, \
                  and estimates historical volatility from a price series."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "quantpro_core=trace")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate historical volatility from a price series
    Volatility(VolatilityArgs),
    /// Closed-form Black-Scholes price, Greeks and price curve
    BlackScholes(BlackScholesArgs),
    /// Monte Carlo price, finite-difference Greeks and terminal scatter
    MonteCarlo(MonteCarloArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Volatility(args) => commands::volatility::run_volatility(args),
        Commands::BlackScholes(args) => commands::black_scholes::run_black_scholes(args),
        Commands::MonteCarlo(args) => commands::monte_carlo::run_monte_carlo(args),
        Commands::Version => {
            println!("quantpro {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
