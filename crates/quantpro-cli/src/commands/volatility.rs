use clap::{Args, ValueEnum};
use serde_json::Value;

use quantpro_core::volatility::historical::{self, HistoricalVolInput, ObservationWindow};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WindowKind {
    /// Every supplied price
    Full,
    /// The first --count prices
    Earliest,
    /// The last --count prices
    Latest,
}

/// Arguments for historical volatility
#[derive(Args)]
pub struct VolatilityArgs {
    /// Comma-separated prices, oldest first
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub prices: Option<Vec<f64>>,

    /// CSV file with a header row holding the price history
    #[arg(long)]
    pub prices_csv: Option<String>,

    /// Column of --prices-csv to read (default "Close")
    #[arg(long)]
    pub column: Option<String>,

    /// Which part of the history to use
    #[arg(long, value_enum, default_value = "full")]
    pub window: WindowKind,

    /// Number of prices for the earliest/latest window
    #[arg(long)]
    pub count: Option<usize>,

    /// Annualize with this many periods per year (e.g. 252 for daily closes)
    #[arg(long)]
    pub periods_per_year: Option<f64>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn window_from_args(kind: WindowKind, count: Option<usize>) -> Result<ObservationWindow, String> {
    match (kind, count) {
        (WindowKind::Full, _) => Ok(ObservationWindow::Full),
        (WindowKind::Earliest, Some(n)) => Ok(ObservationWindow::Earliest(n)),
        (WindowKind::Latest, Some(n)) => Ok(ObservationWindow::Latest(n)),
        (_, None) => Err("--count is required for an earliest/latest window".into()),
    }
}

pub fn run_volatility(args: VolatilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let vol_input: HistoricalVolInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        let prices = match (args.prices, args.prices_csv) {
            (Some(p), _) => p,
            (None, Some(path)) => input::file::read_price_column(&path, args.column.as_deref())?,
            (None, None) => {
                return Err("--prices, --prices-csv, --input <file.json> or stdin required".into())
            }
        };
        HistoricalVolInput {
            prices,
            window: window_from_args(args.window, args.count)?,
            periods_per_year: args.periods_per_year,
        }
    };

    let result = historical::calculate_historical_volatility(&vol_input)?;
    Ok(serde_json::to_value(result)?)
}
