use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::QuantProError;
use crate::types::{with_metadata, ComputationOutput};
use crate::QuantProResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which part of the supplied price history feeds the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "count")]
pub enum ObservationWindow {
    /// Every supplied price.
    #[default]
    Full,
    /// The first `n` prices of the series.
    Earliest(usize),
    /// The last `n` prices of the series.
    Latest(usize),
}

impl ObservationWindow {
    /// Slice of `prices` covered by this window. Windows longer than the
    /// history cover the whole history.
    pub fn apply<'a>(&self, prices: &'a [f64]) -> &'a [f64] {
        match *self {
            ObservationWindow::Full => prices,
            ObservationWindow::Earliest(n) => &prices[..n.min(prices.len())],
            ObservationWindow::Latest(n) => &prices[prices.len().saturating_sub(n)..],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalVolInput {
    /// Prices ordered oldest first.
    pub prices: Vec<f64>,
    #[serde(default)]
    pub window: ObservationWindow,
    /// Sampling frequency used to annualize, e.g. 252 for daily closes.
    pub periods_per_year: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalVolOutput {
    /// Per-period sample standard deviation of log returns.
    pub volatility: f64,
    pub annualized_volatility: Option<f64>,
    pub observations_used: usize,
    pub returns_used: usize,
    pub mean_log_return: f64,
}

struct ReturnStats {
    mean: f64,
    std_dev: f64,
    count: usize,
}

// ---------------------------------------------------------------------------
// Core estimator
// ---------------------------------------------------------------------------

fn log_return_stats(prices: &[f64]) -> QuantProResult<ReturnStats> {
    if prices.len() < 2 {
        return Err(QuantProError::InsufficientData(format!(
            "At least 2 prices are required, got {}",
            prices.len()
        )));
    }
    if let Some(bad) = prices.iter().find(|p| !p.is_finite() || **p <= 0.0) {
        return Err(QuantProError::domain(
            "prices",
            format!("log return undefined for price {bad}"),
        ));
    }

    let returns: Vec<f64> = prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    let n = returns.len();
    let mean = returns.iter().sum::<f64>() / n as f64;

    // A single return has no dispersion to measure.
    let std_dev = if n < 2 {
        0.0
    } else {
        let ss = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>();
        (ss / (n - 1) as f64).sqrt()
    };

    Ok(ReturnStats {
        mean,
        std_dev,
        count: n,
    })
}

/// Sample standard deviation of consecutive log returns over `window`.
///
/// The figure is per sampling period; see [`annualize`] to scale it. A
/// constant series yields exactly zero.
///
/// When the window leaves exactly two prices there is a single return and the
/// `n - 1` sample deviation is undefined; the estimate is reported as `0.0`
/// rather than an error. [`calculate_historical_volatility`] attaches a
/// warning in that case.
pub fn estimate_volatility(prices: &[f64], window: ObservationWindow) -> QuantProResult<f64> {
    let windowed = window.apply(prices);
    tracing::trace!(
        supplied = prices.len(),
        used = windowed.len(),
        ?window,
        "estimating historical volatility"
    );
    Ok(log_return_stats(windowed)?.std_dev)
}

/// Scale a per-period volatility by `sqrt(periods_per_year)`.
pub fn annualize(volatility: f64, periods_per_year: f64) -> QuantProResult<f64> {
    if !(periods_per_year.is_finite() && periods_per_year > 0.0) {
        return Err(QuantProError::domain(
            "periods_per_year",
            "must be positive",
        ));
    }
    Ok(volatility * periods_per_year.sqrt())
}

// ---------------------------------------------------------------------------
// Public API: envelope
// ---------------------------------------------------------------------------

/// Estimate historical volatility and report exactly which observations
/// were used.
pub fn calculate_historical_volatility(
    input: &HistoricalVolInput,
) -> QuantProResult<ComputationOutput<HistoricalVolOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let windowed = input.window.apply(&input.prices);
    let stats = log_return_stats(windowed)?;

    let annualized_volatility = match input.periods_per_year {
        Some(periods) => Some(annualize(stats.std_dev, periods)?),
        None => None,
    };

    if windowed.len() < input.prices.len() {
        warnings.push(format!(
            "{} of {} supplied prices excluded by the {:?} window",
            input.prices.len() - windowed.len(),
            input.prices.len(),
            input.window
        ));
    }
    if stats.count < 2 {
        warnings.push("Only one log return available; volatility reported as 0".into());
    }

    let output = HistoricalVolOutput {
        volatility: stats.std_dev,
        annualized_volatility,
        observations_used: windowed.len(),
        returns_used: stats.count,
        mean_log_return: stats.mean,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Historical volatility (sample std dev of log returns)",
        &serde_json::json!({
            "window": input.window,
            "prices_supplied": input.prices.len(),
            "periods_per_year": input.periods_per_year,
        }),
        warnings,
        elapsed,
        output,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
