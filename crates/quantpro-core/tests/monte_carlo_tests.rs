use pretty_assertions::assert_eq;
use quantpro_core::analytic::black_scholes::analytic_price;
use quantpro_core::monte_carlo::draws::{CommonRandomNumbers, IndependentDraws};
use quantpro_core::monte_carlo::engine::{
    simulate_estimate, simulate_greeks, simulate_price, simulation_scatter, SimulationConfig,
};
use quantpro_core::{MarketParameters, OptionSide, QuantProError};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SEED: u64 = 42;

fn mid() -> MarketParameters {
    MarketParameters::new(100.0, 100.0, 0.20, 0.05, 0.01, 1.0)
}

fn config(time_steps: usize, num_paths: usize) -> SimulationConfig {
    SimulationConfig::new(time_steps, num_paths, 1.0, 0.01, 0.0001).unwrap()
}

// ===========================================================================
// Convergence to the closed form
// ===========================================================================

#[test]
fn test_price_within_one_percent_at_200k_paths() {
    for side in OptionSide::BOTH {
        let exact = analytic_price(side, &mid()).unwrap().price;
        let mut rng = StdRng::seed_from_u64(SEED);
        let mc = simulate_price(side, &mid(), &config(4, 200_000), &mut rng).unwrap();
        let rel = (mc - exact).abs() / exact;
        assert!(rel < 0.01, "{side:?}: mc={mc}, exact={exact}, rel={rel}");
    }
}

#[test]
fn test_error_shrinks_with_path_count() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let small = simulate_estimate(OptionSide::Call, &mid(), &config(2, 2_000), &mut rng).unwrap();
    let large = simulate_estimate(OptionSide::Call, &mid(), &config(2, 128_000), &mut rng).unwrap();
    // Standard error scales with 1/sqrt(n): 64x the paths, ~8x smaller
    let ratio = small.std_error / large.std_error;
    assert!(ratio > 6.0 && ratio < 10.0, "ratio={ratio}");

    let exact = analytic_price(OptionSide::Call, &mid()).unwrap().price;
    assert!((large.price - exact).abs() < 4.0 * large.std_error);
}

#[test]
fn test_out_of_the_money_put_converges() {
    let p = MarketParameters::new(100.0, 80.0, 0.3, 0.02, 0.0, 0.5);
    let exact = analytic_price(OptionSide::Put, &p).unwrap().price;
    let mut rng = StdRng::seed_from_u64(SEED);
    let est = simulate_estimate(OptionSide::Put, &p, &config(8, 100_000), &mut rng).unwrap();
    assert!(
        (est.price - exact).abs() < 4.0 * est.std_error,
        "mc={}, exact={exact}, se={}",
        est.price,
        est.std_error
    );
}

// ===========================================================================
// Greeks
// ===========================================================================

#[test]
fn test_common_random_numbers_greeks_track_closed_form() {
    let p = MarketParameters::new(100.0, 100.0, 0.20, 0.05, 0.0, 1.0);
    let exact = analytic_price(OptionSide::Call, &p).unwrap();
    let mut draws = CommonRandomNumbers::new(SEED);
    let mc = simulate_greeks(OptionSide::Call, &p, &config(10, 40_000), &mut draws).unwrap();

    assert!((mc.delta - exact.delta).abs() < 0.03, "delta mc={} bs={}", mc.delta, exact.delta);
    assert!((mc.gamma - exact.gamma).abs() < 0.005, "gamma mc={} bs={}", mc.gamma, exact.gamma);
    assert!((mc.vega - exact.vega).abs() < 0.03, "vega mc={} bs={}", mc.vega, exact.vega);
    assert!((mc.rho - exact.rho).abs() < 0.03, "rho mc={} bs={}", mc.rho, exact.rho);
    assert!((mc.theta - exact.theta).abs() < 0.003, "theta mc={} bs={}", mc.theta, exact.theta);
}

#[test]
fn test_common_random_numbers_put_delta_sign() {
    let mut draws = CommonRandomNumbers::new(SEED);
    let mc = simulate_greeks(OptionSide::Put, &mid(), &config(1, 40_000), &mut draws).unwrap();
    assert!(mc.delta < 0.0 && mc.delta > -1.0, "delta={}", mc.delta);
    assert!(mc.rho < 0.0, "rho={}", mc.rho);
}

#[test]
fn test_independent_draws_delta_is_noisy_but_bounded() {
    let mut draws = IndependentDraws::seeded(SEED);
    let mc = simulate_greeks(OptionSide::Call, &mid(), &config(1, 100_000), &mut draws).unwrap();
    assert!(mc.delta > 0.3 && mc.delta < 1.0, "delta={}", mc.delta);
    assert!(mc.gamma.is_finite());
    assert!(mc.price > 8.0 && mc.price < 12.0, "price={}", mc.price);
}

#[test]
fn test_common_random_numbers_share_the_base_price() {
    // Every unbumped revaluation replays the same draws, so the price equals a
    // direct simulation from the same seed.
    let c = config(3, 5_000);
    let mut draws = CommonRandomNumbers::new(SEED);
    let greeks = simulate_greeks(OptionSide::Call, &mid(), &c, &mut draws).unwrap();
    let direct = simulate_price(OptionSide::Call, &mid(), &c, &mut StdRng::seed_from_u64(SEED)).unwrap();
    assert_eq!(greeks.price, direct);
}

// ===========================================================================
// Domain rejection
// ===========================================================================

#[test]
fn test_zero_steps_or_paths_rejected() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let zero_steps = SimulationConfig {
        time_steps: 0,
        ..SimulationConfig::default()
    };
    let zero_paths = SimulationConfig {
        num_paths: 0,
        ..SimulationConfig::default()
    };
    for c in [zero_steps, zero_paths] {
        let err = simulate_price(OptionSide::Call, &mid(), &c, &mut rng).unwrap_err();
        assert!(matches!(err, QuantProError::DomainError { .. }));
        assert!(simulation_scatter(&mid(), &c, &mut rng).is_err());
        assert!(simulate_greeks(OptionSide::Put, &mid(), &c, &mut IndependentDraws::seeded(1)).is_err());
    }
}

#[test]
fn test_zero_volatility_tolerated() {
    let p = mid().with_volatility(0.0);
    let mut rng = StdRng::seed_from_u64(SEED);
    let price = simulate_price(OptionSide::Call, &p, &config(5, 100), &mut rng).unwrap();
    assert!((price - p.forward_value().max(0.0)).abs() < 1e-9, "price={price}");
}

// ===========================================================================
// Scatter
// ===========================================================================

#[test]
fn test_scatter_reproducible_and_sorted() {
    let c = config(6, 9_000);
    let a = simulation_scatter(&mid(), &c, &mut StdRng::seed_from_u64(SEED)).unwrap();
    let b = simulation_scatter(&mid(), &c, &mut StdRng::seed_from_u64(SEED)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 9_000);
    assert!(a.windows(2).all(|w| w[0].spot <= w[1].spot));
    assert!(a.iter().all(|pt| pt.call == 0.0 || pt.put == 0.0));
}
