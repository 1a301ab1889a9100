use pretty_assertions::assert_eq;
use quantpro_core::analytic::black_scholes::{
    analytic_curve, analytic_price, price_european_options, BlackScholesInput,
};
use quantpro_core::{MarketParameters, OptionSide, QuantProError};

fn grid() -> Vec<MarketParameters> {
    let mut out = Vec::new();
    for &spot in &[50.0, 90.0, 100.0, 110.0, 200.0] {
        for &vol in &[0.05, 0.2, 0.6] {
            for &tenor in &[0.02, 0.5, 3.0] {
                for &(rate, div) in &[(0.0, 0.0), (0.05, 0.0), (0.03, 0.02), (0.0005, 0.0056)] {
                    out.push(MarketParameters::new(spot, 100.0, vol, rate, div, tenor));
                }
            }
        }
    }
    out
}

// ===========================================================================
// Reference values
// ===========================================================================

#[test]
fn test_aapl_deep_out_of_the_money_scenario() {
    // AAPL at 148.19, strike 160.2, 0.76% vol, 0.05% rate, 0.56% yield, 1y
    let p = MarketParameters::new(148.19, 160.2, 0.0076, 0.0005, 0.0056, 1.0);
    let call = analytic_price(OptionSide::Call, &p).unwrap();
    let put = analytic_price(OptionSide::Put, &p).unwrap();
    assert!(call.price.abs() < 1e-9, "call={}", call.price);
    assert!((put.price - 12.757).abs() < 0.001, "put={}", put.price);
}

#[test]
fn test_hull_dividend_example() {
    // Hull 17.4 style: S=K=100, r=5%, q=3%, sigma=25%, T=0.5
    let p = MarketParameters::new(100.0, 100.0, 0.25, 0.05, 0.03, 0.5);
    let call = analytic_price(OptionSide::Call, &p).unwrap();
    let put = analytic_price(OptionSide::Put, &p).unwrap();
    let parity = call.price - put.price;
    assert!((parity - p.forward_value()).abs() < 1e-10);
    assert!(call.price > 7.0 && call.price < 7.5, "call={}", call.price);
}

// ===========================================================================
// Invariants over a parameter grid
// ===========================================================================

#[test]
fn test_put_call_parity_over_grid() {
    for p in grid() {
        let call = analytic_price(OptionSide::Call, &p).unwrap().price;
        let put = analytic_price(OptionSide::Put, &p).unwrap().price;
        let gap = (call - put) - p.forward_value();
        assert!(gap.abs() < 1e-9 * p.spot.max(p.strike), "gap={gap} for {p:?}");
    }
}

#[test]
fn test_delta_bounds_over_grid() {
    for p in grid() {
        let call = analytic_price(OptionSide::Call, &p).unwrap();
        let put = analytic_price(OptionSide::Put, &p).unwrap();
        assert!((0.0..=1.0).contains(&call.delta), "call delta={} for {p:?}", call.delta);
        assert!((-1.0..=0.0).contains(&put.delta), "put delta={} for {p:?}", put.delta);
    }
}

#[test]
fn test_gamma_vega_symmetry_over_grid() {
    for p in grid() {
        let call = analytic_price(OptionSide::Call, &p).unwrap();
        let put = analytic_price(OptionSide::Put, &p).unwrap();
        assert_eq!(call.gamma, put.gamma);
        assert_eq!(call.vega, put.vega);
        assert!(call.gamma >= 0.0 && call.vega >= 0.0);
    }
}

// ===========================================================================
// Domain rejection
// ===========================================================================

#[test]
fn test_domain_errors_raised_before_pricing() {
    let p = MarketParameters::new(100.0, 100.0, 0.2, 0.05, 0.0, 1.0);
    for bad in [p.with_volatility(0.0), p.with_volatility(-0.1), p.with_tenor(0.0), p.with_tenor(-1.0)] {
        for side in OptionSide::BOTH {
            let err = analytic_price(side, &bad).unwrap_err();
            assert!(matches!(err, QuantProError::DomainError { .. }), "{bad:?}");
        }
        assert!(analytic_curve(&bad, 0.5).is_err());
    }
}

// ===========================================================================
// Curve and envelope
// ===========================================================================

#[test]
fn test_curve_points_match_point_prices() {
    let p = MarketParameters::new(80.0, 85.0, 0.3, 0.02, 0.01, 0.75);
    let curve = analytic_curve(&p, 2.0).unwrap();
    assert_eq!(curve.len(), 41);
    for pt in curve.iter().step_by(7) {
        let at = p.with_spot(pt.spot);
        assert_eq!(pt.call, analytic_price(OptionSide::Call, &at).unwrap().price);
        assert_eq!(pt.put, analytic_price(OptionSide::Put, &at).unwrap().price);
    }
}

#[test]
fn test_envelope_from_json() {
    let json = r#"{
        "spot": 100.0, "strike": 95.0, "volatility": 0.2,
        "risk_free_rate": 0.01, "dividend_yield": 0.0, "tenor": 0.25
    }"#;
    let input: BlackScholesInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.grid_step, 0.5);
    let out = price_european_options(&input).unwrap();
    assert!(out.warnings.is_empty());
    assert_eq!(out.methodology, "Black-Scholes (continuous dividend yield)");
    assert_eq!(out.result.curve.len(), 201);
    assert!(out.result.call.price > out.result.put.price);
}
