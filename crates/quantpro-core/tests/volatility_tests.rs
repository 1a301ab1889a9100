use pretty_assertions::assert_eq;
use quantpro_core::volatility::historical::{
    annualize, calculate_historical_volatility, estimate_volatility, HistoricalVolInput,
    ObservationWindow,
};
use quantpro_core::QuantProError;

#[test]
fn test_constant_twenty_closes() {
    let prices = vec![3.0; 20];
    for window in [
        ObservationWindow::Full,
        ObservationWindow::Earliest(5),
        ObservationWindow::Latest(10),
    ] {
        assert_eq!(estimate_volatility(&prices, window).unwrap(), 0.0);
    }
}

#[test]
fn test_windows_pick_different_history() {
    // Quiet first half, choppy second half
    let mut prices: Vec<f64> = (0..10).map(|i| 100.0 + 0.01 * i as f64).collect();
    prices.extend([104.0, 97.0, 105.0, 96.0, 106.0, 95.0]);
    let early = estimate_volatility(&prices, ObservationWindow::Earliest(10)).unwrap();
    let late = estimate_volatility(&prices, ObservationWindow::Latest(6)).unwrap();
    let full = estimate_volatility(&prices, ObservationWindow::Full).unwrap();
    assert!(early < 1e-3, "early={early}");
    assert!(late > 0.05, "late={late}");
    assert!(full > early && full < late, "full={full}");
}

#[test]
fn test_insufficient_data() {
    let err = estimate_volatility(&[], ObservationWindow::Full).unwrap_err();
    assert!(matches!(err, QuantProError::InsufficientData(_)));
    let err = estimate_volatility(&[1.0, 2.0, 3.0], ObservationWindow::Earliest(1)).unwrap_err();
    assert!(matches!(err, QuantProError::InsufficientData(_)));
}

#[test]
fn test_daily_annualization_in_envelope() {
    let input: HistoricalVolInput = serde_json::from_str(
        r#"{"prices": [125.092575, 124.423584, 124.094070, 124.872902, 123.355186],
            "periods_per_year": 252}"#,
    )
    .unwrap();
    assert_eq!(input.window, ObservationWindow::Full);
    let out = calculate_historical_volatility(&input).unwrap();
    let expected = annualize(out.result.volatility, 252.0).unwrap();
    assert_eq!(out.result.annualized_volatility, Some(expected));
    assert_eq!(out.result.observations_used, 5);
    assert_eq!(out.result.returns_used, 4);
}

#[test]
fn test_window_json_shape() {
    let w: ObservationWindow = serde_json::from_str(r#"{"type": "Latest", "count": 30}"#).unwrap();
    assert_eq!(w, ObservationWindow::Latest(30));
    let w: ObservationWindow = serde_json::from_str(r#"{"type": "Full"}"#).unwrap();
    assert_eq!(w, ObservationWindow::Full);
}
