pub mod black_scholes;
pub mod monte_carlo;
pub mod volatility;
