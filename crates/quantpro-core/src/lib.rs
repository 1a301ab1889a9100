pub mod error;
pub mod types;

#[cfg(feature = "volatility")]
pub mod volatility;

#[cfg(feature = "analytic")]
pub mod analytic;

#[cfg(feature = "monte_carlo")]
pub mod monte_carlo;

pub use error::QuantProError;
pub use types::*;

/// Standard result type for all quantpro operations
pub type QuantProResult<T> = Result<T, QuantProError>;
