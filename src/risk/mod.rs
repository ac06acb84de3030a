// Risk scoring core: verdicts -> likelihood, asset -> impact, ALE -> level

pub mod classifier;
pub mod errors;
pub mod impact_estimator;
pub mod verdict_aggregator;

pub use classifier::*;
pub use errors::*;
pub use impact_estimator::*;
pub use verdict_aggregator::*;

pub const MIN_LIKELIHOOD: f64 = 0.0;
pub const MAX_LIKELIHOOD: f64 = 1.0;

/// Decimal places kept on reported likelihoods
pub const LIKELIHOOD_DECIMALS: u32 = 4;
/// Decimal places kept on reported ALE values
pub const ALE_DECIMALS: u32 = 2;
