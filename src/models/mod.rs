pub mod asset;
pub mod case_assessment;
pub mod observable;
pub mod risk_config;
pub mod risk_score;
pub mod verdict;

pub use asset::*;
pub use case_assessment::*;
pub use observable::*;
pub use risk_config::*;
pub use risk_score::*;
pub use verdict::*;
