pub mod report_generator;
pub mod risk_calculator;
pub mod risk_pipeline;

pub use report_generator::*;
pub use risk_calculator::*;
pub use risk_pipeline::*;
