// Risk scoring error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Missing required data: {field}")]
    MissingData { field: String },

    #[error("Invalid case assessment: {message}")]
    InvalidAssessment { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
