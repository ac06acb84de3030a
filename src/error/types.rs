use std::fmt;

use crate::config::ValidationError;
use crate::risk::RiskError;

#[derive(Debug)]
pub enum AppError {
    ConfigError(String),
    ValidationError(String),
    NotFound(String),
    RiskError(RiskError),
    ExternalServiceError(String),
    ExternalApiError { status: u16, message: String },
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::RiskError(err) => write!(f, "Risk scoring error: {}", err),
            AppError::ExternalServiceError(msg) => write!(f, "External service error: {}", msg),
            AppError::ExternalApiError { status, message } => {
                write!(f, "External API error ({}): {}", status, message)
            }
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::RiskError(err) => Some(err),
            _ => None,
        }
    }
}

impl AppError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::ExternalServiceError(_) => true,
            AppError::ExternalApiError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<RiskError> for AppError {
    fn from(err: RiskError) -> Self {
        AppError::RiskError(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalServiceError(format!("HTTP request error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON serialization error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(format!("I/O error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(AppError::ExternalApiError { status: 503, message: String::new() }.is_transient());
        assert!(AppError::ExternalApiError { status: 429, message: String::new() }.is_transient());
        assert!(!AppError::ExternalApiError { status: 404, message: String::new() }.is_transient());
        assert!(!AppError::NotFound("case".to_string()).is_transient());
    }

    #[test]
    fn test_risk_error_conversion() {
        let err: AppError = RiskError::MissingData { field: "observables".to_string() }.into();
        assert_eq!(err.to_string(), "Risk scoring error: Missing required data: observables");
    }
}
