use thiserror::Error;
use tracing::warn;
use url::Url;

use super::settings::{PipelineSettings, PlatformSettings, Settings};
use crate::models::{RiskEngineConfig, SensitivityTier};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid URL: {field} - {message}")]
    InvalidUrl { field: String, message: String },
    #[error("Invalid range: {field} must be between {min} and {max}, got {value}")]
    InvalidRange { field: String, min: f64, max: f64, value: f64 },
    #[error("Invalid value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks loaded settings before any scoring run starts
#[derive(Debug, Clone, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, settings: &Settings) -> ValidationResult<()> {
        self.validate_platform("thehive", &settings.thehive)?;
        self.validate_platform("cortex", &settings.cortex)?;
        self.validate_risk_config(&settings.risk)?;
        self.validate_pipeline(&settings.pipeline)?;
        Ok(())
    }

    pub fn validate_platform(&self, name: &str, platform: &PlatformSettings) -> ValidationResult<()> {
        let field = format!("{}.url", name);
        let url = Url::parse(&platform.url).map_err(|e| ValidationError::InvalidUrl {
            field: field.clone(),
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl {
                field,
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if platform.timeout_seconds == 0 {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.timeout_seconds", name),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_risk_config(&self, risk: &RiskEngineConfig) -> ValidationResult<()> {
        let weights = &risk.verdict_weights;
        for (field, value) in [
            ("risk.verdict_weights.malicious", weights.malicious),
            ("risk.verdict_weights.suspicious", weights.suspicious),
            ("risk.verdict_weights.safe", weights.safe),
            ("risk.verdict_weights.info", weights.info),
        ] {
            Self::check_range(field, value, 0.0, 1.0)?;
        }

        if risk.consensus.threshold == 0 {
            return Err(ValidationError::InvalidValue {
                field: "risk.consensus.threshold".to_string(),
                message: "must be at least 1 analyzer".to_string(),
            });
        }
        Self::check_range("risk.consensus.boost", risk.consensus.boost, 1.0, f64::MAX)?;

        let impact = &risk.impact;
        let assets = &impact.asset_values;
        for (field, value) in [
            ("risk.impact.asset_values.database", assets.database),
            ("risk.impact.asset_values.server", assets.server),
            ("risk.impact.asset_values.workstation", assets.workstation),
            ("risk.impact.asset_values.web_application", assets.web_application),
            ("risk.impact.asset_values.network_device", assets.network_device),
            ("risk.impact.asset_values.cloud_service", assets.cloud_service),
            ("risk.impact.asset_values.email_system", assets.email_system),
            ("risk.impact.default_asset_value", impact.default_asset_value),
        ] {
            Self::check_non_negative(field, value)?;
        }

        let multipliers = &impact.sensitivity_multipliers;
        for (field, value) in [
            ("risk.impact.sensitivity_multipliers.public", multipliers.public),
            ("risk.impact.sensitivity_multipliers.low", multipliers.low),
            ("risk.impact.sensitivity_multipliers.medium", multipliers.medium),
            ("risk.impact.sensitivity_multipliers.high", multipliers.high),
            ("risk.impact.sensitivity_multipliers.critical", multipliers.critical),
        ] {
            Self::check_non_negative(field, value)?;
        }

        if impact.default_sensitivity == SensitivityTier::Unlisted {
            return Err(ValidationError::InvalidValue {
                field: "risk.impact.default_sensitivity".to_string(),
                message: "must name a configured sensitivity tier".to_string(),
            });
        }

        let thresholds = &risk.thresholds;
        for (field, value) in [
            ("risk.thresholds.critical", thresholds.critical),
            ("risk.thresholds.high", thresholds.high),
            ("risk.thresholds.medium", thresholds.medium),
            ("risk.thresholds.low", thresholds.low),
        ] {
            Self::check_non_negative(field, value)?;
        }

        // Classification keeps the literal check order either way
        if !thresholds.is_monotonic() {
            warn!(
                critical = thresholds.critical,
                high = thresholds.high,
                medium = thresholds.medium,
                low = thresholds.low,
                "Risk thresholds are not non-increasing; some levels may be unreachable"
            );
        }

        Ok(())
    }

    pub fn validate_pipeline(&self, pipeline: &PipelineSettings) -> ValidationResult<()> {
        if pipeline.max_concurrent_cases == 0 {
            return Err(ValidationError::InvalidValue {
                field: "pipeline.max_concurrent_cases".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if pipeline.scored_tag.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "pipeline.scored_tag".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn check_range(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
        if !value.is_finite() || value < min || value > max {
            return Err(ValidationError::InvalidRange {
                field: field.to_string(),
                min,
                max,
                value,
            });
        }
        Ok(())
    }

    fn check_non_negative(field: &str, value: f64) -> ValidationResult<()> {
        Self::check_range(field, value, 0.0, f64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskThresholds;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(ConfigValidator::new().validate(&Settings::default()).is_ok());
    }

    #[test]
    fn test_rejects_weight_above_one() {
        let mut settings = Settings::default();
        settings.risk.verdict_weights.suspicious = 1.5;
        let err = ConfigValidator::new().validate(&settings).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRange { ref field, .. } if field == "risk.verdict_weights.suspicious"));
    }

    #[test]
    fn test_rejects_boost_below_one() {
        let mut settings = Settings::default();
        settings.risk.consensus.boost = 0.8;
        assert!(ConfigValidator::new().validate(&settings).is_err());
    }

    #[test]
    fn test_rejects_zero_consensus_threshold() {
        let mut settings = Settings::default();
        settings.risk.consensus.threshold = 0;
        assert!(ConfigValidator::new().validate(&settings).is_err());
    }

    #[test]
    fn test_rejects_unlisted_default_tier() {
        let mut settings = Settings::default();
        settings.risk.impact.default_sensitivity = SensitivityTier::Unlisted;
        assert!(ConfigValidator::new().validate(&settings).is_err());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut settings = Settings::default();
        settings.cortex.url = "ftp://cortex.local".to_string();
        let err = ConfigValidator::new().validate(&settings).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidUrl { .. }));
    }

    #[test]
    fn test_non_monotonic_thresholds_are_accepted() {
        let mut settings = Settings::default();
        settings.risk.thresholds = RiskThresholds {
            critical: 10.0,
            high: 100.0,
            medium: 1_000.0,
            low: 10_000.0,
        };
        assert!(ConfigValidator::new().validate(&settings).is_ok());
    }
}
