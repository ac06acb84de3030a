// Impact Estimator - single loss expectancy from asset type and data sensitivity
use tracing::debug;

use crate::models::{AssetType, ImpactConfig, RiskEngineConfig, SensitivityTier};

/// Impact ($) = base asset value × sensitivity multiplier
#[derive(Debug, Clone)]
pub struct ImpactEstimator {
    config: ImpactConfig,
}

impl ImpactEstimator {
    pub fn new(config: &RiskEngineConfig) -> Self {
        Self {
            config: config.impact.clone(),
        }
    }

    /// Both labels are matched case-insensitively; unknown labels fall back to defaults.
    pub fn compute_impact(&self, asset_type: &str, sensitivity: &str) -> f64 {
        self.base_value(AssetType::from_label(asset_type))
            * self.multiplier(SensitivityTier::from_label(sensitivity))
    }

    pub fn base_value(&self, asset_type: AssetType) -> f64 {
        self.config
            .asset_values
            .value_of(asset_type)
            .unwrap_or_else(|| {
                debug!(
                    default_value = self.config.default_asset_value,
                    "Unrecognized asset type, using default value"
                );
                self.config.default_asset_value
            })
    }

    pub fn multiplier(&self, tier: SensitivityTier) -> f64 {
        let multipliers = &self.config.sensitivity_multipliers;
        multipliers.multiplier_of(tier).unwrap_or_else(|| {
            debug!(
                default_tier = %self.config.default_sensitivity,
                "Unrecognized sensitivity tier, using default tier"
            );
            // Validated configs never use Unlisted as the default tier
            multipliers
                .multiplier_of(self.config.default_sensitivity)
                .unwrap_or(1.0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_high_sensitivity() {
        let estimator = ImpactEstimator::new(&RiskEngineConfig::default());
        assert_eq!(estimator.compute_impact("database", "high"), 200_000.0);
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let estimator = ImpactEstimator::new(&RiskEngineConfig::default());
        assert_eq!(
            estimator.compute_impact("DATABASE", "High"),
            estimator.compute_impact("database", "high")
        );
    }

    #[test]
    fn test_unknown_asset_uses_default_value() {
        let estimator = ImpactEstimator::new(&RiskEngineConfig::default());
        // default 25000 x low 1.0
        assert_eq!(estimator.compute_impact("mainframe", "low"), 25_000.0);
    }

    #[test]
    fn test_unknown_sensitivity_uses_default_tier() {
        let estimator = ImpactEstimator::new(&RiskEngineConfig::default());
        // server 50000 x medium 1.5
        assert_eq!(estimator.compute_impact("server", "classified"), 75_000.0);
    }

    #[test]
    fn test_unlisted_default_tier_degrades_to_unit_multiplier() {
        let mut config = RiskEngineConfig::default();
        config.impact.default_sensitivity = SensitivityTier::Unlisted;
        let estimator = ImpactEstimator::new(&config);
        assert_eq!(estimator.compute_impact("server", "classified"), 50_000.0);
    }
}
