// Risk Classifier - maps an ALE value onto a risk level
use crate::models::{RiskEngineConfig, RiskLevel, RiskThresholds};

/// Cutoffs are checked in the fixed order critical, high, medium, low.
/// Their ordering is the caller's responsibility and is not repaired here.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    thresholds: RiskThresholds,
}

impl RiskClassifier {
    pub fn new(config: &RiskEngineConfig) -> Self {
        Self {
            thresholds: config.thresholds.clone(),
        }
    }

    pub fn classify_risk(&self, ale: f64) -> RiskLevel {
        if ale >= self.thresholds.critical {
            RiskLevel::Critical
        } else if ale >= self.thresholds.high {
            RiskLevel::High
        } else if ale >= self.thresholds.medium {
            RiskLevel::Medium
        } else if ale >= self.thresholds.low {
            RiskLevel::Low
        } else {
            RiskLevel::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> RiskClassifier {
        RiskClassifier::new(&RiskEngineConfig::default())
    }

    #[test]
    fn test_cutoffs_are_inclusive() {
        let classifier = classifier();
        assert_eq!(classifier.classify_risk(500_000.0), RiskLevel::Critical);
        assert_eq!(classifier.classify_risk(499_999.99), RiskLevel::High);
        assert_eq!(classifier.classify_risk(100_000.0), RiskLevel::High);
        assert_eq!(classifier.classify_risk(10_000.0), RiskLevel::Medium);
        assert_eq!(classifier.classify_risk(1_000.0), RiskLevel::Low);
        assert_eq!(classifier.classify_risk(999.99), RiskLevel::Info);
        assert_eq!(classifier.classify_risk(0.0), RiskLevel::Info);
    }

    #[test]
    fn test_severity_never_decreases_with_ale() {
        let classifier = classifier();
        let mut previous = RiskLevel::Info;
        for step in 0..2_000 {
            let level = classifier.classify_risk(step as f64 * 500.0);
            assert!(level >= previous);
            previous = level;
        }
        assert_eq!(previous, RiskLevel::Critical);
    }

    #[test]
    fn test_inconsistent_thresholds_keep_check_order() {
        let mut config = RiskEngineConfig::default();
        config.thresholds = RiskThresholds {
            critical: 100.0,
            high: 1_000.0,
            medium: 10.0,
            low: 10_000.0,
        };
        let classifier = RiskClassifier::new(&config);
        // critical is checked first, so anything >= 100 is Critical
        assert_eq!(classifier.classify_risk(5_000.0), RiskLevel::Critical);
        assert_eq!(classifier.classify_risk(50.0), RiskLevel::Medium);
        assert_eq!(classifier.classify_risk(5.0), RiskLevel::Info);
    }
}
