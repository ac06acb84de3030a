use serde::{Deserialize, Serialize};

use super::asset::{AssetType, SensitivityTier};
use super::verdict::VerdictLevel;

/// Scoring tables shared by every component of a scoring run.
/// Read-only once built; each component takes its own section at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskEngineConfig {
    pub verdict_weights: VerdictWeights,
    pub consensus: ConsensusConfig,
    pub impact: ImpactConfig,
    pub thresholds: RiskThresholds,
}

/// Weight of each canonical verdict level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictWeights {
    pub malicious: f64,
    pub suspicious: f64,
    pub safe: f64,
    pub info: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Distinct analyzers that must report "malicious"
    pub threshold: usize,
    /// Multiplier applied to the mean weight once the threshold is met
    pub boost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactConfig {
    pub asset_values: AssetValues,
    pub default_asset_value: f64,
    pub sensitivity_multipliers: SensitivityMultipliers,
    pub default_sensitivity: SensitivityTier,
}

/// Base dollar value per asset type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetValues {
    pub database: f64,
    pub server: f64,
    pub workstation: f64,
    pub web_application: f64,
    pub network_device: f64,
    pub cloud_service: f64,
    pub email_system: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityMultipliers {
    pub public: f64,
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

/// ALE cutoffs in dollars, checked critical first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl VerdictWeights {
    pub fn weight_of(&self, level: VerdictLevel) -> f64 {
        match level {
            VerdictLevel::Malicious => self.malicious,
            VerdictLevel::Suspicious => self.suspicious,
            VerdictLevel::Safe => self.safe,
            VerdictLevel::Info => self.info,
            VerdictLevel::Unrecognized => 0.0,
        }
    }
}

impl AssetValues {
    /// `None` for asset types without a configured value
    pub fn value_of(&self, asset_type: AssetType) -> Option<f64> {
        match asset_type {
            AssetType::Database => Some(self.database),
            AssetType::Server => Some(self.server),
            AssetType::Workstation => Some(self.workstation),
            AssetType::WebApplication => Some(self.web_application),
            AssetType::NetworkDevice => Some(self.network_device),
            AssetType::CloudService => Some(self.cloud_service),
            AssetType::EmailSystem => Some(self.email_system),
            AssetType::Unlisted => None,
        }
    }
}

impl SensitivityMultipliers {
    pub fn multiplier_of(&self, tier: SensitivityTier) -> Option<f64> {
        match tier {
            SensitivityTier::Public => Some(self.public),
            SensitivityTier::Low => Some(self.low),
            SensitivityTier::Medium => Some(self.medium),
            SensitivityTier::High => Some(self.high),
            SensitivityTier::Critical => Some(self.critical),
            SensitivityTier::Unlisted => None,
        }
    }
}

impl RiskThresholds {
    /// True when critical >= high >= medium >= low
    pub fn is_monotonic(&self) -> bool {
        self.critical >= self.high && self.high >= self.medium && self.medium >= self.low
    }
}

impl Default for RiskEngineConfig {
    fn default() -> Self {
        Self {
            verdict_weights: VerdictWeights::default(),
            consensus: ConsensusConfig::default(),
            impact: ImpactConfig::default(),
            thresholds: RiskThresholds::default(),
        }
    }
}

impl Default for VerdictWeights {
    fn default() -> Self {
        Self {
            malicious: 1.0,
            suspicious: 0.5,
            safe: 0.0,
            info: 0.0,
        }
    }
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            threshold: 2,
            boost: 1.2,
        }
    }
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            asset_values: AssetValues::default(),
            default_asset_value: 25_000.0,
            sensitivity_multipliers: SensitivityMultipliers::default(),
            default_sensitivity: SensitivityTier::Medium,
        }
    }
}

impl Default for AssetValues {
    fn default() -> Self {
        Self {
            database: 100_000.0,
            server: 50_000.0,
            workstation: 10_000.0,
            web_application: 75_000.0,
            network_device: 40_000.0,
            cloud_service: 80_000.0,
            email_system: 30_000.0,
        }
    }
}

impl Default for SensitivityMultipliers {
    fn default() -> Self {
        Self {
            public: 0.5,
            low: 1.0,
            medium: 1.5,
            high: 2.0,
            critical: 3.0,
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            critical: 500_000.0,
            high: 100_000.0,
            medium: 10_000.0,
            low: 1_000.0,
        }
    }
}
