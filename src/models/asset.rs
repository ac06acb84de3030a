use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of asset a case concerns. Drives the base dollar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Database,
    Server,
    Workstation,
    WebApplication,
    NetworkDevice,
    CloudService,
    EmailSystem,
    /// Resolves to the configured default asset value
    #[serde(other)]
    Unlisted,
}

impl AssetType {
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "database" => AssetType::Database,
            "server" => AssetType::Server,
            "workstation" => AssetType::Workstation,
            "web_application" => AssetType::WebApplication,
            "network_device" => AssetType::NetworkDevice,
            "cloud_service" => AssetType::CloudService,
            "email_system" => AssetType::EmailSystem,
            _ => AssetType::Unlisted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Database => "database",
            AssetType::Server => "server",
            AssetType::Workstation => "workstation",
            AssetType::WebApplication => "web_application",
            AssetType::NetworkDevice => "network_device",
            AssetType::CloudService => "cloud_service",
            AssetType::EmailSystem => "email_system",
            AssetType::Unlisted => "unlisted",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data sensitivity tier. Drives the impact multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityTier {
    Public,
    Low,
    Medium,
    High,
    Critical,
    /// Resolves to the multiplier of the configured default tier
    #[serde(other)]
    Unlisted,
}

impl SensitivityTier {
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "public" => SensitivityTier::Public,
            "low" => SensitivityTier::Low,
            "medium" => SensitivityTier::Medium,
            "high" => SensitivityTier::High,
            "critical" => SensitivityTier::Critical,
            _ => SensitivityTier::Unlisted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SensitivityTier::Public => "public",
            SensitivityTier::Low => "low",
            SensitivityTier::Medium => "medium",
            SensitivityTier::High => "high",
            SensitivityTier::Critical => "critical",
            SensitivityTier::Unlisted => "unlisted",
        }
    }
}

impl fmt::Display for SensitivityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
