use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical risk level, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Info => "Info",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }

    /// Text indicator safe for markdown
    pub fn indicator(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "[!!!]",
            RiskLevel::High => "[!!]",
            RiskLevel::Medium => "[!]",
            RiskLevel::Low => "[-]",
            RiskLevel::Info => "[i]",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final score of a case. Values are already rounded for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub likelihood: f64,
    pub impact_dollars: f64,
    pub ale: f64,
    pub risk_level: RiskLevel,
}
