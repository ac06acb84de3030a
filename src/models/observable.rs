use serde::{Deserialize, Serialize};

use super::verdict::AnalyzerResult;

/// Indicator attached to a case (hash, IP, domain, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observable {
    pub id: String,
    pub data_type: String,
    pub value: String,
    #[serde(default = "default_tlp")]
    pub tlp: u8,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_tlp() -> u8 {
    2
}

impl Observable {
    pub fn new(id: impl Into<String>, data_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data_type: data_type.into(),
            value: value.into(),
            tlp: default_tlp(),
            tags: Vec::new(),
        }
    }
}

/// An observable together with the verdicts collected for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservableRisk {
    pub observable: Observable,
    #[serde(default)]
    pub analyzer_results: Vec<AnalyzerResult>,
    /// Written when a case score is applied. 0.0 until then.
    #[serde(default)]
    pub likelihood: f64,
}

impl ObservableRisk {
    pub fn new(observable: Observable, analyzer_results: Vec<AnalyzerResult>) -> Self {
        Self {
            observable,
            analyzer_results,
            likelihood: 0.0,
        }
    }
}
