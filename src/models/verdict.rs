use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized severity of a single analyzer finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictLevel {
    Malicious,
    Suspicious,
    Safe,
    Info,
    /// Any label outside the four canonical levels. Weighs 0.0.
    #[serde(other)]
    Unrecognized,
}

impl VerdictLevel {
    /// Case-insensitive parse. Unknown labels never fail.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "malicious" => VerdictLevel::Malicious,
            "suspicious" => VerdictLevel::Suspicious,
            "safe" => VerdictLevel::Safe,
            "info" => VerdictLevel::Info,
            _ => VerdictLevel::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictLevel::Malicious => "malicious",
            VerdictLevel::Suspicious => "suspicious",
            VerdictLevel::Safe => "safe",
            VerdictLevel::Info => "info",
            VerdictLevel::Unrecognized => "unrecognized",
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, VerdictLevel::Unrecognized)
    }
}

impl fmt::Display for VerdictLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One taxonomy entry reported by an analyzer for an observable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerResult {
    pub analyzer_name: String,
    pub level: VerdictLevel,
    pub score: f64,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub predicate: String,
    #[serde(default)]
    pub raw_value: String,
}

impl AnalyzerResult {
    pub fn new(analyzer_name: impl Into<String>, level: VerdictLevel) -> Self {
        Self {
            analyzer_name: analyzer_name.into(),
            level,
            score: 0.0,
            namespace: String::new(),
            predicate: String::new(),
            raw_value: String::new(),
        }
    }

    pub fn with_taxonomy(
        mut self,
        namespace: impl Into<String>,
        predicate: impl Into<String>,
        raw_value: impl Into<String>,
        score: f64,
    ) -> Self {
        self.namespace = namespace.into();
        self.predicate = predicate.into();
        self.raw_value = raw_value.into();
        self.score = score;
        self
    }
}
