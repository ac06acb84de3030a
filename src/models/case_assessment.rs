use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::observable::ObservableRisk;
use super::risk_score::RiskScore;
use crate::risk::RiskError;

/// Everything needed to score one case, plus the score once applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRiskAssessment {
    pub case_id: String,
    pub case_title: String,
    pub timestamp: DateTime<Utc>,
    pub asset_type: String,
    pub sensitivity: String,
    pub observables: Vec<ObservableRisk>,
    #[serde(default)]
    pub risk_score: Option<RiskScore>,
}

/// Output of scoring a case. Nothing is written until it is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseScore {
    /// One entry per observable, in stored order
    pub observable_likelihoods: Vec<f64>,
    pub risk_score: RiskScore,
}

impl CaseRiskAssessment {
    pub fn new(
        case_id: impl Into<String>,
        case_title: impl Into<String>,
        asset_type: impl Into<String>,
        sensitivity: impl Into<String>,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            case_title: case_title.into(),
            timestamp: Utc::now(),
            asset_type: asset_type.into(),
            sensitivity: sensitivity.into(),
            observables: Vec::new(),
            risk_score: None,
        }
    }

    pub fn with_observables(mut self, observables: Vec<ObservableRisk>) -> Self {
        self.observables = observables;
        self
    }

    /// Parse an assessment record. A record without its observable
    /// collection is a defect in the calling layer, not noisy data.
    pub fn from_json(raw: &str) -> Result<Self, RiskError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        match value.get("observables") {
            Some(serde_json::Value::Array(_)) => {}
            Some(_) => {
                return Err(RiskError::InvalidAssessment {
                    message: "observables must be an array".to_string(),
                })
            }
            None => {
                return Err(RiskError::MissingData {
                    field: "observables".to_string(),
                })
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Store a score on the assessment, replacing any previous one.
    pub fn apply_score(&mut self, score: CaseScore) -> Result<(), RiskError> {
        if score.observable_likelihoods.len() != self.observables.len() {
            return Err(RiskError::InvalidAssessment {
                message: format!(
                    "score covers {} observables, assessment has {}",
                    score.observable_likelihoods.len(),
                    self.observables.len()
                ),
            });
        }

        for (observable, likelihood) in self
            .observables
            .iter_mut()
            .zip(score.observable_likelihoods)
        {
            observable.likelihood = likelihood;
        }
        self.risk_score = Some(score.risk_score);
        Ok(())
    }

    pub fn is_scored(&self) -> bool {
        self.risk_score.is_some()
    }
}
