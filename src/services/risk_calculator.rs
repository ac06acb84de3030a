use tracing::info;

use crate::models::{CaseRiskAssessment, CaseScore, ObservableRisk, RiskEngineConfig, RiskScore};
use crate::risk::{
    ImpactEstimator, RiskClassifier, VerdictAggregator, ALE_DECIMALS, LIKELIHOOD_DECIMALS,
};
use crate::utils::math::{format_currency, round_to};

/// Scores observables and cases.
///
/// Holds only read-only configuration, so one scorer can be shared across
/// workers scoring different assessments.
#[derive(Debug, Clone)]
pub struct CaseScorer {
    aggregator: VerdictAggregator,
    estimator: ImpactEstimator,
    classifier: RiskClassifier,
}

impl CaseScorer {
    pub fn new(config: &RiskEngineConfig) -> Self {
        Self {
            aggregator: VerdictAggregator::new(config),
            estimator: ImpactEstimator::new(config),
            classifier: RiskClassifier::new(config),
        }
    }

    pub fn aggregator(&self) -> &VerdictAggregator {
        &self.aggregator
    }

    pub fn estimator(&self) -> &ImpactEstimator {
        &self.estimator
    }

    pub fn classifier(&self) -> &RiskClassifier {
        &self.classifier
    }

    /// Likelihood of a single observable. The observable is not modified.
    pub fn score_observable(&self, observable: &ObservableRisk) -> f64 {
        self.aggregator.compute_likelihood(&observable.analyzer_results)
    }

    /// Score a whole case without touching it.
    ///
    /// The case likelihood is the *maximum* observable likelihood: one strongly
    /// malicious indicator drives the case, however many benign ones sit next to it.
    /// ALE is classified after rounding so the reported value and level agree.
    pub fn score_case(&self, assessment: &CaseRiskAssessment) -> CaseScore {
        let observable_likelihoods: Vec<f64> = assessment
            .observables
            .iter()
            .map(|observable| self.score_observable(observable))
            .collect();

        let case_likelihood = observable_likelihoods
            .iter()
            .copied()
            .fold(None, |max: Option<f64>, likelihood| {
                Some(max.map_or(likelihood, |m| m.max(likelihood)))
            })
            .unwrap_or(0.0);

        let impact = self
            .estimator
            .compute_impact(&assessment.asset_type, &assessment.sensitivity);
        let ale = round_to(case_likelihood * impact, ALE_DECIMALS);

        let risk_score = RiskScore {
            likelihood: round_to(case_likelihood, LIKELIHOOD_DECIMALS),
            impact_dollars: impact,
            ale,
            risk_level: self.classifier.classify_risk(ale),
        };

        info!(
            case_id = %assessment.case_id,
            likelihood = risk_score.likelihood,
            impact = %format_currency(risk_score.impact_dollars, 0),
            ale = %format_currency(risk_score.ale, 2),
            risk_level = %risk_score.risk_level,
            "Case scored"
        );

        CaseScore {
            observable_likelihoods,
            risk_score,
        }
    }

    /// Score the case, write observable likelihoods, attach the score and return it.
    /// Re-running replaces the previous score.
    pub fn score_and_attach(&self, assessment: &mut CaseRiskAssessment) -> RiskScore {
        let CaseScore {
            observable_likelihoods,
            risk_score,
        } = self.score_case(assessment);

        for (observable, likelihood) in assessment
            .observables
            .iter_mut()
            .zip(observable_likelihoods)
        {
            observable.likelihood = likelihood;
        }
        assessment.risk_score = Some(risk_score.clone());
        risk_score
    }
}
