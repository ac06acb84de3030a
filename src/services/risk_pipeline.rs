use futures::future::try_join_all;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::report_generator::ReportGenerator;
use super::risk_calculator::CaseScorer;
use crate::clients::{CasePlatform, CaseRecord, VerdictSource};
use crate::config::PipelineSettings;
use crate::error::AppError;
use crate::models::{CaseRiskAssessment, ObservableRisk, RiskScore};

const ASSET_TAG_PREFIX: &str = "asset:";
const SENSITIVITY_TAG_PREFIX: &str = "sensitivity:";

/// Outcome of one pass over the open cases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub cases_seen: usize,
    pub cases_scored: usize,
    pub cases_failed: usize,
}

/// Pulls unscored cases, scores them and writes the report back.
pub struct RiskPipeline<P, V> {
    platform: Arc<P>,
    verdicts: Arc<V>,
    scorer: CaseScorer,
    reporter: ReportGenerator,
    settings: PipelineSettings,
}

impl<P, V> RiskPipeline<P, V>
where
    P: CasePlatform,
    V: VerdictSource,
{
    pub fn new(platform: Arc<P>, verdicts: Arc<V>, scorer: CaseScorer, settings: PipelineSettings) -> Self {
        Self {
            platform,
            verdicts,
            scorer,
            reporter: ReportGenerator::new(),
            settings,
        }
    }

    pub fn scorer(&self) -> &CaseScorer {
        &self.scorer
    }

    /// Asset type and sensitivity tier of a case, from its `asset:` and
    /// `sensitivity:` tags. The first matching tag wins.
    pub fn asset_profile(&self, tags: &[String]) -> (String, String) {
        let tagged = |prefix: &str| {
            tags.iter()
                .find_map(|tag| tag.strip_prefix(prefix))
                .map(|value| value.trim().to_lowercase())
                .filter(|value| !value.is_empty())
        };

        (
            tagged(ASSET_TAG_PREFIX).unwrap_or_else(|| self.settings.default_asset_type.clone()),
            tagged(SENSITIVITY_TAG_PREFIX).unwrap_or_else(|| self.settings.default_sensitivity.clone()),
        )
    }

    /// Fetch the case observables and the verdicts for each of them.
    pub async fn build_assessment(&self, case: &CaseRecord) -> Result<CaseRiskAssessment, AppError> {
        let observables = self.platform.get_case_observables(&case.id).await?;

        let observables = try_join_all(observables.into_iter().map(|observable| async move {
            let results = self.verdicts.get_analyzer_results(&observable).await?;
            Ok::<_, AppError>(ObservableRisk::new(observable, results))
        }))
        .await?;

        let (asset_type, sensitivity) = self.asset_profile(&case.tags);
        Ok(CaseRiskAssessment::new(&case.id, &case.title, asset_type, sensitivity)
            .with_observables(observables))
    }

    /// Score one case and publish the report. The case is tagged last, so a
    /// failure anywhere leaves it eligible for the next pass.
    pub async fn process_case(&self, case: &CaseRecord) -> Result<RiskScore, AppError> {
        let mut assessment = self.build_assessment(case).await?;

        let score = self.scorer.score_case(&assessment);
        assessment.apply_score(score)?;
        let report = self.reporter.generate(&assessment);

        let task_id = self
            .platform
            .find_or_create_task(&case.id, &self.settings.risk_task_title)
            .await?;
        self.platform.add_task_log(&task_id, &report).await?;
        self.platform
            .add_case_tag(&case.id, &self.settings.scored_tag)
            .await?;

        assessment.risk_score.ok_or_else(|| {
            AppError::InternalError(format!("case {} lost its score after scoring", case.id))
        })
    }

    pub async fn run_once(&self) -> Result<PipelineSummary, AppError> {
        let cases = self.platform.get_open_cases(&self.settings.scored_tag).await?;
        let mut summary = PipelineSummary {
            cases_seen: cases.len(),
            ..PipelineSummary::default()
        };
        if cases.is_empty() {
            info!("No unscored cases");
            return Ok(summary);
        }

        let outcomes: Vec<(String, Result<RiskScore, AppError>)> = stream::iter(cases)
            .map(|case| async move {
                let outcome = self.process_case(&case).await;
                (case.id, outcome)
            })
            .buffer_unordered(self.settings.max_concurrent_cases.max(1))
            .collect()
            .await;

        for (case_id, outcome) in outcomes {
            match outcome {
                Ok(score) => {
                    summary.cases_scored += 1;
                    info!(case_id = %case_id, risk_level = %score.risk_level, ale = score.ale, "Case processed");
                }
                Err(e) => {
                    summary.cases_failed += 1;
                    error!(case_id = %case_id, error = %e, "Failed to process case");
                }
            }
        }

        info!(
            seen = summary.cases_seen,
            scored = summary.cases_scored,
            failed = summary.cases_failed,
            "Scoring pass complete"
        );
        Ok(summary)
    }

    /// Run a pass every `interval` until `shutdown` resolves.
    /// A failed pass is logged and retried on the next tick.
    pub async fn run_until<F>(&self, interval: Duration, shutdown: F) -> PipelineSummary
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut total = PipelineSummary::default();
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping pipeline");
                    break;
                }
                _ = ticker.tick() => {
                    match self.run_once().await {
                        Ok(summary) => {
                            total.cases_seen += summary.cases_seen;
                            total.cases_scored += summary.cases_scored;
                            total.cases_failed += summary.cases_failed;
                        }
                        Err(e) => warn!(error = %e, "Scoring pass failed"),
                    }
                }
            }
        }
        total
    }
}
