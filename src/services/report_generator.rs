use std::collections::BTreeMap;

use crate::models::{CaseRiskAssessment, ObservableRisk, RiskLevel};
use crate::utils::math::{format_currency, format_percent};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
const UNSCORED_REPORT: &str = "**Error:** Case has not been scored yet.";

/// Renders a scored case as a markdown report for the analyst task log
#[derive(Debug, Clone, Default)]
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, assessment: &CaseRiskAssessment) -> String {
        let Some(risk) = assessment.risk_score.as_ref() else {
            return UNSCORED_REPORT.to_string();
        };

        let ale = format_currency(risk.ale, 2);
        let mut lines = vec![
            "# Risk Assessment Report".to_string(),
            String::new(),
            format!("**Case:** {} (`{}`)", assessment.case_title, assessment.case_id),
            format!("**Assessed:** {}", assessment.timestamp.format(TIMESTAMP_FORMAT)),
            String::new(),
            "---".to_string(),
            String::new(),
            "## Executive Summary".to_string(),
            String::new(),
            format!(
                "{} This case has a **{}** risk level with an estimated annual loss exposure of **${}**.",
                risk.risk_level.indicator(),
                risk.risk_level,
                ale
            ),
            String::new(),
            "---".to_string(),
            String::new(),
            "## Risk Calculation".to_string(),
            String::new(),
            "| Metric | Value |".to_string(),
            "|--------|-------|".to_string(),
            format!("| Likelihood | {} |", format_percent(risk.likelihood)),
            format!("| Asset Type | {} |", assessment.asset_type),
            format!("| Sensitivity | {} |", assessment.sensitivity),
            format!("| Impact (SLE) | ${} |", format_currency(risk.impact_dollars, 0)),
            format!("| **ALE (Annualized Loss)** | **${}** |", ale),
            format!("| **Risk Level** | **{}** |", risk.risk_level),
            String::new(),
            "> *ALE = Likelihood x Impact (Single Loss Expectancy)*".to_string(),
            String::new(),
        ];

        if !assessment.observables.is_empty() {
            lines.extend(observable_breakdown(&assessment.observables));
        }

        lines.extend([
            "---".to_string(),
            String::new(),
            "## Recommended Actions".to_string(),
            String::new(),
        ]);
        lines.extend(
            recommendations(risk.risk_level)
                .iter()
                .enumerate()
                .map(|(i, action)| format!("{}. {}", i + 1, action)),
        );
        lines.extend([
            String::new(),
            "---".to_string(),
            "*Report generated by the case risk engine*".to_string(),
        ]);

        lines.join("\n")
    }
}

fn observable_breakdown(observables: &[ObservableRisk]) -> Vec<String> {
    let mut lines = vec![
        "---".to_string(),
        String::new(),
        "## Observable Breakdown".to_string(),
        String::new(),
        "| Observable | Type | Likelihood | Verdicts |".to_string(),
        "|------------|------|------------|----------|".to_string(),
    ];
    for obs in observables {
        lines.push(format!(
            "| `{}` | {} | {} | {} |",
            obs.observable.value,
            obs.observable.data_type,
            format_percent(obs.likelihood),
            verdict_summary(obs)
        ));
    }
    lines.push(String::new());

    lines.push("### Detailed Analyzer Results".to_string());
    lines.push(String::new());
    for obs in observables.iter().filter(|obs| !obs.analyzer_results.is_empty()) {
        lines.push(format!(
            "**`{}`** ({})",
            obs.observable.value, obs.observable.data_type
        ));
        lines.push(String::new());
        lines.push("| Analyzer | Verdict | Score | Detail |".to_string());
        lines.push("|----------|---------|-------|--------|".to_string());
        for result in &obs.analyzer_results {
            lines.push(format!(
                "| {} | {} | {} | {}:{} |",
                result.analyzer_name, result.level, result.raw_value, result.namespace, result.predicate
            ));
        }
        lines.push(String::new());
    }

    lines
}

/// Verdict counts for one observable, e.g. `1 malicious, 2 safe`
fn verdict_summary(obs: &ObservableRisk) -> String {
    if obs.analyzer_results.is_empty() {
        return "No analyzer results".to_string();
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for result in &obs.analyzer_results {
        *counts.entry(result.level.as_str()).or_default() += 1;
    }
    counts
        .iter()
        .map(|(level, count)| format!("{} {}", count, level))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn recommendations(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Critical => &[
            "Escalate to incident commander immediately",
            "Isolate affected assets from the network",
            "Begin forensic evidence preservation",
            "Notify executive leadership and legal counsel",
            "Activate incident response plan",
        ],
        RiskLevel::High => &[
            "Escalate to senior SOC analyst",
            "Restrict access to affected assets",
            "Run full endpoint scan on associated hosts",
            "Review related cases for lateral movement indicators",
        ],
        RiskLevel::Medium => &[
            "Assign to SOC analyst for investigation",
            "Run additional Cortex analyzers for enrichment",
            "Monitor associated assets for 48 hours",
        ],
        RiskLevel::Low => &[
            "Document findings for trend analysis",
            "Schedule routine review within 7 days",
        ],
        RiskLevel::Info => &[
            "No immediate action required",
            "Log for baseline and reporting purposes",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalyzerResult, Observable, RiskScore, VerdictLevel};

    fn scored_assessment() -> CaseRiskAssessment {
        let mut obs = ObservableRisk::new(
            Observable::new("o1", "ip", "203.0.113.7"),
            vec![
                AnalyzerResult::new("VirusTotal", VerdictLevel::Malicious).with_taxonomy("VT", "GetReport", "45/70", 45.0 / 70.0),
                AnalyzerResult::new("Shodan", VerdictLevel::Safe),
                AnalyzerResult::new("AbuseIPDB", VerdictLevel::Malicious),
            ],
        );
        obs.likelihood = 0.8;

        let mut assessment = CaseRiskAssessment::new("~42", "Beaconing host", "database", "critical")
            .with_observables(vec![obs]);
        assessment.risk_score = Some(RiskScore {
            likelihood: 0.8,
            impact_dollars: 300_000.0,
            ale: 240_000.0,
            risk_level: RiskLevel::High,
        });
        assessment
    }

    #[test]
    fn test_unscored_case_renders_error() {
        let assessment = CaseRiskAssessment::new("~1", "Pending", "server", "low");
        assert_eq!(ReportGenerator::new().generate(&assessment), UNSCORED_REPORT);
    }

    #[test]
    fn test_report_sections() {
        let report = ReportGenerator::new().generate(&scored_assessment());

        assert!(report.starts_with("# Risk Assessment Report"));
        assert!(report.contains("**Case:** Beaconing host (`~42`)"));
        assert!(report.contains("[!!] This case has a **High** risk level"));
        assert!(report.contains("**$240,000.00**"));
        assert!(report.contains("| Likelihood | 80.00% |"));
        assert!(report.contains("| Impact (SLE) | $300,000 |"));
        assert!(report.contains("| `203.0.113.7` | ip | 80.00% | 2 malicious, 1 safe |"));
        assert!(report.contains("| VirusTotal | malicious | 45/70 | VT:GetReport |"));
        assert!(report.contains("1. Escalate to senior SOC analyst"));
        assert!(report.contains("4. Review related cases for lateral movement indicators"));
    }

    #[test]
    fn test_case_without_observables_skips_breakdown() {
        let mut assessment = scored_assessment();
        assessment.observables.clear();

        let report = ReportGenerator::new().generate(&assessment);

        assert!(!report.contains("## Observable Breakdown"));
        assert!(report.contains("## Recommended Actions"));
    }

    #[test]
    fn test_verdict_summary_without_results() {
        let obs = ObservableRisk::new(Observable::new("o2", "domain", "example.org"), Vec::new());
        assert_eq!(verdict_summary(&obs), "No analyzer results");
    }

    #[test]
    fn test_every_level_has_recommendations() {
        for level in [RiskLevel::Info, RiskLevel::Low, RiskLevel::Medium, RiskLevel::High, RiskLevel::Critical] {
            assert!(!recommendations(level).is_empty());
        }
    }
}
