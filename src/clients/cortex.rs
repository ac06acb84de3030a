// Cortex REST API client: reads analyzer job reports and extracts verdicts
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::http::{RestClient, RetryPolicy};
use super::traits::VerdictSource;
use crate::config::PlatformSettings;
use crate::error::AppError;
use crate::models::{AnalyzerResult, Observable, VerdictLevel};

#[derive(Clone)]
pub struct CortexClient {
    http: RestClient,
}

impl CortexClient {
    pub fn new(settings: &PlatformSettings, retry: RetryPolicy) -> Result<Self, AppError> {
        Ok(Self {
            http: RestClient::new(settings, retry)?,
        })
    }

    /// Successful jobs that analyzed this observable.
    ///
    /// Cortex does not index jobs by case observable id, so the search goes
    /// by data value and data type.
    pub async fn get_observable_jobs(
        &self,
        observable_value: &str,
        data_type: &str,
    ) -> Result<Vec<Value>, AppError> {
        let query = json!({
            "query": {
                "_and": [
                    {"_field": "data", "_value": observable_value},
                    {"_field": "dataType", "_value": data_type},
                    {"_field": "status", "_value": "Success"},
                ]
            }
        });

        let jobs = match self
            .http
            .retryable_request(Method::POST, "/api/job/_search", Some(&query))
            .await?
        {
            Some(Value::Array(jobs)) => jobs,
            _ => Vec::new(),
        };

        debug!(
            jobs = jobs.len(),
            observable = %observable_value,
            data_type = %data_type,
            "Found Cortex jobs"
        );
        Ok(jobs)
    }

    pub async fn get_job_report(&self, job_id: &str) -> Result<Value, AppError> {
        let path = format!("/api/job/{}/report", job_id);
        Ok(self
            .http
            .request(Method::GET, &path, None)
            .await?
            .unwrap_or_else(|| json!({})))
    }

    /// Every verdict Cortex holds for the observable, across all its jobs
    pub async fn get_analyzer_results(
        &self,
        observable_value: &str,
        data_type: &str,
    ) -> Result<Vec<AnalyzerResult>, AppError> {
        let jobs = self.get_observable_jobs(observable_value, data_type).await?;
        let mut results = Vec::new();

        for mut job in jobs {
            // Search results do not always carry the report inline
            if !has_report(&job) {
                let Some(id) = job_id(&job) else {
                    warn!(observable = %observable_value, "Cortex job without an id, skipping");
                    continue;
                };
                let full = self.get_job_report(&id).await?;
                let report = full.get("report").cloned().unwrap_or(full);
                if let Value::Object(fields) = &mut job {
                    fields.insert("report".to_string(), report);
                }
            }
            results.extend(extract_verdicts(&job));
        }

        Ok(results)
    }
}

#[async_trait]
impl VerdictSource for CortexClient {
    async fn get_analyzer_results(&self, observable: &Observable) -> Result<Vec<AnalyzerResult>, AppError> {
        CortexClient::get_analyzer_results(self, &observable.value, &observable.data_type).await
    }
}

fn has_report(job: &Value) -> bool {
    match job.get("report") {
        None | Some(Value::Null) => false,
        Some(Value::Object(fields)) => !fields.is_empty(),
        Some(_) => true,
    }
}

fn job_id(job: &Value) -> Option<String> {
    job.get("id")
        .or_else(|| job.get("_id"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Parse the taxonomies of a job report into verdicts.
///
/// Taxonomies live under `report.summary.taxonomies`; each carries a level
/// (info / safe / suspicious / malicious), a namespace, a predicate and a value.
/// Levels outside the canonical four are normalized to info.
pub fn extract_verdicts(job: &Value) -> Vec<AnalyzerResult> {
    let analyzer_name = job
        .get("analyzerName")
        .and_then(Value::as_str)
        .unwrap_or("unknown");

    let taxonomies = job
        .pointer("/report/summary/taxonomies")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if taxonomies.is_empty() {
        debug!(
            job_id = ?job_id(job),
            analyzer = %analyzer_name,
            "Job has no taxonomies"
        );
        return Vec::new();
    }

    taxonomies
        .iter()
        .map(|taxonomy| {
            let level = match taxonomy.get("level").and_then(Value::as_str) {
                Some(label) => match VerdictLevel::from_label(label) {
                    VerdictLevel::Unrecognized => VerdictLevel::Info,
                    level => level,
                },
                None => VerdictLevel::Info,
            };
            let value = taxonomy.get("value");

            AnalyzerResult {
                analyzer_name: analyzer_name.to_string(),
                level,
                score: value.map(parse_score).unwrap_or(0.0),
                namespace: string_field(taxonomy, "namespace"),
                predicate: string_field(taxonomy, "predicate"),
                raw_value: value.map(raw_string).unwrap_or_default(),
            }
        })
        .collect()
}

/// Best-effort numeric score of a taxonomy value.
///
/// Fractions such as `"5/100"` are divided out. Anything unparseable,
/// a zero denominator or a non-finite result scores 0.0.
pub fn parse_score(value: &Value) -> f64 {
    let score = match value {
        Value::Number(number) => number.as_f64(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => parse_score_text(text),
        _ => None,
    };

    match score {
        Some(score) if score.is_finite() => score,
        _ => {
            debug!(value = %value, "Unparseable taxonomy score, using 0.0");
            0.0
        }
    }
}

fn parse_score_text(text: &str) -> Option<f64> {
    if text.contains('/') {
        let mut parts = text.split('/');
        let numerator: f64 = parts.next()?.trim().parse().ok()?;
        let denominator: f64 = parts.next()?.trim().parse().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }
    text.trim().parse().ok()
}

fn raw_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn string_field(taxonomy: &Value, field: &str) -> String {
    taxonomy
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_variants() {
        assert_eq!(parse_score(&json!("5/100")), 0.05);
        assert_eq!(parse_score(&json!("42")), 42.0);
        assert_eq!(parse_score(&json!(7)), 7.0);
        assert_eq!(parse_score(&json!(" 0.5 ")), 0.5);
    }

    #[test]
    fn test_parse_score_malformed_is_zero() {
        assert_eq!(parse_score(&json!("clean")), 0.0);
        assert_eq!(parse_score(&json!("3/0")), 0.0);
        assert_eq!(parse_score(&json!("a/b")), 0.0);
        assert_eq!(parse_score(&json!("inf")), 0.0);
        assert_eq!(parse_score(&Value::Null), 0.0);
    }

    #[test]
    fn test_extract_verdicts_normalizes_levels() {
        let job = json!({
            "id": "job-1",
            "analyzerName": "VirusTotal_GetReport_3_1",
            "report": {
                "summary": {
                    "taxonomies": [
                        {"level": "MALICIOUS", "namespace": "VT", "predicate": "GetReport", "value": "45/70"},
                        {"level": "weird", "namespace": "VT", "predicate": "Extra", "value": 3},
                        {"namespace": "VT", "predicate": "NoLevel"}
                    ]
                }
            }
        });

        let verdicts = extract_verdicts(&job);

        assert_eq!(verdicts.len(), 3);
        assert_eq!(verdicts[0].analyzer_name, "VirusTotal_GetReport_3_1");
        assert_eq!(verdicts[0].level, VerdictLevel::Malicious);
        assert_eq!(verdicts[0].raw_value, "45/70");
        assert!((verdicts[0].score - 45.0 / 70.0).abs() < 1e-12);
        assert_eq!(verdicts[1].level, VerdictLevel::Info);
        assert_eq!(verdicts[1].raw_value, "3");
        assert_eq!(verdicts[2].level, VerdictLevel::Info);
        assert_eq!(verdicts[2].score, 0.0);
        assert_eq!(verdicts[2].raw_value, "");
    }

    #[test]
    fn test_extract_verdicts_without_taxonomies() {
        assert!(extract_verdicts(&json!({"analyzerName": "Shodan"})).is_empty());
        assert!(extract_verdicts(&json!({"report": null})).is_empty());
    }

    #[test]
    fn test_missing_analyzer_name_is_unknown() {
        let job = json!({
            "report": {"summary": {"taxonomies": [{"level": "safe", "value": "0"}]}}
        });
        assert_eq!(extract_verdicts(&job)[0].analyzer_name, "unknown");
    }
}
