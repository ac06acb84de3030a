// TheHive 5 REST API client (/api/v1)
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::http::{RestClient, RetryPolicy};
use super::traits::{CasePlatform, CaseRecord};
use crate::config::PlatformSettings;
use crate::error::AppError;
use crate::models::Observable;

const RISK_TASK_GROUP: &str = "risk";

#[derive(Clone)]
pub struct TheHiveClient {
    http: RestClient,
}

impl TheHiveClient {
    pub fn new(settings: &PlatformSettings, retry: RetryPolicy) -> Result<Self, AppError> {
        Ok(Self {
            http: RestClient::new(settings, retry)?,
        })
    }

    async fn query(&self, query: Value) -> Result<Vec<Value>, AppError> {
        match self
            .http
            .retryable_request(Method::POST, "/api/v1/query", Some(&query))
            .await?
        {
            Some(Value::Array(items)) => Ok(items),
            None => Ok(Vec::new()),
            Some(other) => Err(AppError::ExternalServiceError(format!(
                "Expected a list from TheHive query, got {}",
                other
            ))),
        }
    }

    pub async fn get_case(&self, case_id: &str) -> Result<Value, AppError> {
        let path = format!("/api/v1/case/{}", case_id);
        self.http
            .request(Method::GET, &path, None)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("case {}", case_id)))
    }
}

#[async_trait]
impl CasePlatform for TheHiveClient {
    async fn get_open_cases(&self, exclude_tag: &str) -> Result<Vec<CaseRecord>, AppError> {
        let query = json!({
            "query": [
                {"_name": "listCase"},
                {"_name": "filter", "_not": {"_field": "tags", "_value": exclude_tag}},
                {"_name": "filter", "_field": "status", "_value": "New"},
                {"_name": "sort", "_fields": [{"_name": "startDate", "_order": "desc"}]},
            ]
        });

        let cases: Vec<CaseRecord> = self
            .query(query)
            .await?
            .iter()
            .map(case_record)
            .collect();

        info!(cases = cases.len(), "Found unscored open cases");
        Ok(cases)
    }

    async fn get_case_observables(&self, case_id: &str) -> Result<Vec<Observable>, AppError> {
        let query = json!({
            "query": [
                {"_name": "getCase", "idOrName": case_id},
                {"_name": "observables"},
            ]
        });

        let observables: Vec<Observable> = self
            .query(query)
            .await?
            .iter()
            .map(observable)
            .collect();

        info!(case_id = %case_id, observables = observables.len(), "Fetched case observables");
        Ok(observables)
    }

    async fn find_or_create_task(&self, case_id: &str, title: &str) -> Result<String, AppError> {
        let query = json!({
            "query": [
                {"_name": "getCase", "idOrName": case_id},
                {"_name": "tasks"},
                {"_name": "filter", "_field": "title", "_value": title},
            ]
        });

        if let Some(task_id) = self
            .query(query)
            .await?
            .first()
            .and_then(|task| task.get("_id"))
            .and_then(Value::as_str)
        {
            debug!(task_id = %task_id, case_id = %case_id, "Found existing task");
            return Ok(task_id.to_string());
        }

        let task = json!({
            "title": title,
            "group": RISK_TASK_GROUP,
            "description": "Automated risk scoring by the Risk Engine",
        });
        let path = format!("/api/v1/case/{}/task", case_id);
        let created = self.http.request(Method::POST, &path, Some(&task)).await?;

        let task_id = created
            .as_ref()
            .and_then(|task| task.get("_id"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AppError::ExternalServiceError("TheHive did not return an id for the new task".to_string())
            })?
            .to_string();

        info!(task_id = %task_id, case_id = %case_id, "Created risk task");
        Ok(task_id)
    }

    async fn add_task_log(&self, task_id: &str, content: &str) -> Result<(), AppError> {
        let path = format!("/api/v1/task/{}/log", task_id);
        let log = json!({ "message": content });
        self.http.request(Method::POST, &path, Some(&log)).await?;
        info!(task_id = %task_id, "Posted risk report");
        Ok(())
    }

    async fn add_case_tag(&self, case_id: &str, tag: &str) -> Result<(), AppError> {
        let case = self.get_case(case_id).await?;
        let mut tags = string_list(&case, "tags");
        if tags.iter().any(|existing| existing == tag) {
            return Ok(());
        }

        tags.push(tag.to_string());
        let path = format!("/api/v1/case/{}", case_id);
        self.http
            .retryable_request(Method::PATCH, &path, Some(&json!({ "tags": tags })))
            .await?;
        info!(case_id = %case_id, tag = %tag, "Tagged case");
        Ok(())
    }
}

fn case_record(raw: &Value) -> CaseRecord {
    CaseRecord {
        id: string_field(raw, "_id", ""),
        title: string_field(raw, "title", ""),
        status: string_field(raw, "status", ""),
        tags: string_list(raw, "tags"),
    }
}

fn observable(raw: &Value) -> Observable {
    Observable {
        id: string_field(raw, "_id", ""),
        data_type: string_field(raw, "dataType", "unknown"),
        value: string_field(raw, "data", ""),
        tlp: raw
            .get("tlp")
            .and_then(Value::as_u64)
            .and_then(|tlp| u8::try_from(tlp).ok())
            .unwrap_or(2),
        tags: string_list(raw, "tags"),
    }
}

fn string_field(raw: &Value, field: &str, default: &str) -> String {
    raw.get(field)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn string_list(raw: &Value, field: &str) -> Vec<String> {
    raw.get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
