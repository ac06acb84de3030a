// Seams between the scoring pipeline and the upstream platforms
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{AnalyzerResult, Observable};

/// Minimal view of a case on the case-management platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Case-management platform holding cases, observables and task logs
#[async_trait]
pub trait CasePlatform: Send + Sync {
    /// New cases not yet carrying `exclude_tag`, newest first
    async fn get_open_cases(&self, exclude_tag: &str) -> Result<Vec<CaseRecord>, AppError>;

    async fn get_case_observables(&self, case_id: &str) -> Result<Vec<Observable>, AppError>;

    /// Id of the case task titled `title`, created if missing
    async fn find_or_create_task(&self, case_id: &str, title: &str) -> Result<String, AppError>;

    async fn add_task_log(&self, task_id: &str, content: &str) -> Result<(), AppError>;

    /// Add `tag` to the case unless it is already present
    async fn add_case_tag(&self, case_id: &str, tag: &str) -> Result<(), AppError>;
}

/// Source of normalized analyzer verdicts for an observable
#[async_trait]
pub trait VerdictSource: Send + Sync {
    async fn get_analyzer_results(&self, observable: &Observable) -> Result<Vec<AnalyzerResult>, AppError>;
}
