use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::{debug, warn};

use crate::config::{PipelineSettings, PlatformSettings};
use crate::error::AppError;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

/// How transient request failures are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub attempts: usize,
    /// Backoff unit in milliseconds; delays grow as 2, 4, 8, ... units
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_settings(pipeline: &PipelineSettings) -> Self {
        Self {
            attempts: pipeline.retry_attempts,
            base_delay_ms: pipeline.retry_base_delay_ms,
        }
    }

    pub fn none() -> Self {
        Self {
            attempts: 0,
            base_delay_ms: 0,
        }
    }
}

/// JSON REST client with bearer-key auth and retry on transient failures
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl RestClient {
    pub fn new(settings: &PlatformSettings, retry: RetryPolicy) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", settings.api_key))
            .map_err(|e| AppError::ConfigError(format!("Invalid API key header: {}", e)))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and return the parsed JSON body, `None` for an empty body.
    ///
    /// Only idempotent methods are retried. A POST that creates data is sent
    /// once, since a timeout may arrive after the server stored the write.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, AppError> {
        let retry = method.is_idempotent();
        self.execute(method, path, body, retry).await
    }

    /// Like [`request`](Self::request), but retried whatever the method.
    /// For calls known to be safe to repeat: search and query POSTs, or a
    /// PATCH that replaces a whole field.
    pub async fn retryable_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, AppError> {
        self.execute(method, path, body, true).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        retryable: bool,
    ) -> Result<Option<Value>, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let attempts = if retryable { self.retry.attempts } else { 0 };
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(self.retry.base_delay_ms)
            .max_delay(MAX_RETRY_DELAY)
            .map(jitter)
            .take(attempts);

        let this = self;
        RetryIf::spawn(
            strategy,
            || {
                let method = method.clone();
                let url = url.clone();
                async move { this.send_once(method, &url, body).await }
            },
            |error: &AppError| {
                let retry = retryable && error.is_transient();
                if retry {
                    warn!(url = %url, error = %error, "Request failed, retrying");
                }
                retry
            },
        )
        .await
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, AppError> {
        debug!(method = %method, url = %url, "Sending request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
