use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::info;

use crate::models::RiskEngineConfig;

/// Environment variable naming an extra configuration file
pub const CONFIG_PATH_ENV: &str = "RISK_ENGINE_CONFIG";
/// Prefix of environment overrides, e.g. `RISK_ENGINE__RISK__THRESHOLDS__HIGH`
pub const ENV_PREFIX: &str = "RISK_ENGINE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thehive: PlatformSettings,
    pub cortex: PlatformSettings,
    pub risk: RiskEngineConfig,
    pub pipeline: PipelineSettings,
    pub logging: LoggingSettings,
}

/// Connection details for an upstream REST platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    pub url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Tag marking a case as already scored
    pub scored_tag: String,
    pub risk_task_title: String,
    /// Used when a case carries no `asset:<type>` tag
    pub default_asset_type: String,
    /// Used when a case carries no `sensitivity:<tier>` tag
    pub default_sensitivity: String,
    pub max_concurrent_cases: usize,
    /// 0 runs a single pass
    pub poll_interval_seconds: u64,
    pub retry_attempts: usize,
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            thehive: PlatformSettings::thehive_default(),
            cortex: PlatformSettings::cortex_default(),
            risk: RiskEngineConfig::default(),
            pipeline: PipelineSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl PlatformSettings {
    fn thehive_default() -> Self {
        PlatformSettings {
            url: "http://localhost:9000".to_string(),
            ..Default::default()
        }
    }

    fn cortex_default() -> Self {
        PlatformSettings {
            url: "http://localhost:9001".to_string(),
            ..Default::default()
        }
    }
}

impl Default for PlatformSettings {
    fn default() -> Self {
        PlatformSettings {
            url: "http://localhost:9000".to_string(),
            api_key: String::new(),
            timeout_seconds: 30,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        PipelineSettings {
            scored_tag: "risk-scored".to_string(),
            risk_task_title: "Risk Assessment".to_string(),
            default_asset_type: "workstation".to_string(),
            default_sensitivity: "medium".to_string(),
            max_concurrent_cases: 4,
            poll_interval_seconds: 0,
            retry_attempts: 3,
            retry_base_delay_ms: 200,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl Settings {
    /// Layered load: defaults, `config/default.toml`, the file named by
    /// `RISK_ENGINE_CONFIG`, then `RISK_ENGINE__*` environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false));

        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            info!("Loading configuration overrides from {}", path);
            builder = builder.add_source(File::with_name(&path).required(true));
        }

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Defaults overlaid with a single configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()).required(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.pipeline.scored_tag, "risk-scored");
        assert_eq!(settings.thehive.url, "http://localhost:9000");
        assert_eq!(settings.cortex.url, "http://localhost:9001");
        assert_eq!(settings.risk, RiskEngineConfig::default());
    }

    #[test]
    fn test_log_format_is_lowercase() {
        let logging: LoggingSettings = toml::from_str("format = \"json\"").unwrap();
        assert_eq!(logging.format, LogFormat::Json);
        assert_eq!(logging.level, "info");
    }
}
