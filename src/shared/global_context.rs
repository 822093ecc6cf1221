use std::{collections::BTreeMap, env, time::Duration};

use serde::{Deserialize, Serialize};

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.studio.nebius.ai/v1";
pub const DEFAULT_LLM_MODEL: &str = "openai/gpt-oss-20b";
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for the OpenAI-compatible planning model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: 0.2,
            max_tokens: 2000,
            timeout: DEFAULT_LLM_TIMEOUT,
        }
    }
}

/// Credentials for the data-source connectors. A missing key does not stop a
/// connector from being registered; requests simply go out unauthenticated.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub github: Option<String>,
    pub openweather: Option<String>,
    pub news: Option<String>,
    pub serp: Option<String>,
}

impl ApiKeys {
    /// Per connector family, whether its credential is present.
    pub fn tool_status(&self) -> BTreeMap<String, bool> {
        BTreeMap::from([
            ("github".to_string(), self.github.is_some()),
            ("weather".to_string(), self.openweather.is_some()),
            ("news".to_string(), self.news.is_some()),
            ("serp".to_string(), self.serp.is_some()),
        ])
    }
}

/// Process configuration. Built once and handed explicitly to the planner
/// and the connector registry.
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    pub llm: LlmConfig,
    pub api_keys: ApiKeys,
    pub http_timeout: Duration,
    pub search_timeout: Duration,
    pub log_level: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            api_keys: ApiKeys::default(),
            http_timeout: Duration::from_secs(10),
            search_timeout: Duration::from_secs(15),
            log_level: "info".to_string(),
        }
    }
}

impl GlobalConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            llm: LlmConfig {
                api_key: non_empty_var("NEBIUS_API_KEY"),
                base_url: non_empty_var("LLM_BASE_URL").unwrap_or(defaults.llm.base_url),
                model: non_empty_var("LLM_MODEL").unwrap_or(defaults.llm.model),
                timeout: non_empty_var("LLM_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.llm.timeout),
                ..defaults.llm
            },
            api_keys: ApiKeys {
                github: non_empty_var("GITHUB_API_KEY"),
                openweather: non_empty_var("OPENWEATHER_API_KEY"),
                news: non_empty_var("NEWS_API_KEY"),
                serp: non_empty_var("SERP_API_KEY"),
            },
            log_level: non_empty_var("OPSAGENT_LOG_LEVEL").unwrap_or(defaults.log_level),
            ..defaults
        }
    }

    /// Key presence keyed by environment variable name, LLM key included.
    pub fn api_keys_configured(&self) -> BTreeMap<String, bool> {
        BTreeMap::from([
            ("NEBIUS_API_KEY".to_string(), self.llm.api_key.is_some()),
            ("GITHUB_API_KEY".to_string(), self.api_keys.github.is_some()),
            (
                "OPENWEATHER_API_KEY".to_string(),
                self.api_keys.openweather.is_some(),
            ),
            ("NEWS_API_KEY".to_string(), self.api_keys.news.is_some()),
            ("SERP_API_KEY".to_string(), self.api_keys.serp.is_some()),
        ])
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
