use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    agent::{
        Executor, Planner, Verifier, format_output,
        plan::Plan,
        types::{Confidence, ExecutionResult, VerificationResult},
    },
    error::{Result, agent_error::AgentError},
    input::TaskRequest,
    llm::{ChatModel, ChatOptions, OpenAiClient},
    shared::GlobalConfig,
    tools::{ConnectorRegistry, ToolListing, instantiate_registry, list_tools},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Complete,
    Partial,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExecutionReport {
    Full(ExecutionResult),
    Summary {
        steps_count: usize,
        errors_count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VerificationReport {
    Full(VerificationResult),
    Summary {
        is_complete: bool,
        confidence: Confidence,
        final_answer: String,
    },
}

/// Everything produced for one processed task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub request_id: Uuid,
    pub status: TaskStatus,
    pub task: String,
    pub plan: Plan,
    pub execution_results: ExecutionReport,
    pub verification: VerificationReport,
    pub formatted_output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    PartiallyConfigured,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub agents: BTreeMap<String, String>,
    pub api_keys_configured: BTreeMap<String, bool>,
    pub tools_available: BTreeMap<String, bool>,
}

/// Drives a task through planning, execution, verification and formatting.
pub struct MasterAgent<M: ChatModel = OpenAiClient> {
    config: GlobalConfig,
    planner: Option<Planner<M>>,
    executor: Executor,
    verifier: Verifier,
}

impl MasterAgent<OpenAiClient> {
    /// Wires the OpenAI-compatible planner and the standard connectors.
    /// The planner is absent when no LLM key is configured.
    pub fn from_config(config: GlobalConfig) -> Result<Self> {
        let registry = instantiate_registry(&config)?;
        let planner = match OpenAiClient::from_config(&config.llm)? {
            Some(client) => {
                info!("Planning with {}", client.model());
                let options = ChatOptions {
                    temperature: config.llm.temperature,
                    max_tokens: config.llm.max_tokens,
                };
                Some(Planner::new(client).with_options(options))
            }
            None => {
                warn!("NEBIUS_API_KEY not configured, planning is unavailable");
                None
            }
        };
        Ok(Self::new(config, planner, registry))
    }
}

impl<M: ChatModel> MasterAgent<M> {
    /// The planner is used as given, options included.
    pub fn new(config: GlobalConfig, planner: Option<Planner<M>>, registry: ConnectorRegistry) -> Self {
        Self {
            planner,
            executor: Executor::new(Arc::new(registry)),
            verifier: Verifier,
            config,
        }
    }

    fn planner(&self) -> Result<&Planner<M>> {
        self.planner.as_ref().ok_or_else(|| {
            AgentError::ConfigError("NEBIUS_API_KEY not configured".to_string()).into()
        })
    }

    pub async fn create_plan(&self, task: &str) -> Result<Plan> {
        self.planner()?.create_plan(task).await
    }

    #[instrument(skip(self, request), fields(request_id))]
    pub async fn process_task(&self, request: &TaskRequest) -> Result<TaskResponse> {
        let request_id = Uuid::new_v4();
        tracing::Span::current().record("request_id", tracing::field::display(request_id));
        info!("Processing task: {}", request.task);

        let plan = self.create_plan(&request.task).await?;
        info!("Plan created with {} steps", plan.steps.len());

        let execution = self.executor.execute_plan(&plan).await;
        info!(
            "Execution complete: {} successful, {} errors",
            execution.success_count(),
            execution.error_count()
        );

        let verification = self
            .verifier
            .verify_results(&request.task, &execution, &plan);
        info!("Verification complete: {} confidence", verification.confidence);

        let formatted_output = format_output(&verification);
        let status = if verification.is_complete {
            TaskStatus::Complete
        } else {
            TaskStatus::Partial
        };

        let (execution_results, verification) = if request.include_raw_data {
            (
                ExecutionReport::Full(execution),
                VerificationReport::Full(verification),
            )
        } else {
            (
                ExecutionReport::Summary {
                    steps_count: execution.steps_executed.len(),
                    errors_count: execution.error_count(),
                },
                VerificationReport::Summary {
                    is_complete: verification.is_complete,
                    confidence: verification.confidence,
                    final_answer: verification.final_answer,
                },
            )
        };

        Ok(TaskResponse {
            request_id,
            status,
            task: request.task.clone(),
            plan,
            execution_results,
            verification,
            formatted_output,
        })
    }

    pub fn list_tools(&self) -> Vec<ToolListing> {
        list_tools(&self.config)
    }

    pub fn health(&self) -> HealthReport {
        let api_keys_configured = self.config.api_keys_configured();
        let status = if api_keys_configured.values().all(|v| *v) {
            HealthStatus::Healthy
        } else {
            HealthStatus::PartiallyConfigured
        };
        let planner_state = if self.planner.is_some() {
            "ready"
        } else {
            "unconfigured"
        };
        let agents = BTreeMap::from([
            ("planner".to_string(), planner_state.to_string()),
            ("executor".to_string(), "ready".to_string()),
            ("verifier".to_string(), "ready".to_string()),
        ]);

        HealthReport {
            status,
            agents,
            api_keys_configured,
            tools_available: self.config.api_keys.tool_status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::llm::{ChatMessage, LlmError};

    struct RecordingModel {
        seen: Arc<Mutex<Vec<ChatOptions>>>,
    }

    #[async_trait]
    impl ChatModel for RecordingModel {
        async fn chat(
            &self,
            _messages: Vec<ChatMessage>,
            options: ChatOptions,
        ) -> std::result::Result<String, LlmError> {
            self.seen.lock().unwrap().push(options);
            Ok(json!({
                "task_understanding": "noop",
                "required_tools": [],
                "steps": [],
                "expected_output": "nothing"
            })
            .to_string())
        }
    }

    #[tokio::test]
    async fn test_planner_options_are_kept_as_given() {
        let mut config = GlobalConfig::default();
        config.llm.temperature = 0.9;
        let seen = Arc::new(Mutex::new(Vec::new()));

        let default_planner = Planner::new(RecordingModel { seen: seen.clone() });
        let agent = MasterAgent::new(
            config.clone(),
            Some(default_planner),
            ConnectorRegistry::builder().build().unwrap(),
        );
        agent.create_plan("noop").await.unwrap();

        let tuned = Planner::new(RecordingModel { seen: seen.clone() }).with_options(ChatOptions {
            temperature: 0.5,
            max_tokens: 64,
        });
        let agent = MasterAgent::new(
            config,
            Some(tuned),
            ConnectorRegistry::builder().build().unwrap(),
        );
        agent.create_plan("noop").await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].temperature, 0.2);
        assert_eq!(seen[1].temperature, 0.5);
        assert_eq!(seen[1].max_tokens, 64);
    }

    #[test]
    fn test_health_without_keys_is_partial() {
        let agent = MasterAgent::from_config(GlobalConfig::default()).unwrap();
        let health = agent.health();
        assert_eq!(health.status, HealthStatus::PartiallyConfigured);
        assert_eq!(health.agents["planner"], "unconfigured");
        assert!(!health.api_keys_configured["NEBIUS_API_KEY"]);
        assert_eq!(health.tools_available.len(), 4);
    }

    #[test]
    fn test_health_with_every_key_is_healthy() {
        let mut config = GlobalConfig::default();
        config.llm.api_key = Some("llm".into());
        config.api_keys.github = Some("g".into());
        config.api_keys.openweather = Some("w".into());
        config.api_keys.news = Some("n".into());
        config.api_keys.serp = Some("s".into());

        let agent = MasterAgent::from_config(config).unwrap();
        let health = agent.health();
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(
            serde_json::to_value(&health).unwrap()["status"],
            json!("healthy")
        );
    }

    #[tokio::test]
    async fn test_missing_llm_key_is_an_error() {
        let agent = MasterAgent::from_config(GlobalConfig::default()).unwrap();
        let err = agent
            .process_task(&TaskRequest::new("weather in Paris"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("NEBIUS_API_KEY"));
    }

    #[test]
    fn test_summary_reports_serialize_flat() {
        let report = ExecutionReport::Summary {
            steps_count: 2,
            errors_count: 1,
        };
        assert_eq!(
            serde_json::to_value(report).unwrap(),
            json!({"steps_count": 2, "errors_count": 1})
        );
    }
}
