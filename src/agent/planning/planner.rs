use serde_json::Value;
use tracing::{debug, info};

use crate::{
    agent::plan::Plan,
    error::{Result, agent_error::AgentError},
    llm::{ChatModel, ChatOptions},
    message::planner::generate_planner_message,
    tools::TOOL_CATALOG,
};

const PLAN_FIELDS: [&str; 4] = ["task_understanding", "required_tools", "steps", "expected_output"];
const STEP_FIELDS: [&str; 5] = ["step_number", "action", "tool", "function", "parameters"];

/// Turns a natural-language task into a [`Plan`] with the help of a chat model.
pub struct Planner<M: ChatModel> {
    model: M,
    options: ChatOptions,
}

impl<M: ChatModel> Planner<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            options: ChatOptions {
                temperature: 0.2,
                ..ChatOptions::default()
            },
        }
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn create_plan(&self, task: &str) -> Result<Plan> {
        let messages = generate_planner_message(task, &TOOL_CATALOG);
        let raw = self.model.generate_json(messages, self.options).await?;
        debug!("Raw plan: {}", raw);

        validate_plan(&raw)?;
        let plan: Plan =
            serde_json::from_value(raw).map_err(|e| AgentError::ParseError(e.to_string()))?;
        plan.ensure_unique_step_numbers()?;

        info!("Plan created with {} steps", plan.steps.len());
        Ok(plan)
    }
}

/// Checks the shape of a model-produced plan before it is decoded.
pub fn validate_plan(raw: &Value) -> std::result::Result<(), AgentError> {
    let object = raw
        .as_object()
        .ok_or_else(|| AgentError::PlanValidation("plan is not a JSON object".into()))?;

    if let Some(missing) = PLAN_FIELDS.iter().find(|f| !object.contains_key(**f)) {
        return Err(AgentError::PlanValidation(format!("missing field '{missing}'")));
    }

    let steps = object["steps"]
        .as_array()
        .ok_or_else(|| AgentError::PlanValidation("'steps' is not an array".into()))?;

    for (index, step) in steps.iter().enumerate() {
        let missing = STEP_FIELDS
            .iter()
            .find(|f| step.get(**f).is_none());
        if let Some(field) = missing {
            return Err(AgentError::PlanValidation(format!(
                "step {} is missing field '{field}'",
                index + 1
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::{
        error::Error,
        llm::{ChatMessage, LlmError, Role},
    };

    struct ScriptedModel {
        reply: String,
        seen: Mutex<Vec<ChatMessage>>,
    }

    impl ScriptedModel {
        fn new(reply: impl Into<String>) -> Self {
            Self {
                reply: reply.into(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn chat(
            &self,
            messages: Vec<ChatMessage>,
            options: ChatOptions,
        ) -> std::result::Result<String, LlmError> {
            assert_eq!(options.temperature, 0.2);
            *self.seen.lock().unwrap() = messages;
            Ok(self.reply.clone())
        }
    }

    fn paris_plan() -> Value {
        json!({
            "task_understanding": "Get current weather for Paris",
            "required_tools": ["weather"],
            "steps": [{
                "step_number": 1,
                "action": "Retrieve current weather for Paris",
                "tool": "weather",
                "function": "get_current_weather",
                "parameters": {"city": "Paris", "units": "metric"},
                "reasoning": "The user asked for it"
            }],
            "expected_output": "Current weather details for Paris"
        })
    }

    #[tokio::test]
    async fn test_create_plan_from_fenced_reply() {
        let model = ScriptedModel::new(format!("```json\n{}\n```", paris_plan()));
        let planner = Planner::new(model);

        let plan = planner.create_plan("What is the weather in Paris?").await.unwrap();
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].tool, "weather");
        assert_eq!(plan.steps[0].parameters["city"], "Paris");
        assert_eq!(plan.required_tools, vec!["weather"]);

        let seen = planner.model.seen.lock().unwrap();
        assert_eq!(seen[0].role, Role::System);
        assert!(seen[0].content.contains("Respond ONLY with valid JSON"));
        assert!(seen[1].content.contains("What is the weather in Paris?"));
    }

    #[tokio::test]
    async fn test_missing_step_field_is_rejected() {
        let mut raw = paris_plan();
        raw["steps"][0].as_object_mut().unwrap().remove("function");
        let planner = Planner::new(ScriptedModel::new(raw.to_string()));

        let err = planner.create_plan("weather").await.unwrap_err();
        assert!(matches!(err, Error::AgentError(AgentError::PlanValidation(_))));
    }

    #[tokio::test]
    async fn test_duplicate_step_numbers_are_rejected() {
        let mut raw = paris_plan();
        let step = raw["steps"][0].clone();
        raw["steps"].as_array_mut().unwrap().push(step);
        let planner = Planner::new(ScriptedModel::new(raw.to_string()));

        let err = planner.create_plan("weather").await.unwrap_err();
        assert!(matches!(err, Error::AgentError(AgentError::DuplicateStepNumber(1))));
    }

    #[tokio::test]
    async fn test_non_json_reply_is_a_model_error() {
        let planner = Planner::new(ScriptedModel::new("I cannot help with that."));
        let err = planner.create_plan("weather").await.unwrap_err();
        assert!(matches!(err, Error::ModelError(LlmError::InvalidJson { .. })));
    }

    #[test]
    fn test_validate_plan_shape() {
        assert!(validate_plan(&paris_plan()).is_ok());
        assert!(validate_plan(&json!([])).is_err());
        assert!(validate_plan(&json!({
            "task_understanding": "x",
            "required_tools": [],
            "steps": {},
            "expected_output": "y"
        }))
        .is_err());
    }
}
