mod step;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
pub use step::{Params, Step, step_key};

use crate::error::agent_error::AgentError;

/// Structured execution plan produced once by the planner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_understanding: Option<String>,

    #[serde(default)]
    pub required_tools: Vec<String>,

    #[serde(default)]
    pub steps: Vec<Step>,

    #[serde(default)]
    pub expected_output: String,
}

impl Plan {
    pub fn new(task_understanding: impl Into<String>, steps: Vec<Step>) -> Self {
        let mut required_tools: Vec<String> = Vec::new();
        for step in &steps {
            if !required_tools.contains(&step.tool) {
                required_tools.push(step.tool.clone());
            }
        }

        Self {
            task_understanding: Some(task_understanding.into()),
            required_tools,
            steps,
            expected_output: String::new(),
        }
    }

    /// Rejects plans in which two steps share a `step_number`.
    pub fn ensure_unique_step_numbers(&self) -> Result<(), AgentError> {
        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.step_number) {
                return Err(AgentError::DuplicateStepNumber(step.step_number));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_deserializes_with_defaults() {
        let plan: Plan = serde_json::from_value(serde_json::json!({
            "steps": [
                {"step_number": 1, "tool": "weather", "function": "get_current_weather",
                 "parameters": {"city": "Paris"}}
            ]
        }))
        .unwrap();

        assert!(plan.task_understanding.is_none());
        assert_eq!(plan.steps[0].key(), "step_1");
        assert_eq!(plan.steps[0].parameters["city"], "Paris");
        assert!(plan.steps[0].reasoning.is_empty());
    }

    #[test]
    fn test_duplicate_step_numbers_rejected() {
        let plan = Plan::new(
            "two lookups",
            vec![Step::new(1, "news", "search_news"), Step::new(1, "serp", "search")],
        );
        assert!(matches!(
            plan.ensure_unique_step_numbers(),
            Err(AgentError::DuplicateStepNumber(1))
        ));
        assert_eq!(plan.required_tools, vec!["news", "serp"]);
    }
}
