use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named parameters handed to a capability.
pub type Params = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Label and result key; not required to be unique within a plan.
    pub step_number: i64,

    #[serde(default)]
    pub action: String,

    pub tool: String,

    pub function: String,

    #[serde(default)]
    pub parameters: Params,

    #[serde(default)]
    pub reasoning: String,
}

impl Step {
    pub fn new(step_number: i64, tool: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            step_number,
            action: String::new(),
            tool: tool.into(),
            function: function.into(),
            parameters: Params::new(),
            reasoning: String::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Key under which this step's outcome is stored in `raw_data`.
    pub fn key(&self) -> String {
        step_key(self.step_number)
    }
}

pub fn step_key(step_number: i64) -> String {
    format!("step_{step_number}")
}
