use serde::{Deserialize, Serialize};

/// A natural-language task submitted for processing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRequest {
    pub task: String,

    /// Return the full execution and verification records instead of summaries.
    #[serde(default)]
    pub include_raw_data: bool,
}

impl TaskRequest {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            include_raw_data: false,
        }
    }

    pub fn with_raw_data(mut self, include: bool) -> Self {
        self.include_raw_data = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_raw_data_defaults_to_false() {
        let request: TaskRequest = serde_json::from_str(r#"{"task": "weather in Paris"}"#).unwrap();
        assert_eq!(request, TaskRequest::new("weather in Paris"));
    }
}
