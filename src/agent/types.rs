use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::agent::payload::Payload;

pub const UNKNOWN_TASK: &str = "Unknown task";

/// Result of one plan step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Success(Payload),
    Failure { error: String },
}

impl StepOutcome {
    pub fn failure(error: impl Into<String>) -> Self {
        StepOutcome::Failure {
            error: error.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failure { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            StepOutcome::Failure { error } => Some(error),
            StepOutcome::Success(_) => None,
        }
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            StepOutcome::Success(payload) => Some(payload),
            StepOutcome::Failure { .. } => None,
        }
    }

    pub fn status(&self) -> StepStatus {
        if self.is_failure() {
            StepStatus::Failed
        } else {
            StepStatus::Success
        }
    }
}

impl From<Payload> for StepOutcome {
    fn from(payload: Payload) -> Self {
        StepOutcome::Success(payload)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step_number: i64,
    pub action: String,
    pub tool: String,
    pub function: String,
    pub status: StepStatus,
    pub result: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepError {
    pub step: i64,
    pub error: String,
}

/// Aggregated outcome of running a whole plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub task: String,
    pub steps_executed: Vec<StepRecord>,
    pub errors: Vec<StepError>,
    pub raw_data: BTreeMap<String, StepOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_data: Option<Payload>,
}

impl ExecutionResult {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            steps_executed: Vec::new(),
            errors: Vec::new(),
            raw_data: BTreeMap::new(),
            final_data: None,
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn success_count(&self) -> usize {
        self.steps_executed
            .iter()
            .filter(|r| r.status == StepStatus::Success)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub is_complete: bool,
    pub confidence: Confidence,
    pub final_answer: String,
    pub issues_found: Vec<String>,
    pub missing_data: Vec<String>,
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_results: Option<ExecutionResult>,
}

impl VerificationResult {
    pub fn complete(final_answer: String) -> Self {
        Self {
            is_complete: true,
            confidence: Confidence::High,
            final_answer,
            issues_found: Vec::new(),
            missing_data: Vec::new(),
            suggestions: Vec::new(),
            raw_results: None,
        }
    }

    pub fn incomplete(reason: &str, raw_results: ExecutionResult) -> Self {
        Self {
            is_complete: false,
            confidence: Confidence::Low,
            final_answer: format!("Unable to fully complete the task: {reason}."),
            issues_found: vec![reason.to_string()],
            missing_data: Vec::new(),
            suggestions: Vec::new(),
            raw_results: Some(raw_results),
        }
    }
}
