use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    agent::{
        plan::{Plan, Step, step_key},
        types::{ExecutionResult, StepError, StepOutcome, StepRecord, UNKNOWN_TASK},
    },
    tools::registry::ConnectorRegistry,
};

/// Runs plan steps against a connector registry. Step failures are captured
/// as `StepOutcome::Failure` and never returned as errors.
#[derive(Clone)]
pub struct Executor {
    registry: Arc<ConnectorRegistry>,
}

impl Executor {
    pub fn new(registry: Arc<ConnectorRegistry>) -> Self {
        Self { registry }
    }

    /// Invokes one step. A failure payload from the first call earns exactly
    /// one more call with the same parameters; an invocation error does not.
    pub async fn execute_step(&self, step: &Step) -> StepOutcome {
        let capability = match self.registry.resolve(&step.tool, &step.function) {
            Ok(capability) => capability,
            Err(e) => {
                warn!("Step {}: {}", step.step_number, e);
                return StepOutcome::failure(e.to_string());
            }
        };

        debug!(
            "Step {}: calling {}.{} with {:?}",
            step.step_number, step.tool, step.function, step.parameters
        );

        let outcome = match capability(step.parameters.clone()).await {
            Ok(outcome) if outcome.is_failure() => {
                warn!(
                    "Step {}: {}.{} returned an error, retrying once",
                    step.step_number, step.tool, step.function
                );
                capability(step.parameters.clone()).await
            }
            other => other,
        };

        outcome.unwrap_or_else(|e| StepOutcome::failure(format!("Execution failed: {e}")))
    }

    /// Runs every step in plan order and aggregates the outcomes.
    pub async fn execute_plan(&self, plan: &Plan) -> ExecutionResult {
        let task = plan
            .task_understanding
            .clone()
            .unwrap_or_else(|| UNKNOWN_TASK.to_string());
        let mut results = ExecutionResult::new(task);

        for step in &plan.steps {
            let outcome = self.execute_step(step).await;

            if let Some(error) = outcome.error() {
                results.errors.push(StepError {
                    step: step.step_number,
                    error: error.to_string(),
                });
            }

            results.steps_executed.push(StepRecord {
                step_number: step.step_number,
                action: step.action.clone(),
                tool: step.tool.clone(),
                function: step.function.clone(),
                status: outcome.status(),
                result: outcome.clone(),
            });

            // a repeated step number overwrites the earlier entry
            results.raw_data.insert(step.key(), outcome);
        }

        if results.errors.is_empty()
            && !results.raw_data.is_empty()
            && let Some(last) = plan.steps.last()
        {
            results.final_data = results
                .raw_data
                .get(&step_key(last.step_number))
                .and_then(|outcome| outcome.payload())
                .cloned();
        }

        info!(
            "Executed {} steps: {} successful, {} errors",
            results.steps_executed.len(),
            results.success_count(),
            results.error_count()
        );
        results
    }
}
