pub mod execution;
pub mod payload;
pub mod plan;
pub mod planning;
pub mod types;
pub mod verification;

pub use execution::Executor;
pub use payload::Payload;
pub use plan::{Plan, Step};
pub use planning::Planner;
pub use types::{ExecutionResult, StepOutcome, VerificationResult};
pub use verification::{Verifier, format_output};
