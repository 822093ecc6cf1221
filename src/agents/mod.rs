pub mod master_agent;

pub use master_agent::{
    ExecutionReport, HealthReport, HealthStatus, MasterAgent, TaskResponse, TaskStatus,
    VerificationReport,
};
