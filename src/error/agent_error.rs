#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Generated plan does not match required schema: {0}")]
    PlanValidation(String),

    #[error("Plan reuses step number {0}")]
    DuplicateStepNumber(i64),

    #[error("Invalid connector registry: {0}")]
    RegistryError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Raised by a capability invocation itself, as opposed to a failure payload
/// the connector returns. The step executor never retries these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("{0}")]
    Internal(String),
}
