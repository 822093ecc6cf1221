pub mod agent_error;

use thiserror::Error as ThisError;

use crate::{error::agent_error::AgentError, llm::LlmError};

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("serde_json error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("model error: {0}")]
    ModelError(#[from] LlmError),

    #[error("agent error: {0}")]
    AgentError(#[from] AgentError),
}

pub type Result<T> = core::result::Result<T, Error>;
