pub mod agent;
pub mod agents;
pub mod error;
pub mod input;
pub mod llm;
pub mod message;
pub mod prompt;
pub mod shared;
pub mod tools;
pub mod utils;
