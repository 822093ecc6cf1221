use std::{collections::HashMap, future::Future, sync::Arc};

use futures::future::{self, BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    agent::{plan::Params, types::StepOutcome},
    error::agent_error::{AgentError, CapabilityError},
};

pub type CapabilityResult = Result<StepOutcome, CapabilityError>;

/// Invocation closure for one `(tool, function)` pair.
pub type Capability = Arc<dyn Fn(Params) -> BoxFuture<'static, CapabilityResult> + Send + Sync>;

/// Anything that can contribute a tool to the registry.
pub trait Connector: Send + Sync + 'static {
    fn into_tool(self: Arc<Self>) -> ToolBuilder;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Tool '{0}' not found")]
    ToolNotFound(String),

    #[error("Function '{function}' not found in tool '{tool}'")]
    FunctionNotFound { tool: String, function: String },
}

pub struct ToolBuilder {
    name: String,
    description: String,
    functions: Vec<(String, Capability)>,
}

impl ToolBuilder {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            functions: Vec::new(),
        }
    }

    /// Registers `function`. Step parameters are decoded into `P` before the
    /// handler runs; a decode failure surfaces as
    /// `CapabilityError::InvalidParameters`.
    pub fn capability<P, F, Fut>(mut self, function: impl Into<String>, handler: F) -> Self
    where
        P: DeserializeOwned + Send + 'static,
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CapabilityResult> + Send + 'static,
    {
        let capability: Capability = Arc::new(move |params: Params| {
            match serde_json::from_value::<P>(Value::Object(params)) {
                Ok(p) => handler(p).boxed(),
                Err(e) => future::ready(Err(CapabilityError::InvalidParameters(e.to_string())))
                    .boxed(),
            }
        });
        self.functions.push((function.into(), capability));
        self
    }
}

struct ToolEntry {
    function_names: Vec<String>,
    functions: HashMap<String, Capability>,
}

/// Fixed mapping from tool name to its capabilities, validated once at build
/// time. Lookups afterwards are read-only, so one registry can be shared
/// between concurrent tasks.
pub struct ConnectorRegistry {
    tool_names: Vec<String>,
    tools: HashMap<String, ToolEntry>,
}

impl ConnectorRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn resolve(&self, tool: &str, function: &str) -> Result<&Capability, LookupError> {
        let entry = self
            .tools
            .get(tool)
            .ok_or_else(|| LookupError::ToolNotFound(tool.to_string()))?;

        entry
            .functions
            .get(function)
            .ok_or_else(|| LookupError::FunctionNotFound {
                tool: tool.to_string(),
                function: function.to_string(),
            })
    }

    pub fn contains(&self, tool: &str, function: &str) -> bool {
        self.resolve(tool, function).is_ok()
    }

    /// Tool names in registration order.
    pub fn tool_names(&self) -> &[String] {
        &self.tool_names
    }

    pub fn functions(&self, tool: &str) -> Option<&[String]> {
        self.tools.get(tool).map(|e| e.function_names.as_slice())
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    tools: Vec<ToolBuilder>,
}

impl RegistryBuilder {
    pub fn tool(mut self, tool: ToolBuilder) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn connector<C: Connector>(self, connector: C) -> Self {
        self.tool(Arc::new(connector).into_tool())
    }

    pub fn build(self) -> Result<ConnectorRegistry, AgentError> {
        let mut tool_names = Vec::with_capacity(self.tools.len());
        let mut tools = HashMap::with_capacity(self.tools.len());

        for tool in self.tools {
            if tool.name.trim().is_empty() {
                return Err(AgentError::RegistryError("tool name is empty".into()));
            }
            if tools.contains_key(&tool.name) {
                return Err(AgentError::RegistryError(format!(
                    "tool '{}' registered twice",
                    tool.name
                )));
            }

            let mut function_names = Vec::with_capacity(tool.functions.len());
            let mut functions = HashMap::with_capacity(tool.functions.len());
            for (function, capability) in tool.functions {
                if function.trim().is_empty() {
                    return Err(AgentError::RegistryError(format!(
                        "tool '{}' has a function with an empty name",
                        tool.name
                    )));
                }
                if functions.insert(function.clone(), capability).is_some() {
                    return Err(AgentError::RegistryError(format!(
                        "function '{}' registered twice in tool '{}'",
                        function, tool.name
                    )));
                }
                function_names.push(function);
            }

            debug!(
                "Registered tool {} ({}) with functions {:?}",
                tool.name, tool.description, function_names
            );
            tool_names.push(tool.name.clone());
            tools.insert(
                tool.name,
                ToolEntry {
                    function_names,
                    functions,
                },
            );
        }

        info!("Connector registry built with {} tools", tool_names.len());
        Ok(ConnectorRegistry { tool_names, tools })
    }
}
