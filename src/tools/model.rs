use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct FunctionInfo {
    pub name: String,
    pub summary: String,
    /// Parameter name -> "type, required|optional[: note]"
    pub params_schema: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub functions: Vec<FunctionInfo>,
}

impl ToolInfo {
    pub fn new(name: &str, description: &str, functions: Vec<FunctionInfo>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            functions,
        }
    }
}

impl FunctionInfo {
    pub fn new(name: &str, summary: &str, params_schema: Value) -> Self {
        Self {
            name: name.to_string(),
            summary: summary.to_string(),
            params_schema,
        }
    }
}

/// One catalog entry together with whether its credential is configured.
#[derive(Debug, Clone, Serialize)]
pub struct ToolListing {
    #[serde(flatten)]
    pub info: ToolInfo,
    pub configured: bool,
}
