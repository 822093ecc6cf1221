pub mod github;
pub(crate) mod http;
pub mod instantiate;
pub mod model;
pub mod news;
pub mod registry;
pub mod serp;
pub mod weather;

pub use instantiate::{TOOL_CATALOG, instantiate_registry, list_tools};
pub use model::{FunctionInfo, ToolInfo, ToolListing};
pub use registry::{Capability, CapabilityResult, Connector, ConnectorRegistry, ToolBuilder};
