//! Tools and agent roster for the Regulations.gov assistant.
//!
//! The LLM orchestration loop lives outside this crate. It reads the roster
//! from [`agents::AgentDirectory`], advertises [`tools::ToolRegistry`]
//! descriptors to the model, executes tool calls through the registry and
//! feeds results to [`agents::route`] to follow hand-offs.

pub mod agencies;
pub mod agents;
pub mod api_tools;
pub mod clock;
pub mod error;
pub mod pdf;
pub mod toolkit;
pub mod tools;

pub use agents::{route, AgentDirectory, AgentProfile, AgentRole, RoutingError};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ToolError;
pub use toolkit::{registry_from_config, standard_registry};
pub use tools::{Tool, ToolDescriptor, ToolRegistry};
