use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ToolError;

/// A function the agent framework may call with JSON arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON schema of the argument object.
    fn parameters(&self) -> Value;
    async fn execute(&self, input: Value) -> Result<Value>;
}

/// What the orchestrator needs to advertise a tool to the model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| &**tool)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub async fn call(&self, name: &str, input: Value) -> Result<Value> {
        let tool = self.get(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        info!(event_name = "agent.tool.invoked", tool = name, "executing tool");
        tool.execute(input).await
    }

    /// Tool names in lexical order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .values()
            .map(|tool| ToolDescriptor {
                name: tool.name(),
                description: tool.description(),
                parameters: tool.parameters(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Reads a tool argument object. `null` counts as an empty object.
pub fn parse_args<A: DeserializeOwned>(tool: &'static str, input: Value) -> Result<A, ToolError> {
    let input = if input.is_null() { json!({}) } else { input };
    if !input.is_object() {
        return Err(ToolError::InvalidInput {
            tool,
            message: "arguments must be a JSON object".to_string(),
        });
    }

    serde_json::from_value(input)
        .map_err(|error| ToolError::InvalidInput { tool, message: error.to_string() })
}

pub fn schema_of<A: JsonSchema>() -> Value {
    schemars::schema_for!(A).into()
}

/// Schema of a tool that takes no arguments.
pub fn empty_schema() -> Value {
    json!({ "type": "object", "properties": {}, "additionalProperties": false })
}
