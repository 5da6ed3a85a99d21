//! Agent roster and hand-off routing.
//!
//! The external orchestrator runs the conversation loop; this module tells it
//! which agents exist, what each one may call, and which hand-offs are legal.
//! Triage may hand off to any specialist and specialists only hand back to
//! triage.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tera::{Context, Tera};
use thiserror::Error;
use tracing::info;

use crate::clock::Clock;
use crate::tools::{empty_schema, Tool};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Triage,
    Documents,
    Comments,
    Dockets,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    #[error("{from} cannot hand off to {to}")]
    IllegalHandoff { from: AgentRole, to: AgentRole },
    #[error("unknown agent `{0}`")]
    UnknownAgent(String),
}

#[derive(Debug, Error)]
#[error("could not render instructions for {role}: {message}")]
pub struct InstructionError {
    pub role: AgentRole,
    pub message: String,
}

const TRIAGE_TOOLS: &[&str] =
    &["transfer_to_documents", "transfer_to_comments", "transfer_to_dockets", "get_current_date"];
const DOCUMENT_TOOLS: &[&str] = &[
    "get_documents",
    "get_document_details",
    "get_agency_id",
    "get_agency_categories",
    "get_pdf_content",
    "get_current_date",
    "transfer_back_to_triage",
];
const COMMENT_TOOLS: &[&str] = &[
    "get_comments",
    "get_comment_details",
    "get_agency_id",
    "get_current_date",
    "transfer_back_to_triage",
];
const DOCKET_TOOLS: &[&str] = &[
    "get_dockets",
    "get_docket_details",
    "get_agency_id",
    "get_current_date",
    "transfer_back_to_triage",
];

impl AgentRole {
    pub const ALL: [AgentRole; 4] = [Self::Triage, Self::Documents, Self::Comments, Self::Dockets];

    pub fn key(self) -> &'static str {
        match self {
            Self::Triage => "triage",
            Self::Documents => "documents",
            Self::Comments => "comments",
            Self::Dockets => "dockets",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Triage => "Triage Agent",
            Self::Documents => "Documents Agent",
            Self::Comments => "Comments Agent",
            Self::Dockets => "Dockets Agent",
        }
    }

    pub fn tools(self) -> &'static [&'static str] {
        match self {
            Self::Triage => TRIAGE_TOOLS,
            Self::Documents => DOCUMENT_TOOLS,
            Self::Comments => COMMENT_TOOLS,
            Self::Dockets => DOCKET_TOOLS,
        }
    }

    /// Name of the tool that hands the conversation to this role.
    pub fn transfer_tool(self) -> &'static str {
        match self {
            Self::Triage => "transfer_back_to_triage",
            Self::Documents => "transfer_to_documents",
            Self::Comments => "transfer_to_comments",
            Self::Dockets => "transfer_to_dockets",
        }
    }

    pub fn can_hand_off_to(self, target: AgentRole) -> bool {
        match (self, target) {
            (Self::Triage, Self::Triage) => false,
            (Self::Triage, _) => true,
            (_, Self::Triage) => true,
            _ => false,
        }
    }

    pub fn handoff(self, target: AgentRole) -> Result<AgentRole, RoutingError> {
        if self.can_hand_off_to(target) {
            Ok(target)
        } else {
            Err(RoutingError::IllegalHandoff { from: self, to: target })
        }
    }

    fn template(self) -> &'static str {
        match self {
            Self::Triage => include_str!("../instructions/triage.md"),
            Self::Documents => include_str!("../instructions/documents.md"),
            Self::Comments => include_str!("../instructions/comments.md"),
            Self::Dockets => include_str!("../instructions/dockets.md"),
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AgentRole {
    type Err = RoutingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "triage" => Ok(Self::Triage),
            "documents" => Ok(Self::Documents),
            "comments" => Ok(Self::Comments),
            "dockets" => Ok(Self::Dockets),
            _ => Err(RoutingError::UnknownAgent(value.to_string())),
        }
    }
}

/// Applies a tool result to the active agent. Results that are not routing
/// tokens leave the conversation where it is.
pub fn route(current: AgentRole, tool_output: &Value) -> Result<AgentRole, RoutingError> {
    let Some(target) = tool_output.get("transfer_to").and_then(Value::as_str) else {
        return Ok(current);
    };

    let next = current.handoff(target.parse()?)?;
    info!(
        event_name = "agent.routing.handoff",
        from = current.key(),
        to = next.key(),
        "conversation handed off"
    );
    Ok(next)
}

/// Returns the routing token for `target`.
pub struct HandoffTool {
    target: AgentRole,
}

impl HandoffTool {
    pub fn new(target: AgentRole) -> Self {
        Self { target }
    }

    pub fn all() -> Vec<HandoffTool> {
        AgentRole::ALL.into_iter().map(Self::new).collect()
    }
}

#[async_trait]
impl Tool for HandoffTool {
    fn name(&self) -> &'static str {
        self.target.transfer_tool()
    }

    fn description(&self) -> &'static str {
        match self.target {
            AgentRole::Triage => "Transfer the conversation back to the Triage Agent.",
            AgentRole::Documents => "Transfer the conversation to the Documents Agent.",
            AgentRole::Comments => "Transfer the conversation to the Comments Agent.",
            AgentRole::Dockets => "Transfer the conversation to the Dockets Agent.",
        }
    }

    fn parameters(&self) -> Value {
        empty_schema()
    }

    async fn execute(&self, _input: Value) -> Result<Value> {
        Ok(json!({ "transfer_to": self.target.key() }))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AgentProfile {
    pub role: AgentRole,
    pub name: &'static str,
    pub model: String,
    pub instructions: String,
    pub tools: Vec<&'static str>,
}

/// Every agent with instructions rendered for today's date.
#[derive(Clone, Debug)]
pub struct AgentDirectory {
    profiles: Vec<AgentProfile>,
}

impl AgentDirectory {
    pub fn build(model: &str, clock: &dyn Clock) -> Result<Self, InstructionError> {
        let mut tera = Tera::default();
        for role in AgentRole::ALL {
            tera.add_raw_template(role.key(), role.template())
                .map_err(|error| InstructionError { role, message: error.to_string() })?;
        }

        let mut context = Context::new();
        context.insert("current_date", &clock.today_string());

        let profiles = AgentRole::ALL
            .into_iter()
            .map(|role| {
                let instructions = tera
                    .render(role.key(), &context)
                    .map_err(|error| InstructionError { role, message: error.to_string() })?;
                Ok(AgentProfile {
                    role,
                    name: role.display_name(),
                    model: model.to_string(),
                    instructions,
                    tools: role.tools().to_vec(),
                })
            })
            .collect::<Result<Vec<_>, InstructionError>>()?;

        Ok(Self { profiles })
    }

    /// The agent every conversation starts with.
    pub fn entry(&self) -> Option<&AgentProfile> {
        self.get(AgentRole::Triage)
    }

    pub fn get(&self, role: AgentRole) -> Option<&AgentProfile> {
        self.profiles.iter().find(|profile| profile.role == role)
    }

    pub fn profiles(&self) -> &[AgentProfile] {
        &self.profiles
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    use super::{route, AgentDirectory, AgentRole, HandoffTool, RoutingError};
    use crate::clock::FixedClock;
    use crate::tools::Tool;

    #[test]
    fn triage_reaches_every_specialist_and_specialists_only_return() {
        for specialist in [AgentRole::Documents, AgentRole::Comments, AgentRole::Dockets] {
            assert_eq!(AgentRole::Triage.handoff(specialist), Ok(specialist));
            assert_eq!(specialist.handoff(AgentRole::Triage), Ok(AgentRole::Triage));
        }

        assert_eq!(
            AgentRole::Documents.handoff(AgentRole::Dockets),
            Err(RoutingError::IllegalHandoff { from: AgentRole::Documents, to: AgentRole::Dockets })
        );
        assert!(AgentRole::Triage.handoff(AgentRole::Triage).is_err());
    }

    #[test]
    fn every_transfer_tool_on_a_roster_is_a_legal_handoff() {
        for role in AgentRole::ALL {
            for target in AgentRole::ALL {
                if role.tools().contains(&target.transfer_tool()) {
                    assert!(role.can_hand_off_to(target), "{role} lists {}", target.transfer_tool());
                }
            }
        }
    }

    #[tokio::test]
    async fn handoff_tool_output_drives_routing() {
        let token = HandoffTool::new(AgentRole::Comments).execute(Value::Null).await.expect("token");
        assert_eq!(token, json!({ "transfer_to": "comments" }));

        assert_eq!(route(AgentRole::Triage, &token), Ok(AgentRole::Comments));
        assert!(route(AgentRole::Dockets, &token).is_err());
        assert_eq!(route(AgentRole::Dockets, &json!({ "data": [] })), Ok(AgentRole::Dockets));
        assert_eq!(
            route(AgentRole::Triage, &json!({ "transfer_to": "billing" })),
            Err(RoutingError::UnknownAgent("billing".to_string()))
        );
    }

    #[test]
    fn instructions_carry_the_current_date() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 11, 5).expect("valid date"));
        let directory = AgentDirectory::build("gpt-4o", &clock).expect("templates render");

        assert_eq!(directory.profiles().len(), 4);
        let entry = directory.entry().expect("triage");
        assert_eq!(entry.name, "Triage Agent");
        for profile in directory.profiles() {
            assert!(profile.instructions.contains("2024-11-05"), "{} lacks date", profile.name);
            assert!(!profile.instructions.contains("{{"));
            assert_eq!(profile.model, "gpt-4o");
        }

        let documents = directory.get(AgentRole::Documents).expect("documents");
        assert!(documents.tools.contains(&"get_pdf_content"));
    }
}
