use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ToolError;
use crate::tools::{empty_schema, Tool};

const BUNDLED_AGENCIES: &str = include_str!("../data/agencies.json");

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    pub id: String,
    pub name: String,
}

/// Agency acronyms accepted by the `agencyId` filter, with their full names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgencyDirectory {
    agencies: Vec<Agency>,
}

impl AgencyDirectory {
    pub fn bundled() -> Result<Self, ToolError> {
        Self::parse(Path::new("data/agencies.json"), BUNDLED_AGENCIES)
    }

    pub fn from_file(path: &Path) -> Result<Self, ToolError> {
        let raw = fs::read_to_string(path).map_err(|error| ToolError::AgencyDirectory {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        Self::parse(path, &raw)
    }

    /// The configured file when there is one, the bundled list otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ToolError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::bundled(),
        }
    }

    fn parse(path: &Path, raw: &str) -> Result<Self, ToolError> {
        let agencies: Vec<Agency> =
            serde_json::from_str(raw).map_err(|error| ToolError::AgencyDirectory {
                path: path.to_path_buf(),
                message: error.to_string(),
            })?;
        Ok(Self { agencies })
    }

    pub fn agencies(&self) -> &[Agency] {
        &self.agencies
    }

    pub fn find(&self, id: &str) -> Option<&Agency> {
        self.agencies.iter().find(|agency| agency.id.eq_ignore_ascii_case(id.trim()))
    }

    pub fn len(&self) -> usize {
        self.agencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agencies.is_empty()
    }
}

/// Reads the directory on every call so edits to a configured file show up.
pub struct AgencyIdTool {
    path: Option<PathBuf>,
}

impl AgencyIdTool {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Tool for AgencyIdTool {
    fn name(&self) -> &'static str {
        "get_agency_id"
    }

    fn description(&self) -> &'static str {
        "Retrieves a JSON array of every agency id (acronym) and agency name. Use this tool when \
you need the agency id for filtering documents."
    }

    fn parameters(&self) -> Value {
        empty_schema()
    }

    async fn execute(&self, _input: Value) -> Result<Value> {
        let directory = AgencyDirectory::load(self.path.as_deref())?;
        Ok(serde_json::to_value(directory.agencies())?)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::{AgencyDirectory, AgencyIdTool};
    use crate::error::ToolError;
    use crate::tools::Tool;

    #[test]
    fn bundled_directory_knows_common_agencies() {
        let directory = AgencyDirectory::bundled().expect("bundled list parses");
        assert!(directory.len() > 20);
        assert_eq!(
            directory.find("epa").map(|agency| agency.name.as_str()),
            Some("Environmental Protection Agency")
        );
    }

    #[tokio::test]
    async fn configured_file_replaces_bundled_list() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("agencies.json");
        fs::write(&path, r#"[{"id":"XYZ","name":"Example Agency"}]"#).expect("write");

        let tool = AgencyIdTool::new(Some(path));
        let output = tool.execute(Value::Null).await.expect("agencies");
        assert_eq!(output, json!([{ "id": "XYZ", "name": "Example Agency" }]));
    }

    #[test]
    fn unreadable_file_is_reported_with_its_path() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("missing.json");

        let error = AgencyDirectory::from_file(&path).expect_err("missing file");
        assert!(matches!(error, ToolError::AgencyDirectory { path: ref reported, .. } if *reported == path));
    }
}
