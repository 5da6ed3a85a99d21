use std::path::PathBuf;
use std::sync::Arc;

use regulus_client::{ClientError, RegulationsClient, Transport};
use regulus_core::AppConfig;

use crate::agencies::AgencyIdTool;
use crate::agents::HandoffTool;
use crate::api_tools::{
    get_comments, get_dockets, get_documents, AgencyCategoriesTool, CommentDetailsTool,
    DocketDetailsTool, DocumentDetailsTool,
};
use crate::clock::{Clock, CurrentDateTool, SystemClock};
use crate::pdf::{HttpPdfSource, PdfContentTool, PdfTextFetcher, PdfToTextExtractor};
use crate::tools::ToolRegistry;

/// Registers every tool the agent roster refers to.
pub fn standard_registry<T: Transport + 'static>(
    client: Arc<RegulationsClient<T>>,
    clock: Arc<dyn Clock>,
    pdf: PdfTextFetcher,
    agency_directory: Option<PathBuf>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::default();

    registry.register(get_documents(Arc::clone(&client)));
    registry.register(get_comments(Arc::clone(&client)));
    registry.register(get_dockets(Arc::clone(&client)));
    registry.register(DocumentDetailsTool::new(Arc::clone(&client)));
    registry.register(CommentDetailsTool::new(Arc::clone(&client)));
    registry.register(DocketDetailsTool::new(Arc::clone(&client)));
    registry.register(AgencyCategoriesTool::new(client));

    registry.register(CurrentDateTool::new(clock));
    registry.register(AgencyIdTool::new(agency_directory));
    registry.register(PdfContentTool::new(pdf));

    for handoff in HandoffTool::all() {
        registry.register(handoff);
    }

    registry
}

/// Production wiring: reqwest transport, system clock, `pdftotext` extractor.
pub fn registry_from_config(config: &AppConfig) -> Result<ToolRegistry, ClientError> {
    let client = Arc::new(RegulationsClient::from_config(&config.api)?);
    let pdf = PdfTextFetcher::new(
        Arc::new(HttpPdfSource::new()),
        Arc::new(PdfToTextExtractor::new(config.pdf.extractor.clone())),
    )
    .with_scratch_dir(config.pdf.scratch_dir.clone());

    Ok(standard_registry(client, Arc::new(SystemClock), pdf, config.agents.agency_directory.clone()))
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use regulus_client::{ApiRequest, ClientError, RawResponse, RegulationsClient, Transport};
    use serde_json::json;

    use super::standard_registry;
    use crate::agents::AgentRole;
    use crate::clock::FixedClock;
    use crate::error::ToolError;
    use crate::pdf::{PdfSource, PdfTextFetcher, TextExtractor};

    struct Offline;

    #[async_trait]
    impl Transport for Offline {
        async fn get(&self, _request: &ApiRequest) -> Result<RawResponse, ClientError> {
            Err(ClientError::Transport("offline".to_string()))
        }
    }

    #[async_trait]
    impl PdfSource for Offline {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, ToolError> {
            Err(ToolError::Network { url: url.to_string(), message: "offline".to_string() })
        }
    }

    #[async_trait]
    impl TextExtractor for Offline {
        async fn extract(&self, _pdf: &Path) -> Result<String, ToolError> {
            Err(ToolError::Conversion("offline".to_string()))
        }
    }

    fn registry() -> crate::tools::ToolRegistry {
        let client =
            Arc::new(RegulationsClient::new(Offline, "https://api.regulations.gov/v4").expect("base"));
        let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 1, 20).expect("date")));
        let pdf = PdfTextFetcher::new(Arc::new(Offline), Arc::new(Offline));
        standard_registry(client, clock, pdf, None)
    }

    #[test]
    fn every_roster_tool_is_registered() {
        let registry = registry();
        assert_eq!(registry.len(), 14);

        for role in AgentRole::ALL {
            for tool in role.tools() {
                assert!(registry.contains(tool), "{role} refers to unregistered `{tool}`");
            }
        }
    }

    #[tokio::test]
    async fn transport_failures_propagate_to_the_caller() {
        let registry = registry();
        let error = registry
            .call("get_docket_details", json!({ "docketId": "EPA-HQ-OAR-2021-0317" }))
            .await
            .expect_err("offline");
        assert!(matches!(error.downcast_ref::<ClientError>(), Some(ClientError::Transport(_))));

        let date = registry.call("get_current_date", json!({})).await.expect("date");
        assert_eq!(date, json!("2025-01-20"));
    }
}
