//! Tool adapters over [`RegulationsClient`]. Each one parses its argument
//! object, makes one client call and hands back the JSON the client produced,
//! including the `{"error": ..., "status_code": ...}` objects for 404 and 500.

use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use regulus_client::{RegulationsClient, ReqwestTransport, Transport};
use regulus_core::{CommentSearch, DocketSearch, DocumentSearch, SearchParams};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::tools::{parse_args, schema_of, Tool};

const GET_DOCUMENTS: &str = "Searches Regulations.gov documents. Filter by agency, docket, document type, \
Federal Register number, free-text search term, posted/last-modified/comment-end date ranges \
(yyyy-MM-dd; *Ge and *Le bounds are inclusive) and whether the document is open for comment. \
Returns titles, ids, types and posting dates plus paging metadata.";
const GET_COMMENTS: &str = "Searches public comments. Filter by agency, the object id of the document \
commented on (commentOnId), search term and posted/last-modified date ranges.";
const GET_DOCKETS: &str = "Searches dockets, the folders that group a rulemaking's documents. Filter by \
agency, docket type (Rulemaking or Nonrulemaking), search term and last-modified date range.";
const GET_DOCUMENT_DETAILS: &str = "Retrieves detailed information for one document by documentId. Set \
includeAttachments to also list its attachments and their file URLs.";
const GET_COMMENT_DETAILS: &str = "Retrieves detailed information for one comment by commentId.";
const GET_DOCKET_DETAILS: &str = "Retrieves detailed information for one docket by docketId.";
const GET_AGENCY_CATEGORIES: &str = "Lists the document categories an agency uses, by agency acronym.";

/// Lists a paged resource; `P` fixes which one and the accepted filters.
pub struct SearchTool<P, T = ReqwestTransport> {
    name: &'static str,
    description: &'static str,
    client: Arc<RegulationsClient<T>>,
    params: PhantomData<fn() -> P>,
}

impl<P, T> SearchTool<P, T> {
    fn new(name: &'static str, description: &'static str, client: Arc<RegulationsClient<T>>) -> Self {
        Self { name, description, client, params: PhantomData }
    }
}

pub fn get_documents<T>(client: Arc<RegulationsClient<T>>) -> SearchTool<DocumentSearch, T> {
    SearchTool::new("get_documents", GET_DOCUMENTS, client)
}

pub fn get_comments<T>(client: Arc<RegulationsClient<T>>) -> SearchTool<CommentSearch, T> {
    SearchTool::new("get_comments", GET_COMMENTS, client)
}

pub fn get_dockets<T>(client: Arc<RegulationsClient<T>>) -> SearchTool<DocketSearch, T> {
    SearchTool::new("get_dockets", GET_DOCKETS, client)
}

#[async_trait]
impl<P, T> Tool for SearchTool<P, T>
where
    P: SearchParams + DeserializeOwned + JsonSchema + Send + Sync + 'static,
    T: Transport + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn parameters(&self) -> Value {
        schema_of::<P>()
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let params: P = parse_args(self.name, input)?;
        let outcome = self.client.search(&params).await?;
        Ok(outcome.into_json())
    }
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentDetailArgs {
    /// Document id, e.g. `FDA-2009-N-0501-0012`.
    pub document_id: String,
    pub include_attachments: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentDetailArgs {
    /// Comment id, e.g. `HHS-OS-2018-0008-0002`.
    pub comment_id: String,
    pub include_attachments: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DocketDetailArgs {
    /// Docket id, e.g. `EPA-HQ-OAR-2003-0129`.
    pub docket_id: String,
    pub include_attachments: bool,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AgencyCategoryArgs {
    /// Agency acronym, e.g. `EPA`.
    pub acronym: String,
}

pub struct DocumentDetailsTool<T = ReqwestTransport> {
    client: Arc<RegulationsClient<T>>,
}

pub struct CommentDetailsTool<T = ReqwestTransport> {
    client: Arc<RegulationsClient<T>>,
}

pub struct DocketDetailsTool<T = ReqwestTransport> {
    client: Arc<RegulationsClient<T>>,
}

pub struct AgencyCategoriesTool<T = ReqwestTransport> {
    client: Arc<RegulationsClient<T>>,
}

impl<T> DocumentDetailsTool<T> {
    pub fn new(client: Arc<RegulationsClient<T>>) -> Self {
        Self { client }
    }
}

impl<T> CommentDetailsTool<T> {
    pub fn new(client: Arc<RegulationsClient<T>>) -> Self {
        Self { client }
    }
}

impl<T> DocketDetailsTool<T> {
    pub fn new(client: Arc<RegulationsClient<T>>) -> Self {
        Self { client }
    }
}

impl<T> AgencyCategoriesTool<T> {
    pub fn new(client: Arc<RegulationsClient<T>>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: Transport + 'static> Tool for DocumentDetailsTool<T> {
    fn name(&self) -> &'static str {
        "get_document_details"
    }

    fn description(&self) -> &'static str {
        GET_DOCUMENT_DETAILS
    }

    fn parameters(&self) -> Value {
        schema_of::<DocumentDetailArgs>()
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let args: DocumentDetailArgs = parse_args(self.name(), input)?;
        let outcome =
            self.client.get_document_details(&args.document_id, args.include_attachments).await?;
        Ok(outcome.into_json())
    }
}

#[async_trait]
impl<T: Transport + 'static> Tool for CommentDetailsTool<T> {
    fn name(&self) -> &'static str {
        "get_comment_details"
    }

    fn description(&self) -> &'static str {
        GET_COMMENT_DETAILS
    }

    fn parameters(&self) -> Value {
        schema_of::<CommentDetailArgs>()
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let args: CommentDetailArgs = parse_args(self.name(), input)?;
        let outcome =
            self.client.get_comment_details(&args.comment_id, args.include_attachments).await?;
        Ok(outcome.into_json())
    }
}

#[async_trait]
impl<T: Transport + 'static> Tool for DocketDetailsTool<T> {
    fn name(&self) -> &'static str {
        "get_docket_details"
    }

    fn description(&self) -> &'static str {
        GET_DOCKET_DETAILS
    }

    fn parameters(&self) -> Value {
        schema_of::<DocketDetailArgs>()
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let args: DocketDetailArgs = parse_args(self.name(), input)?;
        let outcome =
            self.client.get_docket_details(&args.docket_id, args.include_attachments).await?;
        Ok(outcome.into_json())
    }
}

#[async_trait]
impl<T: Transport + 'static> Tool for AgencyCategoriesTool<T> {
    fn name(&self) -> &'static str {
        "get_agency_categories"
    }

    fn description(&self) -> &'static str {
        GET_AGENCY_CATEGORIES
    }

    fn parameters(&self) -> Value {
        schema_of::<AgencyCategoryArgs>()
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let args: AgencyCategoryArgs = parse_args(self.name(), input)?;
        let outcome = self.client.get_agency_categories(&args.acronym).await?;
        Ok(outcome.into_json())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use regulus_client::{ApiRequest, ClientError, RawResponse, RegulationsClient, Transport};
    use regulus_core::ArgumentError;
    use serde_json::{json, Value};

    use super::{get_documents, DocumentDetailsTool};
    use crate::error::ToolError;
    use crate::tools::Tool;

    struct Canned {
        status: u16,
        body: String,
        calls: AtomicUsize,
        last: Mutex<Option<ApiRequest>>,
    }

    #[async_trait]
    impl Transport for Canned {
        async fn get(&self, request: &ApiRequest) -> Result<RawResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut last) = self.last.lock() {
                *last = Some(request.clone());
            }
            Ok(RawResponse { status: self.status, body: self.body.clone() })
        }
    }

    fn client(status: u16, body: &str) -> Arc<RegulationsClient<Canned>> {
        let transport = Canned {
            status,
            body: body.to_string(),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        };
        Arc::new(RegulationsClient::new(transport, "https://api.regulations.gov/v4").expect("base"))
    }

    #[tokio::test]
    async fn missing_document_renders_error_object() {
        let tool = DocumentDetailsTool::new(client(404, ""));
        let output = tool.execute(json!({ "documentId": "EPA-0000" })).await.expect("soft failure");
        assert_eq!(output, json!({ "error": "Resource not found", "status_code": 404 }));
    }

    #[tokio::test]
    async fn empty_document_id_is_rejected_without_a_request() {
        let client = client(200, "{}");
        let tool = DocumentDetailsTool::new(Arc::clone(&client));

        let error = tool.execute(json!({ "documentId": "" })).await.expect_err("invalid");
        let client_error = error.downcast_ref::<ClientError>().expect("client error");
        assert!(matches!(
            client_error,
            ClientError::InvalidArgument(ArgumentError::MissingRequired { field: "documentId" })
        ));
        assert_eq!(client.transport().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn list_payload_passes_through_untouched() {
        let body = json!({ "data": [{ "id": "d1", "type": "documents", "attributes": {} }], "meta": {} });
        let client = client(200, &body.to_string());
        let tool = get_documents(Arc::clone(&client));

        let output = tool
            .execute(json!({ "searchTerm": "water", "pageNumber": "2", "pageSize": 10.0 }))
            .await
            .expect("ok");
        assert_eq!(output, body);

        let request = client.transport().last.lock().expect("lock").clone().expect("request");
        assert_eq!(request.query.get("filter[searchTerm]"), Some("water"));
        assert_eq!(request.query.get("page[number]"), Some("2"));
        assert_eq!(request.query.get("page[size]"), Some("10"));
    }

    #[tokio::test]
    async fn malformed_arguments_are_invalid_input() {
        let tool = get_documents(client(200, "{}"));
        let error = tool.execute(json!({ "withinCommentPeriod": "maybe" })).await.expect_err("bad");
        assert!(matches!(
            error.downcast_ref::<ToolError>(),
            Some(ToolError::InvalidInput { tool: "get_documents", .. })
        ));
    }

    #[test]
    fn search_schema_lists_camel_case_parameters() {
        let tool = get_documents(client(200, "{}"));
        let schema: Value = tool.parameters();
        let properties = schema.get("properties").expect("object schema");
        assert!(properties.get("agencyId").is_some());
        assert!(properties.get("postedDateGe").is_some());
        assert!(properties.get("pageSize").is_some());
    }
}
