//! One operation per resource type. Arguments are validated and normalized
//! before the transport is touched.

use regulus_core::{
    normalize_page, normalize_sort, require_non_empty, Bound, CommentSearch, DocketSearch,
    DocumentSearch, FilterSet, QueryParams, ResourceKind, SearchParams,
};

use crate::client::RegulationsClient;
use crate::error::ClientError;
use crate::outcome::ApiOutcome;
use crate::transport::Transport;

impl<T: Transport> RegulationsClient<T> {
    /// Lists any sortable, paged resource.
    pub async fn search<P>(&self, params: &P) -> Result<ApiOutcome, ClientError>
    where
        P: SearchParams + Sync,
    {
        let kind = params.kind();
        let page = normalize_page(params.page_number(), params.page_size(), self.page_number_policy())?;
        let sort = normalize_sort(kind, params.sort());

        let mut query = QueryParams::new();
        query.push_filters(&params.filters());
        query.push_sort(sort.as_ref());
        query.push_page(page);

        self.get(&[kind.path()], query).await
    }

    pub async fn get_documents(&self, params: &DocumentSearch) -> Result<ApiOutcome, ClientError> {
        self.search(params).await
    }

    pub async fn get_comments(&self, params: &CommentSearch) -> Result<ApiOutcome, ClientError> {
        self.search(params).await
    }

    pub async fn get_dockets(&self, params: &DocketSearch) -> Result<ApiOutcome, ClientError> {
        self.search(params).await
    }

    pub async fn get_document_details(
        &self,
        document_id: &str,
        include_attachments: bool,
    ) -> Result<ApiOutcome, ClientError> {
        self.details(ResourceKind::Documents, "documentId", document_id, include_attachments).await
    }

    pub async fn get_comment_details(
        &self,
        comment_id: &str,
        include_attachments: bool,
    ) -> Result<ApiOutcome, ClientError> {
        self.details(ResourceKind::Comments, "commentId", comment_id, include_attachments).await
    }

    pub async fn get_docket_details(
        &self,
        docket_id: &str,
        include_attachments: bool,
    ) -> Result<ApiOutcome, ClientError> {
        self.details(ResourceKind::Dockets, "docketId", docket_id, include_attachments).await
    }

    /// Categories an agency files its documents under.
    pub async fn get_agency_categories(&self, acronym: &str) -> Result<ApiOutcome, ClientError> {
        let acronym = require_non_empty("acronym", acronym)?;

        let mut query = QueryParams::new();
        query.push_filters(&FilterSet::new().with("acronym", Bound::Exact, acronym));

        self.get(&[ResourceKind::AgencyCategories.path()], query).await
    }

    async fn details(
        &self,
        kind: ResourceKind,
        field: &'static str,
        id: &str,
        include_attachments: bool,
    ) -> Result<ApiOutcome, ClientError> {
        let id = require_non_empty(field, id)?;

        let mut query = QueryParams::new();
        if include_attachments {
            query.push("include", "attachments");
        }

        self.get(&[kind.path(), id], query).await
    }
}
