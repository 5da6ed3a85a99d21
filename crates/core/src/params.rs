//! Per-resource search parameters.
//!
//! Field names serialize in camelCase so tool callers use the same names as the
//! upstream API (`agencyId`, `postedDateGe`, `pageSize`, ...).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::normalize::LooseInteger;
use crate::query::{Bound, FilterSet};
use crate::resource::ResourceKind;

/// Common surface of list-request parameters.
pub trait SearchParams {
    fn kind(&self) -> ResourceKind;
    fn filters(&self) -> FilterSet;
    fn sort(&self) -> Option<&str>;
    fn page_number(&self) -> Option<&LooseInteger>;
    fn page_size(&self) -> Option<&LooseInteger>;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentSearch {
    /// Agency acronym, e.g. `EPA` or `FDA`.
    pub agency_id: Option<String>,
    /// Comment period end date (`yyyy-MM-dd`).
    pub comment_end_date: Option<String>,
    pub comment_end_date_ge: Option<String>,
    pub comment_end_date_le: Option<String>,
    /// Docket identifier, e.g. `EPA-HQ-OAR-2021-0317`.
    pub docket_id: Option<String>,
    /// One of `Notice`, `Rule`, `Proposed Rule`, `Supporting & Related Material`, `Other`.
    pub document_type: Option<String>,
    /// Federal Register document number.
    pub fr_doc_num: Option<String>,
    /// Free-text search term.
    pub search_term: Option<String>,
    /// Posted date (`yyyy-MM-dd`).
    pub posted_date: Option<String>,
    pub posted_date_ge: Option<String>,
    pub posted_date_le: Option<String>,
    /// Last modified timestamp (`yyyy-MM-dd HH:mm:ss`).
    pub last_modified_date: Option<String>,
    pub last_modified_date_ge: Option<String>,
    pub last_modified_date_le: Option<String>,
    pub subtype: Option<String>,
    /// Only documents currently open for comment.
    pub within_comment_period: Option<bool>,
    /// Sort field, `-` prefix for descending. Defaults to `-postedDate`.
    pub sort: Option<String>,
    /// Page number, 1 to 20.
    pub page_number: Option<LooseInteger>,
    /// Page size, clamped to 5..=250.
    pub page_size: Option<LooseInteger>,
}

impl SearchParams for DocumentSearch {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Documents
    }

    fn filters(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        filters.insert_opt("agencyId", Bound::Exact, self.agency_id.as_ref());
        filters.insert_opt("commentEndDate", Bound::Exact, self.comment_end_date.as_ref());
        filters.insert_opt("commentEndDate", Bound::AtOrAfter, self.comment_end_date_ge.as_ref());
        filters.insert_opt("commentEndDate", Bound::AtOrBefore, self.comment_end_date_le.as_ref());
        filters.insert_opt("docketId", Bound::Exact, self.docket_id.as_ref());
        filters.insert_opt("documentType", Bound::Exact, self.document_type.as_ref());
        filters.insert_opt("frDocNum", Bound::Exact, self.fr_doc_num.as_ref());
        filters.insert_opt("searchTerm", Bound::Exact, self.search_term.as_ref());
        filters.insert_opt("postedDate", Bound::Exact, self.posted_date.as_ref());
        filters.insert_opt("postedDate", Bound::AtOrAfter, self.posted_date_ge.as_ref());
        filters.insert_opt("postedDate", Bound::AtOrBefore, self.posted_date_le.as_ref());
        filters.insert_opt("lastModifiedDate", Bound::Exact, self.last_modified_date.as_ref());
        filters.insert_opt("lastModifiedDate", Bound::AtOrAfter, self.last_modified_date_ge.as_ref());
        filters.insert_opt("lastModifiedDate", Bound::AtOrBefore, self.last_modified_date_le.as_ref());
        filters.insert_opt("subtype", Bound::Exact, self.subtype.as_ref());
        filters.insert_opt("withinCommentPeriod", Bound::Exact, self.within_comment_period);
        filters
    }

    fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    fn page_number(&self) -> Option<&LooseInteger> {
        self.page_number.as_ref()
    }

    fn page_size(&self) -> Option<&LooseInteger> {
        self.page_size.as_ref()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentSearch {
    /// Agency acronym, e.g. `EPA`.
    pub agency_id: Option<String>,
    /// Object id of the document the comments were submitted on.
    pub comment_on_id: Option<String>,
    pub search_term: Option<String>,
    pub posted_date: Option<String>,
    pub posted_date_ge: Option<String>,
    pub posted_date_le: Option<String>,
    pub last_modified_date: Option<String>,
    pub last_modified_date_ge: Option<String>,
    pub last_modified_date_le: Option<String>,
    /// Sort field, `-` prefix for descending. Defaults to `-postedDate`.
    pub sort: Option<String>,
    pub page_number: Option<LooseInteger>,
    pub page_size: Option<LooseInteger>,
}

impl SearchParams for CommentSearch {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Comments
    }

    fn filters(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        filters.insert_opt("agencyId", Bound::Exact, self.agency_id.as_ref());
        filters.insert_opt("commentOnId", Bound::Exact, self.comment_on_id.as_ref());
        filters.insert_opt("searchTerm", Bound::Exact, self.search_term.as_ref());
        filters.insert_opt("postedDate", Bound::Exact, self.posted_date.as_ref());
        filters.insert_opt("postedDate", Bound::AtOrAfter, self.posted_date_ge.as_ref());
        filters.insert_opt("postedDate", Bound::AtOrBefore, self.posted_date_le.as_ref());
        filters.insert_opt("lastModifiedDate", Bound::Exact, self.last_modified_date.as_ref());
        filters.insert_opt("lastModifiedDate", Bound::AtOrAfter, self.last_modified_date_ge.as_ref());
        filters.insert_opt("lastModifiedDate", Bound::AtOrBefore, self.last_modified_date_le.as_ref());
        filters
    }

    fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    fn page_number(&self) -> Option<&LooseInteger> {
        self.page_number.as_ref()
    }

    fn page_size(&self) -> Option<&LooseInteger> {
        self.page_size.as_ref()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DocketSearch {
    pub agency_id: Option<String>,
    /// `Rulemaking` or `Nonrulemaking`.
    pub docket_type: Option<String>,
    pub search_term: Option<String>,
    pub last_modified_date: Option<String>,
    pub last_modified_date_ge: Option<String>,
    pub last_modified_date_le: Option<String>,
    /// Sort field, `-` prefix for descending. Defaults to `-lastModifiedDate`.
    pub sort: Option<String>,
    pub page_number: Option<LooseInteger>,
    pub page_size: Option<LooseInteger>,
}

impl SearchParams for DocketSearch {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Dockets
    }

    fn filters(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        filters.insert_opt("agencyId", Bound::Exact, self.agency_id.as_ref());
        filters.insert_opt("docketType", Bound::Exact, self.docket_type.as_ref());
        filters.insert_opt("searchTerm", Bound::Exact, self.search_term.as_ref());
        filters.insert_opt("lastModifiedDate", Bound::Exact, self.last_modified_date.as_ref());
        filters.insert_opt("lastModifiedDate", Bound::AtOrAfter, self.last_modified_date_ge.as_ref());
        filters.insert_opt("lastModifiedDate", Bound::AtOrBefore, self.last_modified_date_le.as_ref());
        filters
    }

    fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    fn page_number(&self) -> Option<&LooseInteger> {
        self.page_number.as_ref()
    }

    fn page_size(&self) -> Option<&LooseInteger> {
        self.page_size.as_ref()
    }
}
