use serde::{Deserialize, Serialize};

/// Resource collections exposed by the Regulations.gov v4 API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Documents,
    Comments,
    Dockets,
    AgencyCategories,
}

const DOCUMENT_SORT_FIELDS: &[&str] =
    &["commentEndDate", "postedDate", "lastModifiedDate", "documentId", "title"];
const COMMENT_SORT_FIELDS: &[&str] = &["postedDate", "lastModifiedDate", "documentId"];
const DOCKET_SORT_FIELDS: &[&str] = &["title", "docketId", "lastModifiedDate"];

impl ResourceKind {
    /// Path segment below the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Comments => "comments",
            Self::Dockets => "dockets",
            Self::AgencyCategories => "agency-categories",
        }
    }

    pub fn sort_fields(self) -> &'static [&'static str] {
        match self {
            Self::Documents => DOCUMENT_SORT_FIELDS,
            Self::Comments => COMMENT_SORT_FIELDS,
            Self::Dockets => DOCKET_SORT_FIELDS,
            Self::AgencyCategories => &[],
        }
    }

    /// Sort sent when the caller gives none or gives one outside the whitelist.
    pub fn default_sort(self) -> Option<&'static str> {
        match self {
            Self::Documents | Self::Comments => Some("-postedDate"),
            Self::Dockets => Some("-lastModifiedDate"),
            Self::AgencyCategories => None,
        }
    }

    pub fn supports_sort_field(self, field: &str) -> bool {
        self.sort_fields().contains(&field)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceKind;

    #[test]
    fn every_default_sort_is_whitelisted() {
        for kind in [ResourceKind::Documents, ResourceKind::Comments, ResourceKind::Dockets] {
            let default = kind.default_sort().expect("sortable resource has a default");
            let field = default.trim_start_matches('-');
            assert!(kind.supports_sort_field(field), "{kind} default `{default}` not whitelisted");
        }
    }

    #[test]
    fn agency_categories_are_not_sortable() {
        assert!(ResourceKind::AgencyCategories.sort_fields().is_empty());
        assert_eq!(ResourceKind::AgencyCategories.default_sort(), None);
        assert_eq!(ResourceKind::AgencyCategories.path(), "agency-categories");
    }
}
