pub mod config;
pub mod errors;
pub mod normalize;
pub mod params;
pub mod query;
pub mod resource;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use errors::{require_non_empty, ArgumentError};
pub use normalize::{
    normalize_doc_sort, normalize_page, normalize_page_number, normalize_page_size,
    normalize_sort, LooseInteger, PageNumberPolicy,
};
pub use params::{CommentSearch, DocketSearch, DocumentSearch, SearchParams};
pub use query::{Bound, FilterSet, FilterValue, PageRequest, QueryParams, SortDirective};
pub use resource::ResourceKind;
