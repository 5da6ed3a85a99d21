//! Query-string building blocks for the bracketed JSON:API filter convention:
//! `filter[field]`, `filter[field][ge]`, `filter[field][le]`, `sort`,
//! `page[number]`, `page[size]` and `include`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

pub const PAGE_NUMBER_MIN: i64 = 1;
pub const PAGE_NUMBER_MAX: i64 = 20;
pub const PAGE_SIZE_MIN: i64 = 5;
pub const PAGE_SIZE_MAX: i64 = 250;
pub const DEFAULT_PAGE_NUMBER: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Date(NaiveDate),
    Flag(bool),
}

impl FilterValue {
    /// Wire form of the value, or `None` when it must be left out of the query.
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Self::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
            Self::Flag(flag) => Some(if *flag { "true" } else { "false" }.to_string()),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for FilterValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Comparison attached to a filter key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    AtOrAfter,
    AtOrBefore,
}

impl Bound {
    fn suffix(self) -> &'static str {
        match self {
            Self::Exact => "",
            Self::AtOrAfter => "[ge]",
            Self::AtOrBefore => "[le]",
        }
    }
}

pub fn filter_key(field: &str, bound: Bound) -> String {
    format!("filter[{field}]{}", bound.suffix())
}

/// Filter constraints for one list request. Empty values never enter the set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSet {
    entries: BTreeMap<String, String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the value was kept.
    pub fn insert(&mut self, field: &str, bound: Bound, value: impl Into<FilterValue>) -> bool {
        match value.into().render() {
            Some(rendered) => {
                self.entries.insert(filter_key(field, bound), rendered);
                true
            }
            None => false,
        }
    }

    pub fn insert_opt<V>(&mut self, field: &str, bound: Bound, value: Option<V>) -> bool
    where
        V: Into<FilterValue>,
    {
        match value {
            Some(value) => self.insert(field, bound, value),
            None => false,
        }
    }

    pub fn with(mut self, field: &str, bound: Bound, value: impl Into<FilterValue>) -> Self {
        self.insert(field, bound, value);
        self
    }

    pub fn get(&self, field: &str, bound: Bound) -> Option<&str> {
        self.entries.get(&filter_key(field, bound)).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A whitelisted sort field, optionally descending (`-` prefix on the wire).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortDirective {
    pub field: String,
    pub descending: bool,
}

impl SortDirective {
    /// Splits `-field` / `field`; blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let (field, descending) = match trimmed.strip_prefix('-') {
            Some(rest) => (rest.trim(), true),
            None => (trimmed, false),
        };
        (!field.is_empty()).then(|| Self { field: field.to_string(), descending })
    }
}

impl fmt::Display for SortDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { number: DEFAULT_PAGE_NUMBER, size: DEFAULT_PAGE_SIZE }
    }
}

/// Ordered query parameters for one GET request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn push_filters(&mut self, filters: &FilterSet) {
        for (key, value) in filters.iter() {
            self.push(key, value);
        }
    }

    pub fn push_sort(&mut self, sort: Option<&SortDirective>) {
        if let Some(sort) = sort {
            self.push("sort", sort.to_string());
        }
    }

    pub fn push_page(&mut self, page: PageRequest) {
        self.push("page[number]", page.number.to_string());
        self.push("page[size]", page.size.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(candidate, _)| candidate == key).map(|(_, value)| value.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> =
            self.0.iter().map(|(key, value)| format!("{key}={value}")).collect();
        f.write_str(&rendered.join("&"))
    }
}
