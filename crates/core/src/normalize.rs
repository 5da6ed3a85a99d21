//! Parameter normalization applied before any request is built.
//!
//! Pagination values arrive from LLM tool calls and may be integers, integral
//! floats, or numeric strings. Anything that cannot be read as an integer is an
//! [`ArgumentError`]. Out-of-range page sizes are clamped; out-of-range page
//! numbers follow [`PageNumberPolicy`]. Sort fields outside a resource whitelist
//! fall back to the resource default instead of failing.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::ArgumentError;
use crate::query::{
    PageRequest, SortDirective, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, PAGE_NUMBER_MAX,
    PAGE_NUMBER_MIN, PAGE_SIZE_MAX, PAGE_SIZE_MIN,
};
use crate::resource::ResourceKind;

/// An integer as supplied by a loosely typed caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LooseInteger {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for LooseInteger {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for LooseInteger {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for LooseInteger {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for LooseInteger {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for LooseInteger {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageNumberPolicy {
    /// Page numbers outside 1..=20 are an [`ArgumentError::OutOfRange`].
    #[default]
    Reject,
    /// Page numbers outside 1..=20 are pulled to the nearest bound.
    Clamp,
}

impl std::str::FromStr for PageNumberPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "clamp" => Ok(Self::Clamp),
            other => Err(format!("unsupported page number policy `{other}` (expected reject|clamp)")),
        }
    }
}

pub fn coerce_integer(field: &'static str, raw: &LooseInteger) -> Result<i64, ArgumentError> {
    match raw {
        LooseInteger::Integer(value) => Ok(*value),
        LooseInteger::Float(value) => {
            let integral = value.is_finite()
                && value.fract() == 0.0
                && *value >= i64::MIN as f64
                && *value <= i64::MAX as f64;
            if integral {
                Ok(*value as i64)
            } else {
                Err(ArgumentError::NotAnInteger { field, value: value.to_string() })
            }
        }
        LooseInteger::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| ArgumentError::NotAnInteger { field, value: text.clone() }),
    }
}

pub fn normalize_page_number(
    raw: Option<&LooseInteger>,
    policy: PageNumberPolicy,
) -> Result<u32, ArgumentError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_PAGE_NUMBER);
    };

    let value = coerce_integer("pageNumber", raw)?;
    let in_range = (PAGE_NUMBER_MIN..=PAGE_NUMBER_MAX).contains(&value);
    let number = match policy {
        PageNumberPolicy::Reject if !in_range => {
            return Err(ArgumentError::OutOfRange {
                field: "pageNumber",
                value,
                min: PAGE_NUMBER_MIN,
                max: PAGE_NUMBER_MAX,
            });
        }
        PageNumberPolicy::Reject => value,
        PageNumberPolicy::Clamp => value.clamp(PAGE_NUMBER_MIN, PAGE_NUMBER_MAX),
    };

    Ok(number as u32)
}

pub fn normalize_page_size(raw: Option<&LooseInteger>) -> Result<u32, ArgumentError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_PAGE_SIZE);
    };

    let value = coerce_integer("pageSize", raw)?;
    Ok(value.clamp(PAGE_SIZE_MIN, PAGE_SIZE_MAX) as u32)
}

pub fn normalize_page(
    number: Option<&LooseInteger>,
    size: Option<&LooseInteger>,
    policy: PageNumberPolicy,
) -> Result<PageRequest, ArgumentError> {
    Ok(PageRequest { number: normalize_page_number(number, policy)?, size: normalize_page_size(size)? })
}

/// Whitelisted sort for `kind`; `None` only for resources without sorting.
pub fn normalize_sort(kind: ResourceKind, raw: Option<&str>) -> Option<SortDirective> {
    let requested = raw.and_then(SortDirective::parse);
    match requested {
        Some(sort) if kind.supports_sort_field(&sort.field) => Some(sort),
        _ => kind.default_sort().and_then(SortDirective::parse),
    }
}

/// Wire form of the normalized document sort.
pub fn normalize_doc_sort(raw: &str) -> String {
    normalize_sort(ResourceKind::Documents, Some(raw)).map(|sort| sort.to_string()).unwrap_or_default()
}
