//! Pagination types
//!
//! The page data model shared by the aggregator and the HTTP layer, plus the
//! knobs that control how the aggregator fans out.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Page size used when none (or zero) is configured
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Input to the fetch primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Maximum items per page
    pub page_size: u32,
}

impl PageRequest {
    /// Create a new page request
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Request for the first page
    pub fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }
}

/// Pagination metadata reported alongside a page
///
/// Every field is optional because the server reports them through response
/// headers that may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Page number of this page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size the server applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Number of items in this page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned: Option<u32>,
    /// Total number of items across all pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl Pagination {
    /// Pagination carrying only a total
    pub fn with_total(total: u64) -> Self {
        Self {
            total: Some(total),
            ..Default::default()
        }
    }

    /// True when no field was reported
    pub fn is_empty(&self) -> bool {
        self.page.is_none()
            && self.page_size.is_none()
            && self.returned.is_none()
            && self.total.is_none()
    }
}

/// Output of one page fetch
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    /// Items on this page, in server order
    pub data: Vec<T>,
    /// Pagination metadata
    pub pagination: Pagination,
}

impl<T> PageResult<T> {
    /// Create a page result
    pub fn new(data: Vec<T>, pagination: Pagination) -> Self {
        Self { data, pagination }
    }

    /// Total item count reported by the server, if any
    pub fn total(&self) -> Option<u64> {
        self.pagination.total
    }
}

/// Final outcome of an aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateResult<T> {
    /// Every page's items, concatenated in ascending page order
    Collected(Vec<T>),
    /// Collection was disabled; pages were only delivered to the callback
    Unit,
}

impl<T> AggregateResult<T> {
    /// Check if items were collected
    pub fn is_collected(&self) -> bool {
        matches!(self, Self::Collected(_))
    }

    /// Check if this is the unit result
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Collected items, if any
    pub fn into_data(self) -> Option<Vec<T>> {
        match self {
            Self::Collected(data) => Some(data),
            Self::Unit => None,
        }
    }
}

/// Whether the aggregator accumulates items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Concatenate all pages into [`AggregateResult::Collected`]
    #[default]
    Collect,
    /// Only feed the page callback; finish with [`AggregateResult::Unit`]
    Discard,
}

/// How many page fetches may be outstanding at once
///
/// Serialized as `unbounded` or `{limited: N}`. A bare number is also
/// accepted, with `0` meaning unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "ConcurrencyRepr", into = "ConcurrencyRepr")]
pub enum Concurrency {
    /// Issue every remaining page at once
    #[default]
    Unbounded,
    /// At most this many fetches in flight
    Limited(NonZeroUsize),
}

impl Concurrency {
    /// Build from an optional limit; `None` or zero means unbounded
    pub fn from_limit(limit: Option<usize>) -> Self {
        match limit.and_then(NonZeroUsize::new) {
            Some(n) => Self::Limited(n),
            None => Self::Unbounded,
        }
    }

    /// Effective number of slots for `remaining` outstanding pages
    pub fn slots(&self, remaining: usize) -> usize {
        match self {
            Self::Unbounded => remaining,
            Self::Limited(n) => n.get().min(remaining),
        }
    }
}

// Map form for `Limited` so YAML does not need a `!limited` tag
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ConcurrencyRepr {
    Name(ConcurrencyName),
    Limit(usize),
    Limited { limited: usize },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ConcurrencyName {
    Unbounded,
}

impl From<ConcurrencyRepr> for Concurrency {
    fn from(repr: ConcurrencyRepr) -> Self {
        match repr {
            ConcurrencyRepr::Name(ConcurrencyName::Unbounded) => Self::Unbounded,
            ConcurrencyRepr::Limit(limit) | ConcurrencyRepr::Limited { limited: limit } => {
                Self::from_limit(Some(limit))
            }
        }
    }
}

impl From<Concurrency> for ConcurrencyRepr {
    fn from(concurrency: Concurrency) -> Self {
        match concurrency {
            Concurrency::Unbounded => Self::Name(ConcurrencyName::Unbounded),
            Concurrency::Limited(n) => Self::Limited { limited: n.get() },
        }
    }
}

/// What happens to in-flight sibling fetches once one page fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Let siblings finish and discard their results
    #[default]
    Drain,
    /// Drop siblings immediately
    Cancel,
}

/// Serializable aggregator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Items per page (0 = default)
    pub page_size: u32,
    /// Collect or discard items
    pub mode: OutputMode,
    /// Fan-out limit
    pub concurrency: Concurrency,
    /// Sibling handling on failure
    pub failure_policy: FailurePolicy,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            mode: OutputMode::default(),
            concurrency: Concurrency::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl AggregatorConfig {
    /// Page size with the zero-means-default rule applied
    pub fn effective_page_size(&self) -> u32 {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }
}

/// Number of pages needed to hold `total` items
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    total.div_ceil(u64::from(page_size.max(1)))
}
