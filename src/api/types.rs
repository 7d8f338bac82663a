//! Query types for the SmartSurvey endpoints

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::http::RequestConfig;
use crate::pagination::PageRequest;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Surveys
// ============================================================================

/// Query for the survey list
#[derive(Debug, Clone, Default)]
pub struct SurveysQuery {
    /// Page number (server default 1)
    pub page: Option<u32>,
    /// Page size (server default 10)
    pub page_size: Option<u32>,
    /// Fields to sort by
    pub sort_by: Vec<String>,
    /// Per-call credentials
    pub credentials: Option<Credentials>,
}

impl SurveysQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Add a sort field
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by.push(field.into());
        self
    }

    /// Use these credentials instead of the client's
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Copy of this query pointed at one page
    #[must_use]
    pub fn for_page(mut self, request: PageRequest) -> Self {
        self.page = Some(request.page);
        self.page_size = Some(request.page_size);
        self
    }

    pub(crate) fn to_request(&self) -> RequestConfig {
        paging(RequestConfig::new(), self.page, self.page_size, &self.sort_by)
    }
}

/// Options for fetching a single survey
#[derive(Debug, Clone, Default)]
pub struct SurveyQuery {
    /// Fetch the detailed representation
    pub detailed: bool,
    /// Per-call credentials
    pub credentials: Option<Credentials>,
}

impl SurveyQuery {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the detailed representation
    #[must_use]
    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    /// Use these credentials instead of the client's
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Which responses to return by completion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// Partial responses only
    Partial,
    /// Completed responses only
    Completed,
    /// Both partial and completed
    Both,
}

impl Completion {
    /// Wire value of the `completed` parameter
    pub fn as_param(self) -> u8 {
        match self {
            Self::Partial => 0,
            Self::Completed => 1,
            Self::Both => 2,
        }
    }
}

impl FromStr for Completion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "partial" => Ok(Self::Partial),
            "1" | "completed" => Ok(Self::Completed),
            "2" | "both" => Ok(Self::Both),
            other => Err(Error::config(format!(
                "invalid completion '{other}', expected partial, completed or both"
            ))),
        }
    }
}

/// Query for the survey response list
#[derive(Debug, Clone, Default)]
pub struct ResponsesQuery {
    /// Completion state filter
    pub completed: Option<Completion>,
    /// Responses completed no earlier than this
    pub since: Option<DateTime<Utc>>,
    /// Responses completed no later than this
    pub until: Option<DateTime<Utc>>,
    /// Filter report id; other filters are ignored by the server when set
    pub filter_id: Option<u64>,
    /// Tracking link id
    pub tracking_link_id: Option<u64>,
    /// Unique (x) value
    pub unique_id: Option<u64>,
    /// Return label text instead of indices only
    pub include_labels: Option<bool>,
    /// Page number
    pub page: Option<u32>,
    /// Page size
    pub page_size: Option<u32>,
    /// Fields to sort by
    pub sort_by: Vec<String>,
    /// Per-call credentials
    pub credentials: Option<Credentials>,
}

impl ResponsesQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by completion state
    #[must_use]
    pub fn completed(mut self, completed: Completion) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Lower completion-date bound
    #[must_use]
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Upper completion-date bound
    #[must_use]
    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Use a saved filter report
    #[must_use]
    pub fn filter_id(mut self, id: u64) -> Self {
        self.filter_id = Some(id);
        self
    }

    /// Filter by tracking link
    #[must_use]
    pub fn tracking_link_id(mut self, id: u64) -> Self {
        self.tracking_link_id = Some(id);
        self
    }

    /// Filter by unique value
    #[must_use]
    pub fn unique_id(mut self, id: u64) -> Self {
        self.unique_id = Some(id);
        self
    }

    /// Include label text
    #[must_use]
    pub fn include_labels(mut self, include: bool) -> Self {
        self.include_labels = Some(include);
        self
    }

    /// Set the page number
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Add a sort field
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by.push(field.into());
        self
    }

    /// Use these credentials instead of the client's
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Copy of this query pointed at one page
    #[must_use]
    pub fn for_page(mut self, request: PageRequest) -> Self {
        self.page = Some(request.page);
        self.page_size = Some(request.page_size);
        self
    }

    pub(crate) fn to_request(&self) -> RequestConfig {
        let request = RequestConfig::new()
            .query_opt("completed", self.completed.map(Completion::as_param))
            .query_opt("since", self.since.map(format_date))
            .query_opt("until", self.until.map(format_date))
            .query_opt("filter_id", self.filter_id)
            .query_opt("tracking_link_id", self.tracking_link_id)
            .query_opt("unique_id", self.unique_id)
            .query_opt("include_labels", self.include_labels);
        paging(request, self.page, self.page_size, &self.sort_by)
    }
}

fn paging(
    request: RequestConfig,
    page: Option<u32>,
    page_size: Option<u32>,
    sort_by: &[String],
) -> RequestConfig {
    let sort_by = (!sort_by.is_empty()).then(|| sort_by.join(","));
    request
        .query_opt("page", page)
        .query_opt("page_size", page_size)
        .query_opt("sort_by", sort_by)
}

fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
