//! Response metadata extraction
//!
//! SmartSurvey reports pagination and server identity through `x-ss-*`
//! response headers. Every header is optional.

use crate::pagination::{PageResult, Pagination};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// Header carrying the current page number
pub const HEADER_PAGE: &str = "x-ss-pagination-page";
/// Header carrying the applied page size
pub const HEADER_PAGE_SIZE: &str = "x-ss-pagination-pagesize";
/// Header carrying the number of items returned
pub const HEADER_RETURNED: &str = "x-ss-pagination-returned";
/// Header carrying the total item count
pub const HEADER_TOTAL: &str = "x-ss-pagination-total";
/// Header carrying the API release
pub const HEADER_RELEASE: &str = "x-ss-release";
/// Header carrying the name of the server that handled the request
pub const HEADER_SERVER: &str = "x-ss-server";

/// Metadata parsed from response headers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Pagination fields, present when at least one pagination header was sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// API version number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    /// Server name that processed the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

impl ResponseMeta {
    /// Parse metadata from response headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let pagination = Pagination {
            page: header_number(headers, HEADER_PAGE),
            page_size: header_number(headers, HEADER_PAGE_SIZE),
            returned: header_number(headers, HEADER_RETURNED),
            total: header_number(headers, HEADER_TOTAL),
        };

        Self {
            pagination: (!pagination.is_empty()).then_some(pagination),
            release: header_str(headers, HEADER_RELEASE).map(String::from),
            server: header_str(headers, HEADER_SERVER).map(String::from),
        }
    }
}

/// A decoded response body with its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    /// Decoded JSON body
    pub data: T,
    /// Header metadata
    pub meta: ResponseMeta,
    /// HTTP status code
    pub status: u16,
}

impl<T> From<ApiResponse<Vec<T>>> for PageResult<T> {
    fn from(response: ApiResponse<Vec<T>>) -> Self {
        PageResult::new(
            response.data,
            response.meta.pagination.unwrap_or_default(),
        )
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn header_number<N: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<N> {
    header_str(headers, name).and_then(|s| s.parse().ok())
}
