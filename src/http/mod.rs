//! HTTP client module
//!
//! The request layer the SmartSurvey endpoints are built on.
//!
//! # Features
//!
//! - **JSON GET**: Query parameters, headers, per-request timeout
//! - **API Errors**: Non-200 responses mapped to [`crate::Error::Api`]
//! - **Response Metadata**: `x-ss-*` pagination and server headers

mod client;
mod meta;

pub use client::{api_error, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use meta::{
    ApiResponse, ResponseMeta, HEADER_PAGE, HEADER_PAGE_SIZE, HEADER_RELEASE, HEADER_RETURNED,
    HEADER_SERVER, HEADER_TOTAL,
};
