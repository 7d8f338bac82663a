// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # SmartSurvey client
//!
//! An async client for the SmartSurvey v1 API with a concurrent,
//! order-preserving page aggregator.
//!
//! ## Features
//!
//! - **Endpoints**: Surveys, responses and folders as typed query builders
//! - **Page Aggregation**: Fetch page 1, then every remaining page at once
//! - **Ordered Merge**: Items come back in page order whatever the arrival order
//! - **Streaming**: Per-page callback with optional fire-and-forget mode
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use smartsurvey::api::{SmartSurveyClient, SurveysQuery};
//! use smartsurvey::config::ClientConfig;
//! use smartsurvey::pagination::PageAggregator;
//!
//! #[tokio::main]
//! async fn main() -> smartsurvey::Result<()> {
//!     let client = SmartSurveyClient::new(ClientConfig::with_credentials("token", "secret"))?;
//!
//!     let surveys = client
//!         .all_surveys(SurveysQuery::new(), PageAggregator::new().page_size(100))
//!         .await?
//!         .into_data()
//!         .unwrap_or_default();
//!
//!     println!("{} surveys", surveys.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  SmartSurveyClient (api)                 │
//! │   get_surveys  get_survey  get_responses  get_response   │
//! │   get_folder   all_surveys  all_responses                │
//! └─────────────┬───────────────────────────┬────────────────┘
//!               │                           │
//! ┌─────────────┴─────────────┐ ┌───────────┴────────────────┐
//! │        HTTP (http)        │ │   PageAggregator           │
//! │ GET/JSON, API errors,     │ │   (pagination)             │
//! │ x-ss-* response metadata  │ │ page 1 → fan-out 2..N      │
//! └───────────────────────────┘ │ slots ordered by page      │
//!                               └────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// HTTP request layer
pub mod http;

/// Page model and concurrent aggregator
pub mod pagination;

/// SmartSurvey endpoints
pub mod api;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use api::SmartSurveyClient;
pub use config::{ClientConfig, Credentials};
pub use pagination::{aggregate, AggregateResult, PageAggregator, PageRequest, PageResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
