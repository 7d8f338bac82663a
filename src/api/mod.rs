//! SmartSurvey API module
//!
//! Endpoint methods for surveys, responses and folders.
//!
//! # Authentication
//!
//! Every request carries `api_token` and `api_token_secret` query parameters.
//! Per-call [`Credentials`](crate::config::Credentials) replace the client's
//! when both halves are set. A missing token or secret fails the call before
//! anything is sent.

mod client;
mod types;

pub use client::SmartSurveyClient;
pub use types::{Completion, ResponsesQuery, SurveyQuery, SurveysQuery};

#[cfg(test)]
mod tests;
