//! Common types used throughout the client
//!
//! Type aliases shared by the endpoint and CLI modules.

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;
