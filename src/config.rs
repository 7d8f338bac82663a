//! Client configuration
//!
//! Settings can come from a YAML (or JSON) file, from the environment, or be
//! built in code. Environment values override file values.
//!
//! ```yaml
//! base_url: https://api.smartsurvey.io/v1
//! api_token: abc
//! api_token_secret: def
//! timeout_secs: 30
//! pagination:
//!   page_size: 100
//!   concurrency:
//!     limited: 4
//!   failure_policy: drain
//! ```

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::pagination::AggregatorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// SmartSurvey v1 API root
pub const DEFAULT_BASE_URL: &str = "https://api.smartsurvey.io/v1";

/// Environment variable holding the API token
pub const ENV_API_TOKEN: &str = "SMARTSURVEY_API_TOKEN";
/// Environment variable holding the API token secret
pub const ENV_API_TOKEN_SECRET: &str = "SMARTSURVEY_API_TOKEN_SECRET";
/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "SMARTSURVEY_BASE_URL";

// ============================================================================
// Credentials
// ============================================================================

/// API token pair sent as query parameters on every request
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// API token
    #[serde(default)]
    pub api_token: Option<String>,
    /// API token secret
    #[serde(default)]
    pub api_token_secret: Option<String>,
}

impl Credentials {
    /// Create a complete credential pair
    pub fn new(api_token: impl Into<String>, api_token_secret: impl Into<String>) -> Self {
        Self {
            api_token: Some(api_token.into()),
            api_token_secret: Some(api_token_secret.into()),
        }
    }

    /// True when both token and secret are set
    pub fn is_complete(&self) -> bool {
        self.api_token.is_some() && self.api_token_secret.is_some()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("api_token_secret", &self.api_token_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

// ============================================================================
// Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default credentials
    #[serde(flatten)]
    pub credentials: Credentials,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Custom user agent
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Defaults for `all_*` aggregation helpers
    #[serde(default)]
    pub pagination: AggregatorConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            credentials: Credentials::default(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            pagination: AggregatorConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Config with the given credentials and defaults elsewhere
    pub fn with_credentials(
        api_token: impl Into<String>,
        api_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            credentials: Credentials::new(api_token, api_token_secret),
            ..Default::default()
        }
    }

    /// Parse config from a YAML or JSON string
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load config from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Defaults overlaid with environment variables
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Override fields from environment variables that are set
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_vars(|name| std::env::var(name).ok())
    }

    /// Override fields from a variable lookup
    #[must_use]
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.credentials.api_token = Some(token);
        }
        if let Some(secret) = lookup(ENV_API_TOKEN_SECRET) {
            self.credentials.api_token_secret = Some(secret);
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        self
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// HTTP layer settings derived from this config
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(self.timeout());
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }
}
