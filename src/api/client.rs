//! SmartSurvey API client
//!
//! One method per endpoint, each returning the decoded body with its header
//! metadata. The `all_*` methods drive a [`PageAggregator`] over the paged
//! list endpoints.

use super::types::{ResponsesQuery, SurveyQuery, SurveysQuery};
use crate::config::{ClientConfig, Credentials};
use crate::error::{Error, Result};
use crate::http::{ApiResponse, HttpClient, RequestConfig};
use crate::pagination::{AggregateResult, AggregatorConfig, PageAggregator, PageResult};
use crate::types::JsonValue;
use std::fmt::Display;
use tracing::debug;

/// Client for the SmartSurvey v1 API
#[derive(Debug, Clone)]
pub struct SmartSurveyClient {
    http: HttpClient,
    credentials: Credentials,
    pagination: AggregatorConfig,
}

impl SmartSurveyClient {
    /// Create a client from config
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = HttpClient::with_config(config.http_config())?;
        Ok(Self {
            http,
            credentials: config.credentials,
            pagination: config.pagination,
        })
    }

    /// Create a client configured from the environment
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// The underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// An aggregator preloaded with this client's pagination defaults
    pub fn aggregator<'a, T>(&self) -> PageAggregator<'a, T> {
        PageAggregator::with_config(self.pagination)
    }

    // ========================================================================
    // Surveys
    // ========================================================================

    /// Fetch a page of surveys
    pub async fn get_surveys(&self, query: SurveysQuery) -> Result<ApiResponse<Vec<JsonValue>>> {
        let request = self.authenticate(query.to_request(), query.credentials.as_ref())?;
        let url = self.http.url(&["surveys"])?;
        self.http
            .get_json(url, request, "Failed to get surveys")
            .await
    }

    /// Fetch every survey
    pub async fn all_surveys(
        &self,
        query: SurveysQuery,
        aggregator: PageAggregator<'_, JsonValue>,
    ) -> Result<AggregateResult<JsonValue>> {
        debug!("fetching all surveys");
        aggregator
            .aggregate(|request| {
                let query = query.clone().for_page(request);
                async move { self.get_surveys(query).await.map(PageResult::from) }
            })
            .await
    }

    /// Fetch a single survey
    pub async fn get_survey(
        &self,
        survey_id: impl Display,
        query: SurveyQuery,
    ) -> Result<ApiResponse<JsonValue>> {
        let request = self.authenticate(RequestConfig::new(), query.credentials.as_ref())?;
        let survey_id = survey_id.to_string();
        let url = if query.detailed {
            self.http.url(&["surveys", survey_id.as_str(), "detailed"])?
        } else {
            self.http.url(&["surveys", survey_id.as_str()])?
        };
        self.http.get_json(url, request, "Failed to get survey").await
    }

    // ========================================================================
    // Responses
    // ========================================================================

    /// Fetch a page of responses for a survey
    pub async fn get_responses(
        &self,
        survey_id: impl Display,
        query: ResponsesQuery,
    ) -> Result<ApiResponse<Vec<JsonValue>>> {
        let request = self.authenticate(query.to_request(), query.credentials.as_ref())?;
        let url = self
            .http
            .url(&["surveys", survey_id.to_string().as_str(), "responses"])?;
        self.http
            .get_json(url, request, "Failed to get responses")
            .await
    }

    /// Fetch every response for a survey
    pub async fn all_responses(
        &self,
        survey_id: impl Display,
        query: ResponsesQuery,
        aggregator: PageAggregator<'_, JsonValue>,
    ) -> Result<AggregateResult<JsonValue>> {
        let survey_id = survey_id.to_string();
        debug!(survey_id = %survey_id, "fetching all responses");
        aggregator
            .aggregate(|request| {
                let query = query.clone().for_page(request);
                let survey_id = survey_id.as_str();
                async move {
                    self.get_responses(survey_id, query)
                        .await
                        .map(PageResult::from)
                }
            })
            .await
    }

    /// Fetch a single response
    pub async fn get_response(
        &self,
        survey_id: impl Display,
        response_id: impl Display,
        credentials: Option<&Credentials>,
    ) -> Result<ApiResponse<JsonValue>> {
        let request = self.authenticate(RequestConfig::new(), credentials)?;
        let url = self.http.url(&[
            "surveys".to_string(),
            survey_id.to_string(),
            "responses".to_string(),
            response_id.to_string(),
        ])?;
        self.http
            .get_json(url, request, "Failed to get response")
            .await
    }

    // ========================================================================
    // Folders
    // ========================================================================

    /// Fetch details of a survey folder
    pub async fn get_folder(
        &self,
        folder_id: impl Display,
        credentials: Option<&Credentials>,
    ) -> Result<ApiResponse<JsonValue>> {
        let request = self.authenticate(RequestConfig::new(), credentials)?;
        let url = self
            .http
            .url(&["surveyfolders", folder_id.to_string().as_str(), "detailed"])?;
        self.http.get_json(url, request, "Failed to get folder").await
    }

    /// Add the token pair to a request
    ///
    /// Per-call credentials win only when both halves are present.
    fn authenticate(
        &self,
        request: RequestConfig,
        credentials: Option<&Credentials>,
    ) -> Result<RequestConfig> {
        let credentials = match credentials {
            Some(c) if c.is_complete() => c,
            _ => &self.credentials,
        };

        let token = credentials
            .api_token
            .as_deref()
            .ok_or_else(|| Error::missing_credential("API token"))?;
        let secret = credentials
            .api_token_secret
            .as_deref()
            .ok_or_else(|| Error::missing_credential("API token secret"))?;

        Ok(request
            .query("api_token", token)
            .query("api_token_secret", secret))
    }
}
