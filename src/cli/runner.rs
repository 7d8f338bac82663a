//! CLI runner - executes commands

use crate::api::{ResponsesQuery, SmartSurveyClient, SurveyQuery, SurveysQuery};
use crate::cli::commands::{Cli, Commands, OutputFormat, PagingArgs};
use crate::config::ClientConfig;
use crate::http::ResponseMeta;
use crate::pagination::{AggregateResult, Concurrency, PageAggregator};
use crate::types::JsonValue;
use anyhow::{Context, Result};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = self.client()?;

        match &self.cli.command {
            Commands::Surveys { paging } => self.surveys(&client, paging).await,
            Commands::Survey {
                survey_id,
                detailed,
            } => {
                let response = client
                    .get_survey(survey_id, SurveyQuery::new().detailed(*detailed))
                    .await?;
                self.output_value(&response.data);
                Ok(())
            }
            Commands::Responses {
                survey_id,
                completed,
                since,
                until,
                filter_id,
                tracking_link_id,
                unique_id,
                include_labels,
                paging,
            } => {
                let query = ResponsesQuery {
                    completed: *completed,
                    since: *since,
                    until: *until,
                    filter_id: *filter_id,
                    tracking_link_id: *tracking_link_id,
                    unique_id: *unique_id,
                    include_labels: include_labels.then_some(true),
                    page: paging.page,
                    page_size: paging.page_size,
                    sort_by: paging.sort_by.clone(),
                    credentials: None,
                };
                self.responses(&client, survey_id, query, paging).await
            }
            Commands::Response {
                survey_id,
                response_id,
            } => {
                let response = client.get_response(survey_id, response_id, None).await?;
                self.output_value(&response.data);
                Ok(())
            }
            Commands::Folder { folder_id } => {
                let response = client.get_folder(folder_id, None).await?;
                self.output_value(&response.data);
                Ok(())
            }
        }
    }

    /// Resolve config: file, then environment and flags
    pub(crate) fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => ClientConfig::default(),
        };

        // Flags already carry their environment fallbacks
        if let Some(token) = &self.cli.api_token {
            config.credentials.api_token = Some(token.clone());
        }
        if let Some(secret) = &self.cli.api_token_secret {
            config.credentials.api_token_secret = Some(secret.clone());
        }
        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }

        Ok(config)
    }

    fn client(&self) -> Result<SmartSurveyClient> {
        let config = self.client_config()?;
        SmartSurveyClient::new(config).context("building HTTP client")
    }

    /// Aggregator for `--all`, layered over the client's defaults
    fn aggregator<'a>(
        &'a self,
        client: &SmartSurveyClient,
        paging: &PagingArgs,
    ) -> PageAggregator<'a, JsonValue> {
        let mut aggregator: PageAggregator<'a, JsonValue> = client.aggregator();
        if let Some(size) = paging.page_size {
            aggregator = aggregator.page_size(size);
        }
        if let Some(limit) = paging.max_concurrency {
            aggregator = aggregator.max_concurrency(limit);
        }
        if paging.stream {
            aggregator = aggregator
                .collect(false)
                .on_page(move |page| self.output_items(&page.data));
        }
        aggregator
    }

    async fn surveys(&self, client: &SmartSurveyClient, paging: &PagingArgs) -> Result<()> {
        let query = SurveysQuery {
            page: paging.page,
            page_size: paging.page_size,
            sort_by: paging.sort_by.clone(),
            credentials: None,
        };

        if paging.all {
            let aggregator = self.aggregator(client, paging);
            log_fan_out(aggregator.config().concurrency);
            let result = client.all_surveys(query, aggregator).await?;
            self.output_aggregate(result);
        } else {
            let response = client.get_surveys(query).await?;
            log_meta(&response.meta);
            self.output_items(&response.data);
        }
        Ok(())
    }

    async fn responses(
        &self,
        client: &SmartSurveyClient,
        survey_id: &str,
        query: ResponsesQuery,
        paging: &PagingArgs,
    ) -> Result<()> {
        if paging.all {
            let aggregator = self.aggregator(client, paging);
            log_fan_out(aggregator.config().concurrency);
            let result = client.all_responses(survey_id, query, aggregator).await?;
            self.output_aggregate(result);
        } else {
            let response = client.get_responses(survey_id, query).await?;
            log_meta(&response.meta);
            self.output_items(&response.data);
        }
        Ok(())
    }

    fn output_aggregate(&self, result: AggregateResult<JsonValue>) {
        match result {
            AggregateResult::Collected(items) => {
                info!(items = items.len(), "fetched all pages");
                self.output_items(&items);
            }
            AggregateResult::Unit => info!("streamed all pages"),
        }
    }

    fn output_items(&self, items: &[JsonValue]) {
        for item in items {
            self.output_value(item);
        }
    }

    fn output_value(&self, value: &JsonValue) {
        match self.cli.format {
            OutputFormat::Json => println!("{value}"),
            OutputFormat::Pretty => println!("{value:#}"),
        }
    }
}

fn log_meta(meta: &ResponseMeta) {
    if let Some(pagination) = &meta.pagination {
        info!(
            page = ?pagination.page,
            returned = ?pagination.returned,
            total = ?pagination.total,
            "fetched page"
        );
    }
}

fn log_fan_out(concurrency: Concurrency) {
    match concurrency {
        Concurrency::Unbounded => info!("fetching all pages, unbounded concurrency"),
        Concurrency::Limited(n) => info!(limit = n.get(), "fetching all pages"),
    }
}
