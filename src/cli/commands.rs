//! CLI commands and argument parsing

use crate::api::Completion;
use crate::config::{ENV_API_TOKEN, ENV_API_TOKEN_SECRET, ENV_BASE_URL};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// SmartSurvey API command-line client
#[derive(Parser, Debug)]
#[command(name = "smartsurvey")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API token
    #[arg(long, global = true, env = ENV_API_TOKEN, hide_env_values = true)]
    pub api_token: Option<String>,

    /// API token secret
    #[arg(long, global = true, env = ENV_API_TOKEN_SECRET, hide_env_values = true)]
    pub api_token_secret: Option<String>,

    /// API base URL
    #[arg(long, global = true, env = ENV_BASE_URL)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List surveys
    Surveys {
        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Show a single survey
    Survey {
        /// Survey id
        survey_id: String,

        /// Fetch the detailed representation
        #[arg(long)]
        detailed: bool,
    },

    /// List responses for a survey
    Responses {
        /// Survey id
        survey_id: String,

        /// Completion filter: partial, completed or both
        #[arg(long)]
        completed: Option<Completion>,

        /// Responses completed no earlier than this (RFC 3339)
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// Responses completed no later than this (RFC 3339)
        #[arg(long)]
        until: Option<DateTime<Utc>>,

        /// Saved filter report id
        #[arg(long)]
        filter_id: Option<u64>,

        /// Tracking link id
        #[arg(long)]
        tracking_link_id: Option<u64>,

        /// Unique (x) value
        #[arg(long)]
        unique_id: Option<u64>,

        /// Return label text instead of indices only
        #[arg(long)]
        include_labels: bool,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Show a single response
    Response {
        /// Survey id
        survey_id: String,

        /// Response id
        response_id: String,
    },

    /// Show a survey folder
    Folder {
        /// Folder id
        folder_id: String,
    },
}

/// Paging options shared by list commands
#[derive(Args, Debug, Clone, Default)]
pub struct PagingArgs {
    /// Page to fetch (ignored with --all)
    #[arg(long)]
    pub page: Option<u32>,

    /// Items per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Sort field (repeatable)
    #[arg(long)]
    pub sort_by: Vec<String>,

    /// Fetch every page
    #[arg(long)]
    pub all: bool,

    /// With --all, print each page as it arrives instead of the merged list
    #[arg(long, requires = "all")]
    pub stream: bool,

    /// With --all, maximum concurrent page fetches (0 = unbounded)
    #[arg(long, requires = "all")]
    pub max_concurrency: Option<usize>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable output
    Pretty,
}
