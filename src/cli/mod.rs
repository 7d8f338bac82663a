//! CLI module
//!
//! Command-line interface for the SmartSurvey API.
//!
//! # Commands
//!
//! - `surveys` - List surveys (`--all` fetches every page)
//! - `survey` - Show one survey
//! - `responses` - List responses for a survey (`--all` fetches every page)
//! - `response` - Show one response
//! - `folder` - Show a survey folder

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, PagingArgs};
pub use runner::Runner;
