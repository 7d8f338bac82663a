//! Pagination module
//!
//! Page data model and the concurrent page aggregator.
//!
//! # Overview
//!
//! [`PageAggregator`] depends only on a "fetch page N" primitive. It fetches
//! page 1, derives the page count from the reported total, fetches the rest
//! concurrently and merges the items in page order. Any failure fails the
//! whole aggregation with that error.

mod aggregator;
mod types;

pub use aggregator::{aggregate, PageAggregator, PageCallback};
pub use types::{
    total_pages, AggregateResult, AggregatorConfig, Concurrency, FailurePolicy, OutputMode,
    PageRequest, PageResult, Pagination, DEFAULT_PAGE_SIZE,
};
