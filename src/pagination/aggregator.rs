//! Concurrent page aggregation
//!
//! Fetches page 1, learns the total from it, then fans out over the remaining
//! pages. Results land in slots indexed by page number so the merged output
//! is ordered by page, never by arrival.

use super::types::{
    total_pages, AggregateResult, AggregatorConfig, Concurrency, FailurePolicy, OutputMode,
    PageRequest, PageResult,
};
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use tracing::{debug, trace, warn};

/// Callback invoked once per successfully fetched page
pub type PageCallback<'a, T> = Box<dyn FnMut(&PageResult<T>) + Send + 'a>;

/// Fetches every page of a paginated resource
///
/// ```rust,ignore
/// let items = PageAggregator::new()
///     .page_size(50)
///     .on_page(|page| println!("{} items", page.data.len()))
///     .aggregate(|req| client.get_surveys(SurveysQuery::new().page(req)))
///     .await?;
/// ```
pub struct PageAggregator<'a, T> {
    config: AggregatorConfig,
    on_page: Option<PageCallback<'a, T>>,
}

impl<'a, T> PageAggregator<'a, T> {
    /// Create an aggregator with default settings
    pub fn new() -> Self {
        Self::with_config(AggregatorConfig::default())
    }

    /// Create an aggregator from explicit settings
    pub fn with_config(config: AggregatorConfig) -> Self {
        Self {
            config,
            on_page: None,
        }
    }

    /// Current settings
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Set the page size (0 falls back to the default)
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// Register the per-page callback
    #[must_use]
    pub fn on_page(mut self, f: impl FnMut(&PageResult<T>) + Send + 'a) -> Self {
        self.on_page = Some(Box::new(f));
        self
    }

    /// Enable or disable collection
    #[must_use]
    pub fn collect(mut self, collect: bool) -> Self {
        self.config.mode = if collect {
            OutputMode::Collect
        } else {
            OutputMode::Discard
        };
        self
    }

    /// Cap the number of concurrent fetches (0 = unbounded)
    #[must_use]
    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.config.concurrency = Concurrency::from_limit(Some(limit));
        self
    }

    /// Choose what happens to siblings after a failure
    #[must_use]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Fetch all pages using `fetch_page`
    ///
    /// The first error from any page is returned as-is. No partial aggregate
    /// is ever produced.
    pub async fn aggregate<E, F, Fut>(mut self, fetch_page: F) -> Result<AggregateResult<T>, E>
    where
        F: Fn(PageRequest) -> Fut,
        Fut: Future<Output = Result<PageResult<T>, E>>,
    {
        let page_size = self.config.effective_page_size();
        let collect = self.config.mode == OutputMode::Collect;

        let first = fetch_page(PageRequest::first(page_size)).await?;
        self.notify(&first);

        let pages = match first.total() {
            Some(total) => total_pages(total, page_size),
            None => {
                warn!("first page reported no total, treating it as the only page");
                1
            }
        };
        debug!(pages, page_size, "first page fetched");

        if pages < 2 {
            return Ok(self.finish(first.data, Vec::new()));
        }

        let last_page = last_page(pages);
        let remaining = (last_page - 1) as usize;
        let mut slots: Vec<Option<Vec<T>>> = if collect {
            std::iter::repeat_with(|| None).take(remaining).collect()
        } else {
            Vec::new()
        };

        let mut pending = 2..=last_page;
        let mut in_flight = FuturesUnordered::new();
        for page in pending.by_ref().take(self.config.concurrency.slots(remaining)) {
            in_flight.push(fetch_tagged(&fetch_page, page, page_size));
        }

        let mut failure = None;
        while let Some((page, outcome)) = in_flight.next().await {
            match outcome {
                Ok(result) => {
                    trace!(page, items = result.data.len(), "page fetched");
                    self.notify(&result);
                    if collect && failure.is_none() {
                        slots[(page - 2) as usize] = Some(result.data);
                    }
                }
                Err(err) => {
                    warn!(page, "page fetch failed, aborting aggregation");
                    if self.config.failure_policy == FailurePolicy::Cancel {
                        return Err(err);
                    }
                    failure.get_or_insert(err);
                }
            }

            if failure.is_none() {
                if let Some(next) = pending.next() {
                    in_flight.push(fetch_tagged(&fetch_page, next, page_size));
                }
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }

        debug!(pages, "all pages fetched");
        Ok(self.finish(first.data, slots))
    }

    fn notify(&mut self, page: &PageResult<T>) {
        if let Some(on_page) = self.on_page.as_mut() {
            on_page(page);
        }
    }

    fn finish(&self, first: Vec<T>, rest: Vec<Option<Vec<T>>>) -> AggregateResult<T> {
        match self.config.mode {
            OutputMode::Collect => {
                let mut data = first;
                for slot in rest {
                    data.extend(slot.into_iter().flatten());
                }
                AggregateResult::Collected(data)
            }
            OutputMode::Discard => AggregateResult::Unit,
        }
    }
}

impl<T> Default for PageAggregator<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for PageAggregator<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageAggregator")
            .field("config", &self.config)
            .field("has_on_page", &self.on_page.is_some())
            .finish()
    }
}

/// Fetch every page with `aggregator`'s settings
pub async fn aggregate<'a, T, E, F, Fut>(
    fetch_page: F,
    aggregator: PageAggregator<'a, T>,
) -> Result<AggregateResult<T>, E>
where
    F: Fn(PageRequest) -> Fut,
    Fut: Future<Output = Result<PageResult<T>, E>>,
{
    aggregator.aggregate(fetch_page).await
}

/// Last page number to request, clamped to what a `PageRequest` can carry
pub(crate) fn last_page(pages: u64) -> u32 {
    u32::try_from(pages).unwrap_or_else(|_| {
        warn!(
            pages,
            limit = u32::MAX,
            "reported total needs more pages than can be requested, aggregate will be incomplete"
        );
        u32::MAX
    })
}

// Single construction site so every in-flight future has the same type.
fn fetch_tagged<T, E, F, Fut>(
    fetch_page: &F,
    page: u32,
    page_size: u32,
) -> impl Future<Output = (u32, Result<PageResult<T>, E>)>
where
    F: Fn(PageRequest) -> Fut,
    Fut: Future<Output = Result<PageResult<T>, E>>,
{
    let fut = fetch_page(PageRequest::new(page, page_size));
    async move { (page, fut.await) }
}
