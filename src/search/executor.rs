//! Query execution
//!
//! Runs one query through validation, a single bounded provider call,
//! normalization, rewriting and sorting, then either returns the results or
//! opens the selected one.

use super::context::SearchContext;
use super::models::{Query, Stage, DEFAULT_QUERY_TIMEOUT};
use crate::error::{FetchError, SearchError};
use crate::goto::{CommandOpener, Opener};
use crate::providers::{Provider, ProviderRegistry};
use crate::results::{sort_by_title, RewriteRule, SearchResult};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Search executor bound to one provider registry
pub struct Search {
    /// Provider registry
    registry: Arc<ProviderRegistry>,
    /// Action used for goto
    opener: Arc<dyn Opener>,
    /// Timeout for queries that do not set one
    default_timeout: Duration,
}

impl Search {
    /// Create a new search executor
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            opener: Arc::new(CommandOpener::default()),
            default_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Set default timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set the goto action
    pub fn with_opener(mut self, opener: Arc<dyn Opener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Execute a query
    ///
    /// On success the returned query carries its results, elapsed time and a
    /// 200 status. When `query.goto` is set, the selected link is opened and
    /// the results are returned only for reference.
    pub async fn execute(&self, ctx: &SearchContext, mut query: Query) -> Result<Query, SearchError> {
        let provider = self.validate(&query).map_err(|e| {
            warn!("Rejected query for {}: {}", query.provider, e);
            e
        })?;

        let results = self.run(ctx, provider, &mut query).await.map_err(|e| {
            warn!("Search on {} failed: {}", provider.name, e);
            e
        })?;
        query.results = results;
        query.http_status = 200;

        info!(
            "Search '{}' on {} returned {} results in {}ms",
            query.keyword,
            provider.name,
            query.results.len(),
            query.elapsed_ms()
        );

        if query.goto != 0 {
            debug!(stage = %Stage::Goto, "Opening result #{}", query.goto);
            self.goto(&query).await?;
        }

        Ok(query)
    }

    fn validate(&self, query: &Query) -> Result<&Provider, SearchError> {
        debug!(stage = %Stage::Validating, provider = %query.provider);

        let provider = self
            .registry
            .provider_by_name(&query.provider)
            .map_err(|_| SearchError::InvalidProvider {
                name: query.provider.clone(),
                available: self.registry.names(),
            })?;

        if query.keyword.is_empty() {
            return Err(SearchError::MissingKeyword);
        }
        if query.page < 1 {
            return Err(SearchError::InvalidParameter {
                name: "page",
                value: query.page,
            });
        }
        if query.limit < 1 {
            return Err(SearchError::InvalidParameter {
                name: "limit",
                value: query.limit,
            });
        }

        Ok(provider)
    }

    async fn run(
        &self,
        ctx: &SearchContext,
        provider: &Provider,
        query: &mut Query,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let timeout = query.effective_timeout(self.default_timeout);
        debug!(stage = %Stage::Dispatching, provider = %provider.name, "timeout {:?}", timeout);

        query.started_at = Some(Utc::now());
        let start = Instant::now();
        let dispatched = tokio::time::Instant::now();
        let child = ctx.child_with_timeout(timeout);
        // A sooner parent deadline is the bound that actually applies
        let budget = match ctx.deadline() {
            Some(parent) => timeout.min(parent.saturating_duration_since(dispatched)),
            None => timeout,
        };

        let raw = provider
            .searcher
            .search(&child, &query.keyword, query.page, query.limit)
            .await
            .map_err(|e| match e {
                FetchError::DeadlineExceeded => SearchError::Timeout(budget),
                FetchError::Canceled => SearchError::Canceled,
                other => SearchError::Provider {
                    provider: provider.name.clone(),
                    message: other.to_string(),
                },
            })?;
        query.elapsed = Some(start.elapsed());

        debug!(stage = %Stage::Normalizing, count = raw.len());
        let mut results = raw
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                SearchResult::from_raw(entry, index, &provider.name, &provider.title)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(rule) = provider.rewrite.as_deref().filter(|r| !r.is_empty()) {
            debug!(stage = %Stage::Rewriting, rule);
            RewriteRule::parse(rule)?.apply(&mut results);
        }

        debug!(stage = %Stage::Sorting);
        sort_by_title(&mut results);

        Ok(results)
    }

    async fn goto(&self, query: &Query) -> Result<(), SearchError> {
        let available = query.results.len();
        if query.goto < 1 || query.goto > available {
            return Err(SearchError::InvalidGotoIndex {
                index: query.goto,
                available,
            });
        }

        let link = &query.results[query.goto - 1].link;
        self.opener
            .open(link)
            .await
            .map_err(|e| SearchError::GotoAction {
                link: link.clone(),
                message: e.to_string(),
            })
    }
}
