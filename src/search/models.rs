//! Search query and related data models

use crate::results::SearchResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Timeout applied when a query does not set one
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(5000);

/// One search request and, after execution, its outcome
#[derive(Debug, Clone, Serialize)]
pub struct Query {
    /// Provider name
    pub provider: String,
    /// Search keyword
    pub keyword: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Results per page
    pub limit: u32,
    /// 1-based index of the result to open, 0 for none
    pub goto: usize,
    /// Bound on the provider call
    #[serde(skip)]
    pub timeout: Option<Duration>,
    /// When dispatch began
    pub started_at: Option<DateTime<Utc>>,
    /// Time spent in the provider call
    #[serde(skip)]
    pub elapsed: Option<Duration>,
    /// Outcome code for HTTP callers
    pub http_status: u16,
    /// Normalized, rewritten and sorted results
    pub results: Vec<SearchResult>,
}

impl Query {
    /// Create a query for the first page with default limit
    pub fn new(provider: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            keyword: keyword.into(),
            page: 1,
            limit: 10,
            goto: 0,
            timeout: None,
            started_at: None,
            elapsed: None,
            http_status: 0,
            results: Vec::new(),
        }
    }

    /// Set page number
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set page size
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the result to open
    pub fn with_goto(mut self, goto: usize) -> Self {
        self.goto = goto;
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get effective timeout
    pub fn effective_timeout(&self, default: Duration) -> Duration {
        self.timeout.unwrap_or(default)
    }

    /// Elapsed provider time in whole milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.map(|e| e.as_millis()).unwrap_or_default()
    }
}

/// Executor stages, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Dispatching,
    Normalizing,
    Rewriting,
    Sorting,
    Goto,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Dispatching => "dispatching",
            Self::Normalizing => "normalizing",
            Self::Rewriting => "rewriting",
            Self::Sorting => "sorting",
            Self::Goto => "goto",
        };
        f.write_str(name)
    }
}
