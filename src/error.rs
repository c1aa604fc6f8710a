//! Error types for query execution and provider calls
//!
//! [`SearchError`] is what a caller of the executor sees. [`FetchError`] is the
//! narrower error a provider reports from its single outbound call; the
//! executor translates it into a [`SearchError`].

use std::time::Duration;
use thiserror::Error;

/// Errors produced while registering providers or executing a query
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Provider name is empty or does not resolve for a query
    #[error("invalid search provider. Possible search providers are {}", format_names(.available))]
    InvalidProvider {
        name: String,
        available: Vec<String>,
    },

    #[error("missing keyword")]
    MissingKeyword,

    /// Page or limit below 1
    #[error("invalid {name}: {value}. It should be greater than 0")]
    InvalidParameter { name: &'static str, value: u32 },

    #[error("request exceeded the configured timeout of {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("search was canceled")]
    Canceled,

    #[error("failed to search {provider} due to {message}")]
    Provider { provider: String, message: String },

    #[error("provider {provider} returned a malformed result #{index}: missing {field}")]
    MalformedResult {
        provider: String,
        index: usize,
        field: &'static str,
    },

    #[error("invalid rewrite rule {rule:?}: {message}")]
    Rewrite { rule: String, message: String },

    #[error("invalid result # to go. It should be between 1 and {available}")]
    InvalidGotoIndex { index: usize, available: usize },

    #[error("failed to go to {link} due to {message}. Check FERRET_GOTO_CMD environment variable")]
    GotoAction { link: String, message: String },

    #[error("search provider {0} is already registered")]
    DuplicateProvider(String),

    #[error("provider {0} couldn't be found")]
    ProviderNotFound(String),
}

impl SearchError {
    /// Whether the error was raised before any network access
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidProvider { .. } | Self::MissingKeyword | Self::InvalidParameter { .. }
        )
    }

    /// HTTP status code a web layer should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidProvider { .. }
            | Self::MissingKeyword
            | Self::InvalidParameter { .. }
            | Self::InvalidGotoIndex { .. }
            | Self::ProviderNotFound(_) => 400,
            Self::Timeout(_) => 504,
            _ => 500,
        }
    }
}

fn format_names(names: &[String]) -> String {
    format!("[{}]", names.join(" "))
}

/// Errors a provider reports from its outbound call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The caller's deadline passed before the call completed
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// The caller canceled before the call completed
    #[error("context canceled")]
    Canceled,

    #[error("failed to fetch data. Error: {0}")]
    Request(String),

    #[error("bad response: {0}")]
    Status(u16),

    #[error("failed to unmarshal JSON data. Error: {0}")]
    Decode(String),

    /// The backend answered but reported a failure in its payload
    #[error("backend error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // The client's own request timeout is a deadline too
        if err.is_timeout() {
            return Self::DeadlineExceeded;
        }
        Self::Request(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
