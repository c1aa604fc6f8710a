//! Provider traits and types

use crate::error::FetchError;
use crate::search::SearchContext;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// One hit as returned by a provider, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub link: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl RawEntry {
    pub fn new(link: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// HTTP request to be made by a provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// URL to request
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters, in insertion order
    pub params: Vec<(String, String)>,
    /// Basic auth credentials
    pub basic_auth: Option<(String, String)>,
}

impl ProviderRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            params: Vec::new(),
            basic_auth: None,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Set basic auth credentials
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some((username.into(), password.into()));
        self
    }

    /// Look up a query parameter
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response from a provider request
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl ProviderResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, FetchError> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Search capability every provider implements
///
/// Implementations make their outbound calls through
/// [`HttpClient::fetch`](crate::network::HttpClient::fetch) so that `ctx`
/// can abort them.
#[async_trait]
pub trait Searcher: Send + Sync {
    async fn search(
        &self,
        ctx: &SearchContext,
        keyword: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<RawEntry>, FetchError>;
}

/// Registration record an adapter hands to the registry
#[derive(Clone)]
pub struct ProviderRegistration {
    pub name: String,
    pub title: String,
    pub enabled: bool,
    /// Hidden from the web UI provider list
    pub noui: bool,
    pub priority: i64,
    /// `link|<pattern>|<replacement>`
    pub rewrite: Option<String>,
    pub searcher: Arc<dyn Searcher>,
}

impl ProviderRegistration {
    pub fn new(name: impl Into<String>, searcher: Arc<dyn Searcher>) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            enabled: true,
            noui: false,
            priority: 0,
            rewrite: None,
            searcher,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn noui(mut self, noui: bool) -> Self {
        self.noui = noui;
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn rewrite(mut self, rule: impl Into<String>) -> Self {
        let rule = rule.into();
        self.rewrite = if rule.is_empty() { None } else { Some(rule) };
        self
    }
}

/// A registered provider
#[derive(Clone)]
pub struct Provider {
    pub name: String,
    pub title: String,
    pub enabled: bool,
    pub noui: bool,
    pub priority: i64,
    pub rewrite: Option<String>,
    pub searcher: Arc<dyn Searcher>,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("enabled", &self.enabled)
            .field("noui", &self.noui)
            .field("priority", &self.priority)
            .field("rewrite", &self.rewrite)
            .finish()
    }
}

/// Normalize a configured base URL, falling back to `default` when empty
///
/// An empty result is allowed so that unconfigured providers can still be
/// registered; their calls fail at request time.
pub(crate) fn base_url(configured: &str, default: Option<&str>) -> anyhow::Result<String> {
    let trimmed = configured.trim().trim_end_matches('/');
    let url = if trimmed.is_empty() {
        default.unwrap_or_default()
    } else {
        trimmed
    };
    if !url.is_empty() {
        Url::parse(url).map_err(|e| anyhow::anyhow!("invalid provider url {:?}: {}", url, e))?;
    }
    Ok(url.to_string())
}

/// Cut `text` to at most 255 characters, ending in "..." when shortened
pub(crate) fn truncate_description(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() > 255 {
        let mut short: String = trimmed.chars().take(252).collect();
        short.push_str("...");
        short
    } else {
        trimmed.to_string()
    }
}
