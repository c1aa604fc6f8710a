//! Slack provider
//!
//! Searches messages with the `search.all` Web API method.

use super::traits::*;
use crate::config::ProviderConfig;
use crate::error::FetchError;
use crate::network::HttpClient;
use crate::search::SearchContext;
use async_trait::async_trait;
use serde::Deserialize;

const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Longest message excerpt used in a title
const MAX_TEXT_CHARS: usize = 120;

/// Slack message search
pub struct Slack {
    client: HttpClient,
    api_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct SearchAll {
    ok: bool,
    error: Option<String>,
    messages: Option<Messages>,
}

#[derive(Debug, Deserialize)]
struct Messages {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
struct Match {
    #[serde(default)]
    username: String,
    #[serde(default)]
    text: String,
    permalink: String,
}

impl Slack {
    pub fn new(client: HttpClient, config: &ProviderConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            api_url: base_url(&config.url, Some(DEFAULT_API_URL))?,
            token: config.token.clone(),
        })
    }

    fn request(&self, keyword: &str, page: u32, limit: u32) -> ProviderRequest {
        ProviderRequest::get(format!("{}/search.all", self.api_url))
            .param("page", page)
            .param("count", limit)
            .param("query", keyword)
            .param("token", &self.token)
    }

    fn entries(&self, search: SearchAll) -> Result<Vec<RawEntry>, FetchError> {
        if !search.ok {
            return Err(FetchError::Api(
                search.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(search
            .messages
            .map(|m| m.matches)
            .unwrap_or_default()
            .into_iter()
            .map(|m| {
                let text: String = m.text.chars().take(MAX_TEXT_CHARS).collect();
                RawEntry::new(m.permalink, format!("{}: {}", m.username, text))
            })
            .collect())
    }
}

#[async_trait]
impl Searcher for Slack {
    async fn search(
        &self,
        ctx: &SearchContext,
        keyword: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<RawEntry>, FetchError> {
        let search: SearchAll = self
            .client
            .fetch_json(ctx, self.request(keyword, page, limit))
            .await?;
        self.entries(search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slack() -> Slack {
        let config = ProviderConfig {
            provider: "slack".to_string(),
            token: "xoxp-1".to_string(),
            ..Default::default()
        };
        Slack::new(HttpClient::new().unwrap(), &config).unwrap()
    }

    #[tokio::test]
    async fn test_slack_request() {
        let request = slack().request("outage", 2, 20);
        assert_eq!(request.url, "https://slack.com/api/search.all");
        assert_eq!(request.param_value("count"), Some("20"));
        assert_eq!(request.param_value("query"), Some("outage"));
        assert_eq!(request.param_value("token"), Some("xoxp-1"));
    }

    #[tokio::test]
    async fn test_slack_entries_truncate_text() {
        let long = "é".repeat(200);
        let search: SearchAll = serde_json::from_value(serde_json::json!({
            "ok": true,
            "messages": {"matches": [
                {"username": "ops", "text": long, "permalink": "https://x.slack.com/p1"}
            ]}
        }))
        .unwrap();

        let entries = slack().entries(search).unwrap();
        let title = entries[0].title.as_deref().unwrap();
        assert!(title.starts_with("ops: "));
        assert_eq!(title.chars().count(), "ops: ".len() + MAX_TEXT_CHARS);
    }

    #[tokio::test]
    async fn test_slack_not_ok() {
        let search: SearchAll =
            serde_json::from_value(serde_json::json!({"ok": false, "error": "invalid_auth"}))
                .unwrap();
        assert_eq!(
            slack().entries(search).unwrap_err(),
            FetchError::Api("invalid_auth".to_string())
        );
    }
}
