//! Trello provider
//!
//! Searches cards with the Trello REST API.

use super::traits::*;
use crate::config::ProviderConfig;
use crate::error::FetchError;
use crate::network::HttpClient;
use crate::search::SearchContext;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

const DEFAULT_API_URL: &str = "https://api.trello.com/1";

/// Trello card search
pub struct Trello {
    client: HttpClient,
    api_url: String,
    key: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct CardSearch {
    #[serde(default)]
    cards: Vec<Card>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Card {
    #[serde(default)]
    name: String,
    short_url: String,
    #[serde(default)]
    desc: String,
    date_last_activity: Option<String>,
}

impl Trello {
    pub fn new(client: HttpClient, config: &ProviderConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            api_url: base_url(&config.url, Some(DEFAULT_API_URL))?,
            key: config.key.clone(),
            token: config.token.clone(),
        })
    }

    fn request(&self, keyword: &str, page: u32, limit: u32) -> ProviderRequest {
        ProviderRequest::get(format!("{}/search", self.api_url))
            .param("key", &self.key)
            .param("token", &self.token)
            .param("partial", "true")
            .param("modelTypes", "cards")
            .param("card_fields", "name,shortUrl,desc,dateLastActivity")
            .param("cards_page", page.saturating_sub(1))
            .param("cards_limit", limit)
            .param("query", keyword)
    }

    fn entries(&self, search: CardSearch) -> Vec<RawEntry> {
        search
            .cards
            .into_iter()
            .map(|card| {
                let mut entry = RawEntry::new(card.short_url, card.name)
                    .with_description(truncate_description(&card.desc));
                if let Some(date) = card
                    .date_last_activity
                    .as_deref()
                    .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
                {
                    entry = entry.with_date(date.with_timezone(&Utc));
                }
                entry
            })
            .collect()
    }
}

#[async_trait]
impl Searcher for Trello {
    async fn search(
        &self,
        ctx: &SearchContext,
        keyword: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<RawEntry>, FetchError> {
        let search: CardSearch = self
            .client
            .fetch_json(ctx, self.request(keyword, page, limit))
            .await?;
        Ok(self.entries(search))
    }
}
