//! GitHub code search provider
//!
//! Uses GitHub's official API to search code, optionally restricted to one
//! user or organization.

use super::traits::*;
use crate::config::ProviderConfig;
use crate::error::FetchError;
use crate::network::HttpClient;
use crate::search::SearchContext;
use async_trait::async_trait;
use serde::Deserialize;

const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub code search
pub struct GitHub {
    client: HttpClient,
    api_url: String,
    token: String,
    search_user: String,
}

#[derive(Debug, Deserialize)]
struct CodeSearch {
    #[serde(default)]
    items: Vec<CodeItem>,
}

#[derive(Debug, Deserialize)]
struct CodeItem {
    path: String,
    html_url: String,
    repository: Repository,
}

#[derive(Debug, Deserialize)]
struct Repository {
    full_name: String,
    description: Option<String>,
}

impl GitHub {
    pub fn new(client: HttpClient, config: &ProviderConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            api_url: base_url(&config.url, Some(DEFAULT_API_URL))?,
            token: config.token.clone(),
            search_user: config.search_user.clone(),
        })
    }

    fn request(&self, keyword: &str, page: u32, limit: u32) -> ProviderRequest {
        let q = if self.search_user.is_empty() {
            keyword.to_string()
        } else {
            format!("{} user:{}", keyword, self.search_user)
        };

        let mut request = ProviderRequest::get(format!("{}/search/code", self.api_url))
            .param("page", page)
            .param("per_page", limit)
            .param("q", q);

        if !self.token.is_empty() {
            request = request.header("Authorization", format!("token {}", self.token));
        }
        request
    }

    fn entries(&self, search: CodeSearch) -> Vec<RawEntry> {
        search
            .items
            .into_iter()
            .map(|item| {
                RawEntry::new(
                    item.html_url,
                    format!("{}: {}", item.repository.full_name, item.path),
                )
                .with_description(item.repository.description.unwrap_or_default())
            })
            .collect()
    }
}

#[async_trait]
impl Searcher for GitHub {
    async fn search(
        &self,
        ctx: &SearchContext,
        keyword: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<RawEntry>, FetchError> {
        let search: CodeSearch = self
            .client
            .fetch_json(ctx, self.request(keyword, page, limit))
            .await?;
        Ok(self.entries(search))
    }
}
