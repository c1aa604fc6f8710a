//! AnswerHub provider
//!
//! Searches questions through the AnswerHub v2 REST API.

use super::traits::*;
use crate::config::ProviderConfig;
use crate::error::FetchError;
use crate::network::HttpClient;
use crate::search::SearchContext;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;

/// AnswerHub question search
pub struct AnswerHub {
    client: HttpClient,
    url: String,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct NodeList {
    #[serde(default)]
    list: Vec<Node>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Node {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
    author: Option<Author>,
    #[serde(default)]
    creation_date: i64,
}

#[derive(Debug, Default, Deserialize)]
struct Author {
    #[serde(default)]
    username: String,
    #[serde(default)]
    realname: String,
}

impl AnswerHub {
    pub fn new(client: HttpClient, config: &ProviderConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            url: base_url(&config.url, None)?,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn request(&self, keyword: &str, page: u32, limit: u32) -> ProviderRequest {
        let mut request = ProviderRequest::get(format!("{}/services/v2/node.json", self.url))
            .param("page", page)
            .param("pageSize", limit)
            .param("q", format!("{}*", keyword));

        if !self.username.is_empty() || !self.password.is_empty() {
            request = request.basic_auth(&self.username, &self.password);
        }
        request
    }

    fn entries(&self, nodes: NodeList) -> Vec<RawEntry> {
        nodes
            .list
            .into_iter()
            .map(|node| {
                let mut description = truncate_description(&node.body);
                if description.is_empty() {
                    let author = node.author.unwrap_or_default();
                    let who = if author.realname.is_empty() {
                        author.username
                    } else {
                        author.realname
                    };
                    description = format!("Asked by {}", who);
                }

                let mut entry = RawEntry::new(
                    format!("{}/questions/{}/", self.url, node.id),
                    node.title,
                )
                .with_description(description);
                if let Some(date) = Utc.timestamp_millis_opt(node.creation_date).single() {
                    entry = entry.with_date(date);
                }
                entry
            })
            .collect()
    }
}

#[async_trait]
impl Searcher for AnswerHub {
    async fn search(
        &self,
        ctx: &SearchContext,
        keyword: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<RawEntry>, FetchError> {
        let nodes: NodeList = self
            .client
            .fetch_json(ctx, self.request(keyword, page, limit))
            .await?;
        Ok(self.entries(nodes))
    }
}
