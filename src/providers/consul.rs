//! Consul provider
//!
//! Matches the keyword against service names and tags in every datacenter of
//! a Consul catalog. The catalog has no search API, so the matches from all
//! datacenters are merged, sorted and paginated here.

use super::traits::*;
use crate::config::ProviderConfig;
use crate::error::FetchError;
use crate::network::HttpClient;
use crate::results::paginate;
use crate::search::SearchContext;
use async_trait::async_trait;
use futures::future::try_join_all;
use std::collections::BTreeMap;
use tracing::debug;

/// Service name to tags
type Services = BTreeMap<String, Vec<String>>;

/// Consul service catalog search
pub struct Consul {
    client: HttpClient,
    url: String,
}

impl Consul {
    pub fn new(client: HttpClient, config: &ProviderConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            url: base_url(&config.url, None)?,
        })
    }

    fn datacenters_request(&self) -> ProviderRequest {
        ProviderRequest::get(format!("{}/v1/catalog/datacenters", self.url))
    }

    fn services_request(&self, datacenter: &str) -> ProviderRequest {
        ProviderRequest::get(format!("{}/v1/catalog/services", self.url)).param("dc", datacenter)
    }

    fn entries(&self, datacenter: &str, services: Services, keyword: &str) -> Vec<RawEntry> {
        let mut entries = Vec::new();
        for (service, tags) in services {
            let link = format!("{}/ui/#/{}/services/{}", self.url, datacenter, service);
            if tags.is_empty() {
                if service.contains(keyword) {
                    entries.push(RawEntry::new(
                        link,
                        format!("{}.service.{}.consul", service, datacenter),
                    ));
                }
                continue;
            }
            for tag in tags {
                if tag.contains(keyword) || service.contains(keyword) {
                    entries.push(RawEntry::new(
                        link.clone(),
                        format!("{}.{}.service.{}.consul", tag, service, datacenter),
                    ));
                }
            }
        }
        entries
    }
}

#[async_trait]
impl Searcher for Consul {
    async fn search(
        &self,
        ctx: &SearchContext,
        keyword: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<RawEntry>, FetchError> {
        let datacenters: Vec<String> = self.client.fetch_json(ctx, self.datacenters_request()).await?;

        let catalogs = try_join_all(datacenters.iter().map(|datacenter| {
            self.client
                .fetch_json::<Services>(ctx, self.services_request(datacenter))
        }))
        .await?;

        let mut entries = Vec::new();
        for (datacenter, services) in datacenters.iter().zip(catalogs) {
            entries.extend(self.entries(datacenter, services, keyword));
        }
        debug!(
            "Consul matched {} services across {} datacenters",
            entries.len(),
            datacenters.len()
        );

        entries.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(paginate(entries, page, limit))
    }
}
