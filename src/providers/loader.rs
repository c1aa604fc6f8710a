//! Provider loader for building the registry from configuration

use super::registry::ProviderRegistry;
use super::traits::{ProviderRegistration, Searcher};
use super::{answerhub, consul, github, slack, trello};
use crate::config::{ProviderConfig, Settings};
use crate::network::HttpClient;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Loader for initializing providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Load all configured providers
    ///
    /// An unknown provider kind or a registration failure aborts loading.
    pub fn load(settings: &Settings, client: HttpClient) -> Result<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();

        for config in &settings.providers {
            let searcher = Self::create_searcher(config, client.clone())
                .with_context(|| format!("failed to load provider {}", config.name()))?;

            let registration = ProviderRegistration::new(config.name(), searcher)
                .title(config.title.clone())
                .enabled(config.is_enabled())
                .noui(config.noui)
                .priority(config.priority)
                .rewrite(config.rewrite.clone());
            registry.register(registration)?;

            info!(
                "Loaded provider: {} ({}{})",
                config.name(),
                config.provider,
                if config.is_enabled() { "" } else { ", disabled" }
            );
        }

        info!("Loaded {} providers", registry.len());
        Ok(registry)
    }

    /// Create a searcher by provider kind
    fn create_searcher(config: &ProviderConfig, client: HttpClient) -> Result<Arc<dyn Searcher>> {
        let searcher: Arc<dyn Searcher> = match config.provider.as_str() {
            "answerhub" => Arc::new(answerhub::AnswerHub::new(client, config)?),
            "consul" => Arc::new(consul::Consul::new(client, config)?),
            "github" => Arc::new(github::GitHub::new(client, config)?),
            "slack" => Arc::new(slack::Slack::new(client, config)?),
            "trello" => Arc::new(trello::Trello::new(client, config)?),
            other => anyhow::bail!("unknown provider kind: {:?}", other),
        };
        Ok(searcher)
    }
}
