//! Application state shared across handlers

use crate::config::Settings;
use crate::providers::ProviderRegistry;
use crate::search::Search;
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

/// A provider offered to web clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSummary {
    pub name: String,
    pub title: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Query executor
    pub search: Arc<Search>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
    /// Providers the web API accepts
    pub providers: Arc<Vec<ProviderSummary>>,
}

impl AppState {
    /// Create new application state
    ///
    /// Fails when `listen.providers` names a provider that isn't registered.
    pub fn new(settings: &Settings, search: Search) -> Result<Self> {
        let names = parse_provider_list(&settings.listen.providers, search.registry())?;
        let providers = names
            .iter()
            .map(|name| -> Result<ProviderSummary> {
                let provider = search.registry().provider_by_name(name)?;
                Ok(ProviderSummary {
                    name: provider.name.clone(),
                    title: provider.title.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            search: Arc::new(search),
            templates: Arc::new(super::Templates::new()?),
            providers: Arc::new(providers),
        })
    }

    /// Whether the web API accepts queries for `provider`
    pub fn accepts(&self, provider: &str) -> bool {
        self.providers.iter().any(|p| p.name == provider)
    }
}

/// Resolve the comma separated provider list
///
/// An empty list selects every enabled provider that isn't hidden from the UI.
pub fn parse_provider_list(list: &str, registry: &ProviderRegistry) -> Result<Vec<String>> {
    if list.trim().trim_matches(',').is_empty() {
        return Ok(registry
            .ui_providers()
            .into_iter()
            .map(|p| p.name.clone())
            .collect());
    }

    let mut names = Vec::new();
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        registry.provider_by_name(name)?;
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}
