//! Provider registry
//!
//! Populated once at start-up, then shared read-only (usually behind an
//! `Arc`). There is no way to remove or replace a provider.

use super::traits::{Provider, ProviderRegistration};
use crate::error::SearchError;
use std::collections::HashMap;
use tracing::debug;

/// Registry of all available search providers
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    /// Providers by name
    providers: HashMap<String, Provider>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider
    ///
    /// Fails on an empty name or a name that is already taken; the existing
    /// provider is kept in the latter case.
    pub fn register(&mut self, registration: ProviderRegistration) -> Result<(), SearchError> {
        let ProviderRegistration {
            name,
            title,
            enabled,
            noui,
            priority,
            rewrite,
            searcher,
        } = registration;

        if name.is_empty() {
            return Err(SearchError::InvalidProvider {
                name,
                available: self.names(),
            });
        }
        if self.providers.contains_key(&name) {
            return Err(SearchError::DuplicateProvider(name));
        }

        let title = if title.is_empty() { name.clone() } else { title };
        debug!("Registered provider {} ({})", name, title);

        self.providers.insert(
            name.clone(),
            Provider {
                name,
                title,
                enabled,
                noui,
                priority,
                rewrite,
                searcher,
            },
        );
        Ok(())
    }

    /// Get a provider by name
    pub fn provider_by_name(&self, name: &str) -> Result<&Provider, SearchError> {
        self.providers
            .get(name)
            .ok_or_else(|| SearchError::ProviderNotFound(name.to_string()))
    }

    /// All provider names in ascending order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Enabled providers that are not hidden from the UI, by name
    pub fn ui_providers(&self) -> Vec<&Provider> {
        let mut providers: Vec<&Provider> = self
            .providers
            .values()
            .filter(|p| p.enabled && !p.noui)
            .collect();
        providers.sort_by(|a, b| a.name.cmp(&b.name));
        providers
    }

    /// Check if a provider exists
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Get number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::providers::{RawEntry, Searcher};
    use crate::search::SearchContext;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Fixed(&'static str);

    #[async_trait]
    impl Searcher for Fixed {
        async fn search(
            &self,
            _ctx: &SearchContext,
            _keyword: &str,
            _page: u32,
            _limit: u32,
        ) -> Result<Vec<RawEntry>, FetchError> {
            Ok(vec![RawEntry::new("https://example.com", self.0)])
        }
    }

    fn registration(name: &str, marker: &'static str) -> ProviderRegistration {
        ProviderRegistration::new(name, Arc::new(Fixed(marker)))
    }

    #[test]
    fn test_registry() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(registration("slack", "a").title("Slack"))
            .unwrap();

        assert!(registry.contains("slack"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.provider_by_name("slack").unwrap().title, "Slack");
    }

    #[test]
    fn test_title_defaults_to_name() {
        let mut registry = ProviderRegistry::new();
        registry.register(registration("consul", "a")).unwrap();
        assert_eq!(registry.provider_by_name("consul").unwrap().title, "consul");
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = ProviderRegistry::new();
        let err = registry.register(registration("", "a")).unwrap_err();
        assert!(matches!(err, SearchError::InvalidProvider { .. }));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_keeps_first() {
        let mut registry = ProviderRegistry::new();
        registry.register(registration("github", "first")).unwrap();

        let err = registry.register(registration("github", "second")).unwrap_err();
        assert_eq!(err, SearchError::DuplicateProvider("github".to_string()));
        assert_eq!(registry.len(), 1);

        let provider = registry.provider_by_name("github").unwrap();
        let entries = provider
            .searcher
            .search(&SearchContext::background(), "x", 1, 10)
            .await
            .unwrap();
        assert_eq!(entries[0].title.as_deref(), Some("first"));
    }

    #[test]
    fn test_names_sorted_and_unique() {
        let mut registry = ProviderRegistry::new();
        for name in ["trello", "answerhub", "slack", "consul", "github", "slack"] {
            let _ = registry.register(registration(name, "a"));
        }

        let names = registry.names();
        assert_eq!(names, vec!["answerhub", "consul", "github", "slack", "trello"]);
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_not_found() {
        let registry = ProviderRegistry::new();
        assert_eq!(
            registry.provider_by_name("jira").unwrap_err(),
            SearchError::ProviderNotFound("jira".to_string())
        );
    }

    #[test]
    fn test_ui_providers() {
        let mut registry = ProviderRegistry::new();
        registry.register(registration("trello", "a")).unwrap();
        registry.register(registration("github", "a").noui(true)).unwrap();
        registry.register(registration("slack", "a").enabled(false)).unwrap();
        registry.register(registration("answerhub", "a")).unwrap();

        let names: Vec<&str> = registry
            .ui_providers()
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["answerhub", "trello"]);
    }
}
