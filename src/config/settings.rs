//! Settings structures for Ferret-RS configuration

use crate::search::DEFAULT_QUERY_TIMEOUT;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tera::{Context, Tera, Value};

/// Provider kinds the loader knows how to build
pub const PROVIDER_KINDS: [&str; 5] = ["answerhub", "consul", "github", "slack", "trello"];

/// Main settings structure matching ferret.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub listen: ListenSettings,
    pub outgoing: OutgoingSettings,
    pub providers: Vec<ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search: SearchSettings::default(),
            listen: ListenSettings::default(),
            outgoing: OutgoingSettings::default(),
            providers: default_providers(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    ///
    /// The file is rendered as a template first, so values may be pulled from
    /// the environment with `{{ env(name="FERRET_GITHUB_TOKEN") }}`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML template text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let rendered = render_template(content).context("failed to parse config file")?;
        let settings: Settings =
            serde_yaml::from_str(&rendered).context("failed to unmarshal config file")?;
        Ok(settings)
    }

    /// Merge with environment variables (FERRET_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("FERRET_GOTO_CMD") {
            if !val.is_empty() {
                self.search.goto_cmd = val;
            }
        }
        if let Ok(val) = std::env::var("FERRET_SEARCH_TIMEOUT") {
            if !val.is_empty() {
                self.search.timeout = val;
            }
        }
        if let Ok(val) = std::env::var("FERRET_LISTEN_ADDRESS") {
            self.listen.address = val;
        }
        if let Ok(val) = std::env::var("FERRET_LISTEN_PORT") {
            if let Ok(port) = val.parse() {
                self.listen.port = port;
            }
        }
        if let Ok(val) = std::env::var("FERRET_LISTEN_PROVIDERS") {
            self.listen.providers = val;
        }
    }

    /// Default query timeout, falling back to 5000ms when unparsable
    pub fn query_timeout(&self) -> Duration {
        crate::query::parse_timeout(Some(&self.search.timeout), DEFAULT_QUERY_TIMEOUT)
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchSettings {
    /// Program used to open a result
    pub goto_cmd: String,
    /// Default query timeout, e.g. `5000ms`
    pub timeout: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            goto_cmd: crate::goto::DEFAULT_GOTO_COMMAND.to_string(),
            timeout: "5000ms".to_string(),
        }
    }
}

/// Web API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenSettings {
    /// Bind address
    pub address: String,
    /// Server port
    pub port: u16,
    /// Comma separated providers shown in the UI; empty means all enabled
    pub providers: String,
}

impl Default for ListenSettings {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 3030,
            providers: String::new(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Hard ceiling for a single HTTP request in seconds
    pub request_timeout: f64,
    /// User agent string (none = ferret-rs/<version>)
    pub user_agent: Option<String>,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 30.0,
            user_agent: None,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Individual provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Provider kind (answerhub, consul, github, slack, trello)
    pub provider: String,
    /// Unique name; defaults to the kind
    pub name: String,
    /// Display name; defaults to the name
    pub title: String,
    /// Whether the provider is offered in the UI; unset means enabled
    pub enabled: Option<bool>,
    /// Hide from the UI provider list
    pub noui: bool,
    /// Ordering hint
    pub priority: i64,
    /// Backend base URL
    pub url: String,
    pub username: String,
    pub password: String,
    pub token: String,
    pub key: String,
    /// GitHub user or organization to restrict code search to
    pub search_user: String,
    /// `link|<pattern>|<replacement>`
    pub rewrite: String,
}

impl ProviderConfig {
    /// Effective provider name
    pub fn name(&self) -> &str {
        if self.name.is_empty() {
            &self.provider
        } else {
            &self.name
        }
    }

    /// Effective enabled flag
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Build a provider config from `FERRET_<KIND>_*` environment variables
    ///
    /// The provider is enabled only when its URL or token is set.
    pub fn from_env(kind: &str) -> Self {
        let var = |suffix: &str| {
            std::env::var(format!("FERRET_{}_{}", kind.to_uppercase(), suffix)).unwrap_or_default()
        };

        let url = var("URL");
        let token = var("TOKEN");
        let enabled = !url.is_empty() || !token.is_empty();

        Self {
            provider: kind.to_string(),
            name: kind.to_string(),
            enabled: Some(enabled),
            url,
            username: var("USERNAME"),
            password: var("PASSWORD"),
            token,
            key: var("KEY"),
            search_user: var("SEARCH_USER"),
            rewrite: var("REWRITE"),
            ..Default::default()
        }
    }
}

/// Default provider configurations, one per kind, read from the environment
fn default_providers() -> Vec<ProviderConfig> {
    PROVIDER_KINDS
        .iter()
        .map(|kind| ProviderConfig::from_env(kind))
        .collect()
}

/// Render the config file through tera with an `env` function
fn render_template(content: &str) -> Result<String> {
    let mut tera = Tera::default();
    tera.register_function(
        "env",
        |args: &std::collections::HashMap<String, Value>| -> tera::Result<Value> {
            let value = args
                .get("name")
                .and_then(|n| n.as_str())
                .filter(|n| !n.is_empty())
                .and_then(|n| std::env::var(n).ok())
                .unwrap_or_default();
            Ok(Value::String(value))
        },
    );
    Ok(tera.render_str(content, &Context::new())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider<'a>(settings: &'a Settings, name: &str) -> Option<&'a ProviderConfig> {
        settings.providers.iter().find(|p| p.name() == name)
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.listen.port, 3030);
        assert_eq!(settings.search.timeout, "5000ms");
        assert_eq!(settings.query_timeout(), DEFAULT_QUERY_TIMEOUT);
        assert_eq!(settings.providers.len(), PROVIDER_KINDS.len());
        assert!(provider(&settings, "trello").is_some());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
search:
  gotoCmd: xdg-open
  timeout: 2s
listen:
  port: 8080
  providers: github,slack
providers:
  - provider: github
    url: https://api.github.com
    token: abc
    searchUser: ferret
  - provider: answerhub
    name: wiki
    title: Wiki
    noui: true
    priority: 5
    rewrite: "link|^http://|https://"
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.search.goto_cmd, "xdg-open");
        assert_eq!(settings.search.timeout, "2s");
        assert_eq!(settings.query_timeout(), Duration::from_secs(2));
        assert_eq!(settings.listen.port, 8080);
        assert_eq!(settings.listen.address, "0.0.0.0");
        assert_eq!(settings.providers.len(), 2);

        let github = provider(&settings, "github").unwrap();
        assert_eq!(github.search_user, "ferret");
        assert!(github.is_enabled());

        let wiki = provider(&settings, "wiki").unwrap();
        assert_eq!(wiki.provider, "answerhub");
        assert_eq!(wiki.title, "Wiki");
        assert!(wiki.noui);
        assert_eq!(wiki.priority, 5);
        assert_eq!(wiki.rewrite, "link|^http://|https://");
    }

    #[test]
    fn test_env_template() {
        std::env::set_var("FERRET_TEST_TEMPLATE_TOKEN", "s3cret");
        let yaml = r#"
providers:
  - provider: slack
    token: "{{ env(name="FERRET_TEST_TEMPLATE_TOKEN") }}"
    url: "{{ env(name="FERRET_TEST_TEMPLATE_UNSET") }}"
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.providers[0].token, "s3cret");
        assert_eq!(settings.providers[0].url, "");
    }

    #[test]
    fn test_from_env_enables_configured_kinds() {
        std::env::set_var("FERRET_CONSUL_URL", "http://consul.local:8500");
        let consul = ProviderConfig::from_env("consul");
        assert_eq!(consul.url, "http://consul.local:8500");
        assert!(consul.is_enabled());

        let answerhub = ProviderConfig {
            enabled: Some(false),
            ..ProviderConfig::from_env("answerhub")
        };
        assert!(!answerhub.is_enabled());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(Settings::from_yaml("providers: [").is_err());
    }
}
