//! HTTP client for making requests to search providers

use super::fetch::fetch;
use crate::config::OutgoingSettings;
use crate::error::FetchError;
use crate::providers::{ProviderRequest, ProviderResponse};
use crate::search::SearchContext;
use anyhow::Result;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;

/// HTTP client wrapper shared by all providers
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        let user_agent = settings
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("ferret-rs/{}", crate::VERSION));

        Ok(Self { client, user_agent })
    }

    /// Execute a provider request bound to `ctx`
    ///
    /// The request runs on its own task; if `ctx` finishes first the request is
    /// aborted and [`FetchError::DeadlineExceeded`] or [`FetchError::Canceled`]
    /// is returned.
    pub async fn fetch(
        &self,
        ctx: &SearchContext,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, FetchError> {
        let req_builder = self.build(request);
        fetch(ctx, async move {
            let response = req_builder.send().await?;
            Self::parse_response(response).await
        })
        .await
    }

    /// Execute a request and decode a successful JSON body
    pub async fn fetch_json<T>(
        &self,
        ctx: &SearchContext,
        request: ProviderRequest,
    ) -> std::result::Result<T, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.fetch(ctx, request).await?;
        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }
        response.json()
    }

    fn build(&self, request: ProviderRequest) -> reqwest::RequestBuilder {
        let mut req_builder = self
            .client
            .get(&request.url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json");

        // Add custom headers
        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        // Add query parameters
        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some((username, password)) = request.basic_auth {
            req_builder = req_builder.basic_auth(username, Some(password));
        }

        req_builder
    }

    /// Parse response into ProviderResponse
    async fn parse_response(
        response: Response,
    ) -> std::result::Result<ProviderResponse, FetchError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string(), v.to_string());
            }
        }

        let text = response.text().await?;

        Ok(ProviderResponse {
            status,
            headers,
            text,
            url,
        })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
