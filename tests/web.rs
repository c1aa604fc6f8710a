//! Web API tests driven through the router with `tower::ServiceExt::oneshot`

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use ferret_rs::{
    config::Settings,
    network::fetch,
    providers::{ProviderRegistration, ProviderRegistry, RawEntry, Searcher},
    search::{Search, SearchContext},
    web::{create_router, parse_provider_list, AppState},
    FetchError,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct StaticSearcher(Vec<RawEntry>);

#[async_trait]
impl Searcher for StaticSearcher {
    async fn search(
        &self,
        _ctx: &SearchContext,
        _keyword: &str,
        _page: u32,
        _limit: u32,
    ) -> Result<Vec<RawEntry>, FetchError> {
        Ok(self.0.clone())
    }
}

struct StalledSearcher;

#[async_trait]
impl Searcher for StalledSearcher {
    async fn search(
        &self,
        ctx: &SearchContext,
        _keyword: &str,
        _page: u32,
        _limit: u32,
    ) -> Result<Vec<RawEntry>, FetchError> {
        fetch(ctx, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        })
        .await
    }
}

fn registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry
        .register(
            ProviderRegistration::new(
                "wiki",
                Arc::new(StaticSearcher(vec![
                    RawEntry::new("https://wiki/2", "Zebra"),
                    RawEntry::new("https://wiki/1", "Aardvark").with_description("first"),
                ])),
            )
            .title("Wiki"),
        )
        .unwrap();
    registry
        .register(ProviderRegistration::new("slow", Arc::new(StalledSearcher)).title("Slow"))
        .unwrap();
    registry
        .register(
            ProviderRegistration::new("hidden", Arc::new(StaticSearcher(Vec::new()))).noui(true),
        )
        .unwrap();
    registry
        .register(
            ProviderRegistration::new("off", Arc::new(StaticSearcher(Vec::new()))).enabled(false),
        )
        .unwrap();
    registry
}

fn app_with(providers: &str) -> anyhow::Result<Router> {
    let mut settings = Settings::default();
    settings.listen.providers = providers.to_string();
    let search = Search::new(Arc::new(registry())).with_timeout(Duration::from_secs(5));
    Ok(create_router(AppState::new(&settings, search)?))
}

fn app() -> Router {
    app_with("").unwrap()
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, _, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], ferret_rs::VERSION);
}

#[tokio::test]
async fn test_providers_lists_enabled_ui_providers() {
    let (status, _, body) = get(app(), "/providers").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"name": "slow", "title": "Slow"},
            {"name": "wiki", "title": "Wiki"}
        ])
    );
}

#[tokio::test]
async fn test_providers_from_explicit_list() {
    let (_, _, body) = get(app_with("hidden, wiki,").unwrap(), "/providers").await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["name"], "hidden");
    assert_eq!(json[0]["title"], "hidden");
}

#[tokio::test]
async fn test_unknown_listen_provider_fails_startup() {
    assert!(app_with("wiki,jira").is_err());
    assert!(parse_provider_list("jira", &registry()).is_err());
}

#[tokio::test]
async fn test_search_returns_sorted_results() {
    let (status, content_type, body) = get(app(), "/search?provider=wiki&keyword=a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json[0]["title"], "Aardvark");
    assert_eq!(json[0]["description"], "first");
    assert_eq!(json[0]["from"], "Wiki");
    assert_eq!(json[1]["title"], "Zebra");
}

#[tokio::test]
async fn test_search_pretty_output() {
    let (_, _, body) = get(app(), "/search?provider=wiki&keyword=a&output=pretty").await;
    assert!(body.starts_with("[\n  {"));
}

#[tokio::test]
async fn test_search_rejects_provider_outside_ui_list() {
    for uri in ["/search?provider=hidden&keyword=a", "/search?keyword=a"] {
        let (status, _, body) = get(app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["statusCode"], 400);
        assert_eq!(json["error"], "Bad Request");
        assert_eq!(json["message"], "invalid provider");
    }
}

#[tokio::test]
async fn test_search_missing_keyword() {
    let (status, _, body) = get(app(), "/search?provider=wiki").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["message"], "missing keyword");
}

#[tokio::test]
async fn test_search_timeout_maps_to_gateway_timeout() {
    let (status, _, body) = get(app(), "/search?provider=slow&keyword=a&timeout=50ms").await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["statusCode"], 504);
}

#[tokio::test]
async fn test_search_jsonp_callback() {
    let (status, content_type, body) =
        get(app(), "/search?provider=wiki&keyword=a&callback=render").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/javascript"));
    assert!(body.starts_with("render([{"));
    assert!(body.ends_with("])"));
}

#[tokio::test]
async fn test_error_wrapped_in_jsonp_callback() {
    let (status, _, body) = get(app(), "/search?provider=nope&keyword=a&callback=cb").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("cb({"));
}

#[tokio::test]
async fn test_invalid_callback_rejected() {
    let (status, _, _) = get(app(), "/providers?callback=alert(1)").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_index_lists_providers() {
    let (status, _, body) = get(app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<option value="wiki">Wiki</option>"#));
    assert!(!body.contains(r#"value="hidden""#));
}
