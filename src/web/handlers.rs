//! HTTP request handlers

use super::state::AppState;
use crate::query::{parse_limit, parse_page, parse_timeout};
use crate::search::{Query as SearchQuery, SearchContext};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tera::Context;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

static CALLBACK_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$.]*$").expect("valid callback regex"));

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub provider: Option<String>,
    pub keyword: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Go-style duration, e.g. `2500ms`
    pub timeout: Option<String>,
}

/// Response shaping shared by the JSON routes
#[derive(Debug, Default, Deserialize)]
pub struct OutputParams {
    /// `pretty` for indented JSON
    pub output: Option<String>,
    /// JSONP function name
    pub callback: Option<String>,
}

/// Error body returned by the JSON routes
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or_default().to_string(),
            message: message.into(),
        }
    }
}

/// Home page handler
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let mut ctx = Context::new();
    ctx.insert("version", crate::VERSION);
    ctx.insert("providers", state.providers.as_ref());

    match state.templates.render_with_context("index.html", &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Search handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
    Query(output): Query<OutputParams>,
) -> Response {
    let provider = params.provider.unwrap_or_default();
    if !state.accepts(&provider) {
        let status = StatusCode::BAD_REQUEST;
        return render(status, &output, &ApiError::new(status, "invalid provider"));
    }

    let query = SearchQuery::new(provider, params.keyword.unwrap_or_default())
        .with_page(parse_page(params.page.as_deref()))
        .with_limit(parse_limit(params.limit.as_deref()))
        .with_timeout(parse_timeout(
            params.timeout.as_deref(),
            state.search.default_timeout(),
        ));

    // Dropping the handler future, e.g. on client disconnect, cancels the query.
    let token = CancellationToken::new();
    let _guard = token.clone().drop_guard();
    let ctx = SearchContext::with_token(token);

    match state.search.execute(&ctx, query).await {
        Ok(query) => render(StatusCode::OK, &output, &query.results),
        Err(e) => {
            if e.is_validation() {
                debug!("Rejected search: {}", e);
            } else {
                warn!("Search failed: {}", e);
            }
            let status =
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            render(status, &output, &ApiError::new(status, e.to_string()))
        }
    }
}

/// Providers handler
pub async fn providers(State(state): State<AppState>, Query(output): Query<OutputParams>) -> Response {
    render(StatusCode::OK, &output, state.providers.as_ref())
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Serialize `body` as JSON, indented on request, wrapped as JSONP when a
/// callback is given
fn render(status: StatusCode, output: &OutputParams, body: &impl Serialize) -> Response {
    let data = if output.output.as_deref() == Some("pretty") {
        serde_json::to_string_pretty(body)
    } else {
        serde_json::to_string(body)
    };
    let data = match data {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
            )
                .into_response();
        }
    };

    match output.callback.as_deref().filter(|cb| !cb.is_empty()) {
        Some(callback) if CALLBACK_NAME.is_match(callback) => (
            status,
            [(header::CONTENT_TYPE, "application/javascript")],
            format!("{}({})", callback, data),
        )
            .into_response(),
        Some(_) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(StatusCode::BAD_REQUEST, "invalid callback")),
        )
            .into_response(),
        None => (status, [(header::CONTENT_TYPE, "application/json")], data).into_response(),
    }
}
