// src/server/mod.rs
// =============================================================================
// The /api/proxy HTTP endpoint.
//
// A browser page can't fetch arbitrary sites because of CORS, so it asks
// this endpoint instead:
//
//   GET /api/proxy?url=https://example.com&proxy=auto
//
//   200  the page body
//   400  "URL is required"          (url missing or empty)
//   500  "All proxies failed..."    (fetch chain exhausted)
//
// `proxy` may be "auto", a proxy id, or absent for a direct request.
// =============================================================================

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::FetchMode;
use crate::fetch::{ProxyChain, ProxyMode};
use crate::http::HttpClient;

pub const MISSING_URL: &str = "URL is required";
pub const ALL_PROXIES_FAILED: &str = "All proxies failed to fetch the URL.";

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn HttpClient>,
    pub chain: Arc<ProxyChain>,
    pub fetch_mode: FetchMode,
}

impl AppState {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self {
            client,
            chain: Arc::new(ProxyChain::default()),
            fetch_mode: FetchMode::Standard,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
    pub proxy: Option<String>,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/proxy", get(proxy))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

pub async fn proxy(State(state): State<AppState>, Query(query): Query<ProxyQuery>) -> Response {
    let Some(url) = query.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
        return (StatusCode::BAD_REQUEST, MISSING_URL).into_response();
    };

    let mode = ProxyMode::from_setting(query.proxy.as_deref());
    match state
        .chain
        .fetch(state.client.as_ref(), url, &mode, state.fetch_mode)
        .await
    {
        Ok(report) => (StatusCode::OK, report.content).into_response(),
        Err(e) => {
            warn!("Proxy request for {} failed: {}", url, e);
            (StatusCode::INTERNAL_SERVER_ERROR, ALL_PROXIES_FAILED).into_response()
        }
    }
}

/// Serves the endpoint until Ctrl-C.
pub async fn serve(bind: &str, state: AppState) -> Result<()> {
    let addr: SocketAddr = bind.parse().context("Invalid listen address")?;
    let listener = TcpListener::bind(&addr)
        .await
        .context("Failed to bind HTTP server")?;

    info!("Proxy endpoint listening on http://{}/api/proxy", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::ProxyStrategy;
    use crate::http::{HttpError, HttpResponse};
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use std::time::Duration;

    // Only the "good" proxy answers
    struct OneGoodProxy;

    #[async_trait]
    impl HttpClient for OneGoodProxy {
        async fn request(
            &self,
            url: &str,
            _method: crate::http::Method,
            _timeout: Duration,
        ) -> Result<HttpResponse, HttpError> {
            if url.starts_with("https://good.test/") {
                Ok(HttpResponse { status: 200, body: "<html>page</html>".to_string() })
            } else {
                Err(HttpError::Connect("refused".to_string()))
            }
        }
    }

    fn state() -> AppState {
        AppState {
            client: Arc::new(OneGoodProxy),
            chain: Arc::new(ProxyChain::new(vec![
                ProxyStrategy::path_prefix("bad", "https://bad.test/"),
                ProxyStrategy::path_prefix("good", "https://good.test/"),
            ])),
            fetch_mode: FetchMode::Standard,
        }
    }

    async fn call(url: Option<&str>, proxy_id: Option<&str>) -> (StatusCode, String) {
        let query = ProxyQuery {
            url: url.map(str::to_string),
            proxy: proxy_id.map(str::to_string),
        };
        let response = proxy(State(state()), Query(query)).await;
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_missing_url_is_bad_request() {
        assert_eq!(call(None, Some("auto")).await, (StatusCode::BAD_REQUEST, MISSING_URL.to_string()));
        assert_eq!(call(Some(" "), None).await.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_auto_mode_returns_page() {
        let (status, body) = call(Some("https://example.com/"), Some("auto")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<html>page</html>");
    }

    #[tokio::test]
    async fn test_exhausted_chain_is_server_error() {
        let (status, body) = call(Some("https://example.com/"), Some("bad")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, ALL_PROXIES_FAILED);

        // No proxy: direct request, which this client refuses
        let (status, _) = call(Some("https://example.com/"), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
