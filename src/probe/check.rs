// src/probe/check.rs
// =============================================================================
// This module checks if a single URL is alive.
//
// Key functionality:
// - Tier 1: HEAD request (lightweight, no body download), 10s deadline
// - Tier 2: GET request if HEAD failed for any reason, 15s deadline
//   (some servers reject HEAD outright)
// - The outcome of the last tier decides the classification:
//     working  - either tier came back fine
//     timeout  - the GET was cancelled by its deadline
//     broken   - anything else (DNS, refused, HTTP 4xx/5xx...)
//
// A check never fails: every problem becomes a ProbeResult.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::ProbeConfig;
use crate::http::{HttpClient, HttpError, Method};
use crate::links::NormalizedLink;

/// Status code reported when the transport gives none back.
const DEFAULT_SUCCESS_CODE: u16 = 200;

// Represents the status of a link after checking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// One of the two tiers answered successfully
    Working,
    /// The full retrieval failed
    Broken,
    /// The full retrieval ran past its deadline
    Timeout,
}

// Represents the result of checking a single link
//
// Created once per checked link and never modified afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub url: NormalizedLink,
    #[serde(rename = "status")]
    pub outcome: ProbeOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeResult {
    pub fn is_ok(&self) -> bool {
        self.outcome == ProbeOutcome::Working
    }
}

// Checks one link, escalating from HEAD to GET
pub async fn check_link<C>(client: &C, url: &NormalizedLink, config: &ProbeConfig) -> ProbeResult
where
    C: HttpClient + ?Sized,
{
    let head = client
        .request(url.as_str(), Method::Head, config.head_timeout)
        .await;

    let last = match head {
        Ok(response) => return working(url, response.status),
        Err(e) => {
            trace!("HEAD {} failed ({}), retrying with GET", url, e);
            client
                .request(url.as_str(), Method::Get, config.get_timeout)
                .await
        }
    };

    match last {
        Ok(response) => working(url, response.status),
        Err(e) => classify_failure(url, e),
    }
}

fn working(url: &NormalizedLink, status: u16) -> ProbeResult {
    ProbeResult {
        url: url.clone(),
        outcome: ProbeOutcome::Working,
        status_code: Some(if status == 0 { DEFAULT_SUCCESS_CODE } else { status }),
        error: None,
    }
}

// Sorts the final tier's error into timeout or broken
fn classify_failure(url: &NormalizedLink, error: HttpError) -> ProbeResult {
    let outcome = if error.is_timeout() {
        ProbeOutcome::Timeout
    } else {
        ProbeOutcome::Broken
    };

    ProbeResult {
        url: url.clone(),
        outcome,
        status_code: error.status_code(),
        error: Some(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    // Gives fixed answers per method and records the calls
    struct TieredClient {
        head: Result<u16, HttpError>,
        get: Result<u16, HttpError>,
        calls: Mutex<Vec<(Method, Duration)>>,
    }

    impl TieredClient {
        fn new(head: Result<u16, HttpError>, get: Result<u16, HttpError>) -> Self {
            Self { head, get, calls: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl HttpClient for TieredClient {
        async fn request(
            &self,
            _url: &str,
            method: Method,
            timeout: Duration,
        ) -> Result<HttpResponse, HttpError> {
            self.calls.lock().unwrap().push((method, timeout));
            let answer = match method {
                Method::Head => self.head.clone(),
                Method::Get => self.get.clone(),
            };
            answer.map(|status| HttpResponse { status, body: String::new() })
        }
    }

    fn link() -> NormalizedLink {
        NormalizedLink::parse("https://example.com/page").unwrap()
    }

    #[tokio::test]
    async fn test_head_success_skips_get() {
        let client = TieredClient::new(Ok(204), Ok(200));
        let result = check_link(&client, &link(), &ProbeConfig::default()).await;

        assert_eq!(result.outcome, ProbeOutcome::Working);
        assert_eq!(result.status_code, Some(204));
        assert_eq!(
            *client.calls.lock().unwrap(),
            vec![(Method::Head, Duration::from_secs(10))]
        );
    }

    #[tokio::test]
    async fn test_get_fallback_rescues_link() {
        let client = TieredClient::new(Err(HttpError::Status(405)), Ok(200));
        let result = check_link(&client, &link(), &ProbeConfig::default()).await;

        assert!(result.is_ok());
        assert_eq!(
            *client.calls.lock().unwrap(),
            vec![
                (Method::Head, Duration::from_secs(10)),
                (Method::Get, Duration::from_secs(15)),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_timeout_is_timeout_not_broken() {
        let client = TieredClient::new(Err(HttpError::Status(405)), Err(HttpError::Timeout));
        let result = check_link(&client, &link(), &ProbeConfig::default()).await;

        assert_eq!(result.outcome, ProbeOutcome::Timeout);
        assert_eq!(result.error.as_deref(), Some("Request timeout"));
        assert_eq!(result.status_code, None);
    }

    #[tokio::test]
    async fn test_head_timeout_then_get_failure_is_broken() {
        let client = TieredClient::new(
            Err(HttpError::Timeout),
            Err(HttpError::Connect("dns error".to_string())),
        );
        let result = check_link(&client, &link(), &ProbeConfig::default()).await;

        assert_eq!(result.outcome, ProbeOutcome::Broken);
        assert_eq!(result.error.as_deref(), Some("connection failed: dns error"));
    }

    #[tokio::test]
    async fn test_http_error_keeps_status_code() {
        let client = TieredClient::new(Err(HttpError::Status(404)), Err(HttpError::Status(404)));
        let result = check_link(&client, &link(), &ProbeConfig::default()).await;

        assert_eq!(result.outcome, ProbeOutcome::Broken);
        assert_eq!(result.status_code, Some(404));
    }

    #[tokio::test]
    async fn test_missing_status_defaults_to_success_code() {
        let client = TieredClient::new(Ok(0), Ok(0));
        let result = check_link(&client, &link(), &ProbeConfig::default()).await;
        assert_eq!(result.status_code, Some(200));
    }

    #[test]
    fn test_result_serializes_like_report_entry() {
        let result = ProbeResult {
            url: link(),
            outcome: ProbeOutcome::Timeout,
            status_code: None,
            error: Some("Request timeout".to_string()),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://example.com/page",
                "status": "timeout",
                "error": "Request timeout"
            })
        );
    }
}
