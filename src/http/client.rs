// src/http/client.rs
// =============================================================================
// The production HttpClient, built on reqwest.
//
// One reqwest::Client is created up front and reused for every request
// (connection pooling). It always sends the same identifying User-Agent and
// an HTML-preferring Accept header, so every proxy attempt and every probe
// looks the same to the remote side.
//
// Error mapping:
// - timeout          -> HttpError::Timeout
// - connect failures -> HttpError::Connect (DNS, refused, TLS)
// - non-2xx status   -> HttpError::Status(code)
// - anything else    -> HttpError::Request(message)
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use std::time::Duration;

use super::{HttpClient, HttpError, HttpResponse, Method};
use crate::config::{ACCEPT_HTML, USER_AGENT};

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))  // Follow up to 5 redirects
            .build()
            .map_err(|e| HttpError::Request(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request(
        &self,
        url: &str,
        method: Method,
        timeout: Duration,
    ) -> Result<HttpResponse, HttpError> {
        let builder = match method {
            Method::Head => self.client.head(url),
            Method::Get => self.client.get(url),
        };

        // reqwest's per-request timeout covers connect, headers and body
        let response = builder
            .timeout(timeout)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status(status.as_u16()));
        }

        let body = match method {
            Method::Head => String::new(),
            Method::Get => response.text().await.map_err(categorize_error)?,
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}

// Sorts a reqwest error into one of our variants
fn categorize_error(error: reqwest::Error) -> HttpError {
    if error.is_timeout() {
        HttpError::Timeout
    } else if error.is_connect() {
        HttpError::Connect(error.to_string())
    } else if let Some(status) = error.status() {
        HttpError::Status(status.as_u16())
    } else {
        HttpError::Request(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_sends_identifying_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("user-agent", USER_AGENT))
            .and(header_exists("accept"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestClient::new().unwrap();
        let response = client
            .request(&format!("{}/page", server.uri()), Method::Get, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "<html></html>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ReqwestClient::new().unwrap();
        let err = client
            .request(&server.uri(), Method::Head, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert_eq!(err, HttpError::Status(404));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let client = ReqwestClient::new().unwrap();
        let err = client
            .request(&server.uri(), Method::Get, Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
    }
}
