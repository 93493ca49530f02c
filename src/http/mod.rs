// src/http/mod.rs
// =============================================================================
// The HTTP capability the rest of the crate depends on.
//
// Nothing outside this module talks to reqwest directly. The fetch chain and
// the prober take anything that implements HttpClient, which lets tests swap
// in a scripted client and lets the server share one client across requests.
//
// Submodules:
// - client: the reqwest-backed implementation used by the binary
// =============================================================================

mod client;

pub use client::ReqwestClient;

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// The two request methods the crate needs
//
// HEAD is the lightweight existence check, GET is the full retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Head,
    Get,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Head => f.write_str("HEAD"),
            Method::Get => f.write_str("GET"),
        }
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Empty for HEAD requests
    pub body: String,
}

/// Why a request did not produce a 2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// The deadline passed and the request was cancelled
    #[error("Request timeout")]
    Timeout,

    /// DNS failure, refused connection, TLS handshake failure...
    #[error("connection failed: {0}")]
    Connect(String),

    /// The server answered, but not with a success code
    #[error("HTTP {0}")]
    Status(u16),

    #[error("{0}")]
    Request(String),
}

impl HttpError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Timeout)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            HttpError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Something that can perform one HTTP request with a deadline.
///
/// Implementations must cancel the request once `timeout` has elapsed and
/// report it as [`HttpError::Timeout`], and must report non-2xx answers as
/// [`HttpError::Status`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(
        &self,
        url: &str,
        method: Method,
        timeout: Duration,
    ) -> Result<HttpResponse, HttpError>;
}
