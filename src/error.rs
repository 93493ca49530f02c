// src/error.rs
// =============================================================================
// Error types for the library side of link-scout.
//
// Only two kinds of failure ever reach the caller of a scrape:
// - ValidationError: the input URL was rejected before any network activity
// - FetchError::Exhausted: every proxy candidate failed
//
// Everything else (one bad href, one broken link) is absorbed where it happens
// and recorded as data instead of being returned as an error.
//
// Rust concepts:
// - thiserror: derive macro that writes the Display and Error impls for us
// - #[from]: lets the ? operator convert one error type into another
// =============================================================================

use thiserror::Error;

use crate::http::HttpError;

// Top-level error for the scrape pipeline
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// The URL the user handed us is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a URL")]
    Missing,

    #[error("Please enter a valid URL: {0}")]
    Malformed(String),

    #[error("URL has no host: {0}")]
    NoHost(String),
}

/// A single reference could not be turned into an absolute link.
///
/// Never shown to the user; the extractor drops the reference and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("empty reference")]
    Empty,

    #[error("invalid base URL '{0}'")]
    InvalidBase(String),

    #[error("malformed URL '{0}'")]
    Malformed(String),

    #[error("URL '{0}' has no host")]
    MissingHost(String),
}

// Failures of the proxy fetch chain
//
// Request and EmptyContent describe one failed candidate. The chain records
// them and keeps going; only Exhausted is returned to the caller.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: HttpError,
    },

    #[error("{endpoint} returned empty content")]
    EmptyContent { endpoint: String },

    #[error("all {attempts} fetch attempt(s) failed; last error: {last}")]
    Exhausted {
        attempts: usize,
        last: String,
        failures: Vec<FetchError>,
    },
}

impl FetchError {
    /// The endpoint this failure belongs to, if it is a per-attempt failure.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            FetchError::Request { endpoint, .. } | FetchError::EmptyContent { endpoint } => {
                Some(endpoint)
            }
            FetchError::Exhausted { .. } => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
