// src/lib.rs
// =============================================================================
// link-scout as a library.
//
// Pipeline (each stage only consumes the previous stage's output):
//
//   fetch (proxy chain) -> raw HTML -> links::extract -> links::categorize
//                                                     -> probe (optional)
//
// Modules:
// - http: the injected HTTP capability and its reqwest implementation
// - links: normalization, extraction, categorization, page metadata
// - fetch: the proxy fallback chain
// - probe: batched two-tier availability checks
// - scrape: the whole pipeline for one page
// - export: XML/JSON output formats
// - server: the /api/proxy endpoint
// =============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod http;
pub mod links;
pub mod probe;
pub mod scrape;
pub mod server;

pub use error::{Error, FetchError, NormalizationError, Result, ValidationError};
pub use scrape::{ScrapeResult, Scraper};
