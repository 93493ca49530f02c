// src/fetch/mod.rs
// =============================================================================
// This module retrieves raw page HTML through a chain of CORS proxies.
//
// Submodules:
// - proxy: the proxy strategies (how to build an endpoint, how to unwrap
//   its response)
// - chain: the fallback loop that tries candidates in order
// =============================================================================

mod chain;
mod proxy;

pub use chain::{fetch_via_chain, Candidate, FetchReport, ProxyChain, ProxyMode};
pub use proxy::{known_strategies, ProxyStrategy, ALLORIGINS, CODETABS, CORS_ANYWHERE};
