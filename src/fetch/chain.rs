// src/fetch/chain.rs
// =============================================================================
// Fetches a page by walking a list of retrieval candidates until one works.
//
// How it works:
// 1. Build the candidate list from the proxy mode:
//      auto        -> every known strategy, in priority order
//      named(id)   -> just that strategy (or the direct URL if id is unknown)
//      direct      -> the target URL itself
// 2. Try each candidate with a GET (15s, or 30s in extended mode)
// 3. The first one that gives back non-empty content wins
// 4. Failures are logged, recorded, and the next candidate is tried
// 5. If nothing worked, return FetchError::Exhausted with every failure
//
// The caller never retries: one call to fetch_via_chain is one logical
// request with exactly one outcome.
// =============================================================================

use std::str::FromStr;
use tracing::{debug, warn};

use super::proxy::{known_strategies, ProxyStrategy};
use crate::config::FetchMode;
use crate::error::FetchError;
use crate::http::{HttpClient, Method};

// How the user asked us to reach the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyMode {
    /// Try every known proxy in order
    Auto,
    /// Use one proxy by id
    Named(String),
    /// No proxy configured: request the page directly
    Direct,
}

impl ProxyMode {
    /// Maps the optional `proxy` setting ("auto", an id, or nothing).
    pub fn from_setting(setting: Option<&str>) -> Self {
        match setting.map(str::trim) {
            None | Some("") => ProxyMode::Direct,
            Some(value) => value.parse().unwrap_or(ProxyMode::Direct),
        }
    }
}

impl FromStr for ProxyMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "auto" => ProxyMode::Auto,
            "" | "direct" | "none" => ProxyMode::Direct,
            id => ProxyMode::Named(id.to_string()),
        })
    }
}

// One entry of the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Proxy(ProxyStrategy),
    Direct,
}

impl Candidate {
    pub fn endpoint(&self, target: &str) -> String {
        match self {
            Candidate::Proxy(strategy) => strategy.build(target),
            Candidate::Direct => target.to_string(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Candidate::Proxy(strategy) => strategy.id(),
            Candidate::Direct => "direct",
        }
    }

    fn unwrap(&self, body: String) -> String {
        match self {
            Candidate::Proxy(strategy) => strategy.unwrap(body),
            Candidate::Direct => body,
        }
    }
}

/// What a successful fetch produced.
#[derive(Debug, Clone)]
pub struct FetchReport {
    /// The page body, already unwrapped from any envelope
    pub content: String,
    /// The endpoint that produced it
    pub endpoint: String,
    /// Id of the strategy that worked ("direct" for a direct request)
    pub proxy_used: String,
    /// Candidates that failed before this one, in the order they were tried
    pub failures: Vec<FetchError>,
}

impl FetchReport {
    /// Number of candidates tried, the successful one included.
    pub fn attempts(&self) -> usize {
        self.failures.len() + 1
    }
}

/// The strategies a chain may choose from.
#[derive(Debug, Clone)]
pub struct ProxyChain {
    strategies: Vec<ProxyStrategy>,
}

impl Default for ProxyChain {
    fn default() -> Self {
        Self::new(known_strategies())
    }
}

impl ProxyChain {
    pub fn new(strategies: Vec<ProxyStrategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[ProxyStrategy] {
        &self.strategies
    }

    // Candidate list for a mode
    //
    // Falls back to a direct request whenever no proxy applies.
    pub fn candidates(&self, mode: &ProxyMode) -> Vec<Candidate> {
        let candidates: Vec<Candidate> = match mode {
            ProxyMode::Auto => self.strategies.iter().cloned().map(Candidate::Proxy).collect(),
            ProxyMode::Named(id) => self
                .strategies
                .iter()
                .find(|strategy| strategy.id() == id)
                .cloned()
                .map(Candidate::Proxy)
                .into_iter()
                .collect(),
            ProxyMode::Direct => Vec::new(),
        };

        if candidates.is_empty() {
            vec![Candidate::Direct]
        } else {
            candidates
        }
    }

    pub async fn fetch<C>(
        &self,
        client: &C,
        url: &str,
        mode: &ProxyMode,
        fetch_mode: FetchMode,
    ) -> Result<FetchReport, FetchError>
    where
        C: HttpClient + ?Sized,
    {
        let candidates = self.candidates(mode);
        let timeout = fetch_mode.timeout();
        let mut failures = Vec::new();

        for candidate in &candidates {
            let endpoint = candidate.endpoint(url);
            debug!("Fetching {} via {}", url, candidate.label());

            let failure = match client.request(&endpoint, Method::Get, timeout).await {
                Ok(response) => {
                    let content = candidate.unwrap(response.body);
                    if !content.trim().is_empty() {
                        return Ok(FetchReport {
                            content,
                            endpoint,
                            proxy_used: candidate.label().to_string(),
                            failures,
                        });
                    }
                    FetchError::EmptyContent { endpoint }
                }
                Err(source) => FetchError::Request { endpoint, source },
            };

            warn!("Proxy {} failed: {}", candidate.label(), failure);
            failures.push(failure);
        }

        let last = failures
            .last()
            .map(ToString::to_string)
            .unwrap_or_else(|| "no candidates".to_string());

        Err(FetchError::Exhausted {
            attempts: candidates.len(),
            last,
            failures,
        })
    }
}

/// Fetches `url` through the built-in proxy strategies.
pub async fn fetch_via_chain<C>(
    client: &C,
    url: &str,
    mode: &ProxyMode,
    fetch_mode: FetchMode,
) -> Result<FetchReport, FetchError>
where
    C: HttpClient + ?Sized,
{
    ProxyChain::default().fetch(client, url, mode, fetch_mode).await
}
