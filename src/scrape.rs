// src/scrape.rs
// =============================================================================
// The full scrape of one page.
//
// What happens here:
// 1. Validate the URL (before touching the network)
// 2. Fetch the HTML through the proxy chain
// 3. Parse it, extract and normalize every link
// 4. Apply the link limit (standard mode only)
// 5. Categorize links and gather page metadata
// 6. Optionally, check every internal and external link
//
// Rust concepts:
// - Generics: Scraper<C> works with any HttpClient, so tests can hand it a
//   fake transport
// - Html is not Send, so it never lives across an .await; parsing happens in
//   a plain function once the fetch is done
// =============================================================================

use chrono::{DateTime, Utc};
use scraper::Html;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;
use url::Url;

use crate::config::ScrapeConfig;
use crate::error::{Result, ValidationError};
use crate::fetch::{FetchReport, ProxyChain, ProxyMode};
use crate::http::HttpClient;
use crate::links::{
    categorize, domain_stats, extract, extract_metadata, CategorizedLinks, LinkSet,
    NormalizedLink, PageMetadata,
};
use crate::probe::{probe, ProbeSummary};

/// Everything one scrape produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    pub original_url: String,
    pub base_domain: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub metadata: PageMetadata,
    pub categorized_links: CategorizedLinks,
    /// Links kept after the limit
    pub total_links: usize,
    /// Links found before the limit
    pub total_links_found: usize,
    pub unique_internal_links: usize,
    pub unique_external_links: usize,
    pub resource_links: usize,
    pub external_domains: Vec<String>,
    pub domain_stats: BTreeMap<String, usize>,
    pub proxy_used: String,
    pub advanced_mode: bool,
    pub analysis_stats: AnalysisStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    /// Candidates tried by the fetch chain, the successful one included
    pub proxy_attempts: usize,
    pub processing_time_ms: u64,
    pub link_limit_applied: bool,
}

impl ScrapeResult {
    /// Internal links followed by external ones, each once.
    pub fn links_to_check(&self) -> Vec<NormalizedLink> {
        self.categorized_links.all_pages().cloned().collect()
    }
}

// Checks that `input` is a usable absolute URL, before any network activity
pub fn validate_url(input: &str) -> std::result::Result<Url, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::Missing);
    }

    let url = Url::parse(input).map_err(|_| ValidationError::Malformed(input.to_string()))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::NoHost(input.to_string()));
    }

    Ok(url)
}

pub struct Scraper<C> {
    client: C,
    chain: ProxyChain,
    config: ScrapeConfig,
}

impl<C: HttpClient> Scraper<C> {
    pub fn new(client: C, config: ScrapeConfig) -> Self {
        Self::with_chain(client, ProxyChain::default(), config)
    }

    /// Uses a custom set of proxy strategies instead of the built-in ones.
    pub fn with_chain(client: C, chain: ProxyChain, config: ScrapeConfig) -> Self {
        Self { client, chain, config }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    pub async fn scrape(&self, input: &str) -> Result<ScrapeResult> {
        let started = Instant::now();
        let url = validate_url(input)?;
        let mode = ProxyMode::from_setting(self.config.proxy.as_deref());

        info!("Scraping {} ({:?})", url, mode);
        let report = self
            .chain
            .fetch(&self.client, input.trim(), &mode, self.config.fetch_mode())
            .await?;
        info!("Fetched {} bytes via {}", report.content.len(), report.proxy_used);

        Ok(analyze(&url, input.trim(), report, &self.config, started))
    }

    /// Checks every internal and external link of a scrape.
    pub async fn check(&self, result: &ScrapeResult) -> ProbeSummary {
        probe(&self.client, &result.links_to_check(), &self.config.probe).await
    }
}

/// Runs the analysis half of a scrape on content that was already fetched.
pub fn analyze_report(
    input: &str,
    report: FetchReport,
    config: &ScrapeConfig,
) -> std::result::Result<ScrapeResult, ValidationError> {
    let url = validate_url(input)?;
    Ok(analyze(&url, input.trim(), report, config, Instant::now()))
}

// Everything after the fetch; synchronous so Html never crosses an await
fn analyze(
    url: &Url,
    original: &str,
    report: FetchReport,
    config: &ScrapeConfig,
    started: Instant,
) -> ScrapeResult {
    let document = Html::parse_document(&report.content);
    let base = url.as_str();
    let base_domain = url.host_str().unwrap_or_default().to_string();

    let all_links = extract(&document, base);
    let total_links_found = all_links.len();
    let limited: LinkSet = if config.advanced {
        all_links
    } else {
        all_links.into_iter().take(config.max_links).collect()
    };

    let categorized_links = categorize(&limited, &base_domain);
    let metadata = extract_metadata(&document, base);
    let domain_stats = domain_stats(&categorized_links.external);

    info!(
        "Found {} link(s): {} internal, {} external, {} resources",
        limited.len(),
        categorized_links.internal.len(),
        categorized_links.external.len(),
        categorized_links.resources.len()
    );

    ScrapeResult {
        original_url: original.to_string(),
        base_domain,
        timestamp: Utc::now(),
        metadata,
        total_links: limited.len(),
        total_links_found,
        unique_internal_links: categorized_links.internal.len(),
        unique_external_links: categorized_links.external.len(),
        resource_links: categorized_links.resources.len(),
        external_domains: domain_stats.keys().cloned().collect(),
        domain_stats,
        categorized_links,
        proxy_used: report.proxy_used.clone(),
        advanced_mode: config.advanced,
        analysis_stats: AnalysisStats {
            proxy_attempts: report.attempts(),
            processing_time_ms: started.elapsed().as_millis() as u64,
            link_limit_applied: !config.advanced && total_links_found > config.max_links,
        },
    }
}
