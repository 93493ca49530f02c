// src/config.rs
// =============================================================================
// Configuration for the scrape pipeline and the link prober.
//
// All the fixed numbers live here: request timeouts, outbound headers, the
// default link limit. The CLI (src/cli.rs) fills these structs from flags and
// LINK_SCOUT_* environment variables; library callers use Default.
// =============================================================================

use std::time::Duration;

/// User-Agent sent on every outbound request
pub const USER_AGENT: &str = concat!("link-scout/", env!("CARGO_PKG_VERSION"));

/// Accept header sent on every outbound request (prefers HTML)
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Page fetch timeout per proxy attempt
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Page fetch timeout per proxy attempt in extended (advanced) mode
pub const EXTENDED_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Tier 1 probe (HEAD) timeout
pub const HEAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Tier 2 probe (GET) timeout
pub const GET_TIMEOUT: Duration = Duration::from_secs(15);

/// Pause between probe batches
pub const BATCH_DELAY: Duration = Duration::from_secs(1);

pub const DEFAULT_MAX_CONCURRENT: usize = 5;
pub const DEFAULT_MAX_LINKS: usize = 1000;

// How long each proxy attempt may take
//
// Standard matches the normal UI flow; Extended is what advanced mode uses
// for slow sites behind slow proxies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    #[default]
    Standard,
    Extended,
}

impl FetchMode {
    pub fn timeout(self) -> Duration {
        match self {
            FetchMode::Standard => FETCH_TIMEOUT,
            FetchMode::Extended => EXTENDED_FETCH_TIMEOUT,
        }
    }
}

/// Settings for the availability prober.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Links checked at once (one batch)
    pub max_concurrent: usize,
    pub head_timeout: Duration,
    pub get_timeout: Duration,
    /// Courtesy pause between batches
    pub batch_delay: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            head_timeout: HEAD_TIMEOUT,
            get_timeout: GET_TIMEOUT,
            batch_delay: BATCH_DELAY,
        }
    }
}

impl ProbeConfig {
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }
}

/// Settings for one scrape.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Which proxy strategies to try, in the form the CLI and the
    /// /api/proxy endpoint accept ("auto", a proxy id, or None for direct).
    pub proxy: Option<String>,
    /// Advanced mode: extended fetch timeout and no link limit
    pub advanced: bool,
    /// Cap on extracted links outside advanced mode
    pub max_links: usize,
    pub probe: ProbeConfig,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            proxy: Some("auto".to_string()),
            advanced: false,
            max_links: DEFAULT_MAX_LINKS,
            probe: ProbeConfig::default(),
        }
    }
}

impl ScrapeConfig {
    pub fn fetch_mode(&self) -> FetchMode {
        if self.advanced {
            FetchMode::Extended
        } else {
            FetchMode::Standard
        }
    }
}
