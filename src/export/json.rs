// src/export/json.rs
// =============================================================================
// JSON exports: the full scrape result, and the broken-links report.
//
// The report keeps every broken and unreachable link but only a sample of
// the working ones, so a page with thousands of healthy links still gives
// a file of reasonable size.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::probe::{ProbeResult, ProbeSummary};
use crate::scrape::ScrapeResult;

/// Working links kept in the broken-links report
pub const WORKING_SAMPLE_SIZE: usize = 100;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenLinksReport<'a> {
    pub timestamp: DateTime<Utc>,
    pub original_url: &'a str,
    pub base_domain: &'a str,
    pub summary: ReportSummary,
    pub broken_links: &'a [ProbeResult],
    pub unreachable_links: &'a [ProbeResult],
    pub working_links: &'a [ProbeResult],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_checked: usize,
    pub broken_count: usize,
    pub working_count: usize,
    pub unreachable_count: usize,
}

impl<'a> BrokenLinksReport<'a> {
    pub fn new(result: &'a ScrapeResult, summary: &'a ProbeSummary, timestamp: DateTime<Utc>) -> Self {
        let sample = summary.working.len().min(WORKING_SAMPLE_SIZE);
        Self {
            timestamp,
            original_url: &result.original_url,
            base_domain: &result.base_domain,
            summary: ReportSummary {
                total_checked: summary.total,
                broken_count: summary.broken_count,
                working_count: summary.working_count,
                unreachable_count: summary.unreachable_count,
            },
            broken_links: &summary.broken,
            unreachable_links: &summary.unreachable,
            working_links: &summary.working[..sample],
        }
    }
}

pub fn result_json(result: &ScrapeResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

pub fn broken_links_report_json(
    result: &ScrapeResult,
    summary: &ProbeSummary,
    timestamp: DateTime<Utc>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&BrokenLinksReport::new(result, summary, timestamp))
}
