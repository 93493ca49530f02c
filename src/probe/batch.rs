// src/probe/batch.rs
// =============================================================================
// Checks a whole list of links, a batch at a time.
//
// How it works:
// 1. Cut the list into consecutive batches of `max_concurrent` links
// 2. Check every link of a batch at once and wait for all of them
// 3. Fold the results into the summary (in input order)
// 4. Pause briefly, then start the next batch
//
// Why batches instead of one big concurrent pile?
// - Hundreds of simultaneous connections can exhaust sockets
// - Target servers rate-limit clients that hammer them
// The pause between batches is only a courtesy; results don't depend on it.
// =============================================================================

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

use super::check::{check_link, ProbeOutcome, ProbeResult};
use crate::config::ProbeConfig;
use crate::http::HttpClient;
use crate::links::NormalizedLink;

/// Everything one run of the prober found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeSummary {
    /// Always the number of links handed in
    pub total: usize,
    pub working_count: usize,
    pub broken_count: usize,
    /// Links that timed out
    pub unreachable_count: usize,
    pub working: Vec<ProbeResult>,
    pub broken: Vec<ProbeResult>,
    pub unreachable: Vec<ProbeResult>,
}

impl ProbeSummary {
    fn record(&mut self, result: ProbeResult) {
        match result.outcome {
            ProbeOutcome::Working => {
                self.working_count += 1;
                self.working.push(result);
            }
            ProbeOutcome::Broken => {
                self.broken_count += 1;
                self.broken.push(result);
            }
            ProbeOutcome::Timeout => {
                self.unreachable_count += 1;
                self.unreachable.push(result);
            }
        }
    }

    /// True when nothing was broken or unreachable.
    pub fn all_working(&self) -> bool {
        self.broken_count == 0 && self.unreachable_count == 0
    }
}

/// Number of batches `len` links are split into.
pub fn batch_count(len: usize, max_concurrent: usize) -> usize {
    len.div_ceil(max_concurrent.max(1))
}

// Checks every link and returns the summary
//
// Parameters:
//   client: the HTTP capability (shared by all checks)
//   links: links to check; duplicates are checked twice
//   config: batch size, tier timeouts, pause between batches
pub async fn probe<C>(client: &C, links: &[NormalizedLink], config: &ProbeConfig) -> ProbeSummary
where
    C: HttpClient + ?Sized,
{
    let batch_size = config.max_concurrent.max(1);
    let batches = batch_count(links.len(), batch_size);
    let mut summary = ProbeSummary {
        total: links.len(),
        ..ProbeSummary::default()
    };

    info!("Checking {} link(s) in {} batch(es)", links.len(), batches);

    for (index, batch) in links.chunks(batch_size).enumerate() {
        debug!("Batch {}/{}: {} link(s)", index + 1, batches, batch.len());

        // join_all drives the checks concurrently on this task and only
        // returns once every one of them has settled
        let results = join_all(batch.iter().map(|link| check_link(client, link, config))).await;
        for result in results {
            summary.record(result);
        }

        if index + 1 < batches && !config.batch_delay.is_zero() {
            tokio::time::sleep(config.batch_delay).await;
        }
    }

    info!(
        "Link check done: {} working, {} broken, {} unreachable",
        summary.working_count, summary.broken_count, summary.unreachable_count
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpError, HttpResponse, Method};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    // Tracks how many requests are in flight at once. A link's answer is
    // picked from its path: /ok, /slow (times out), anything else is broken.
    #[derive(Default)]
    struct CountingClient {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl HttpClient for CountingClient {
        async fn request(
            &self,
            url: &str,
            method: Method,
            _timeout: Duration,
        ) -> Result<HttpResponse, HttpError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            // Let the other checks of the batch start before answering
            tokio::task::yield_now().await;
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match (method, url.rsplit('/').next()) {
                (Method::Head, _) => Err(HttpError::Status(405)),
                (Method::Get, Some(path)) if path.starts_with("ok") => {
                    Ok(HttpResponse { status: 200, body: String::new() })
                }
                (Method::Get, Some(path)) if path.starts_with("slow") => Err(HttpError::Timeout),
                _ => Err(HttpError::Connect("refused".to_string())),
            }
        }
    }

    fn links(paths: &[&str]) -> Vec<NormalizedLink> {
        paths
            .iter()
            .map(|p| NormalizedLink::parse(&format!("https://example.com/{}", p)).unwrap())
            .collect()
    }

    fn fast_config(max_concurrent: usize) -> ProbeConfig {
        ProbeConfig {
            batch_delay: Duration::ZERO,
            ..ProbeConfig::default().with_max_concurrent(max_concurrent)
        }
    }

    #[test]
    fn test_batch_count() {
        assert_eq!(batch_count(12, 5), 3);
        assert_eq!(batch_count(10, 5), 2);
        assert_eq!(batch_count(0, 5), 0);
        assert_eq!(batch_count(3, 0), 3);
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Start(usize),
        End(usize),
    }

    // Answers every HEAD with 200 after a short pause, logging when each
    // link's check starts and ends. Links are named /ok<n>.
    #[derive(Default)]
    struct RecordingClient {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        events: Mutex<Vec<Event>>,
    }

    #[async_trait]
    impl HttpClient for RecordingClient {
        async fn request(
            &self,
            url: &str,
            _method: Method,
            _timeout: Duration,
        ) -> Result<HttpResponse, HttpError> {
            let n: usize = url.rsplit("ok").next().and_then(|n| n.parse().ok()).unwrap_or(usize::MAX);

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.events.lock().unwrap().push(Event::Start(n));

            tokio::time::sleep(Duration::from_millis(10)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.events.lock().unwrap().push(Event::End(n));
            Ok(HttpResponse { status: 200, body: String::new() })
        }
    }

    #[tokio::test]
    async fn test_twelve_links_in_batches_of_five() {
        let client = RecordingClient::default();
        let paths: Vec<String> = (0..12).map(|i| format!("ok{}", i)).collect();
        let paths: Vec<&str> = paths.iter().map(String::as_str).collect();

        let summary = probe(&client, &links(&paths), &fast_config(5)).await;

        assert_eq!(summary.total, 12);
        assert_eq!(summary.working_count, 12);

        // Checks inside a batch overlap
        assert_eq!(client.peak.load(Ordering::SeqCst), 5);

        // Runs of starts, each followed by its ends: 5, 5, then 2
        let events = client.events.lock().unwrap().clone();
        assert_eq!(events.len(), 24);
        let mut batches: Vec<Vec<usize>> = Vec::new();
        let mut ends: Vec<Vec<usize>> = Vec::new();
        for event in &events {
            match *event {
                Event::Start(n) => {
                    if batches.len() == ends.len() {
                        batches.push(Vec::new());
                    }
                    batches.last_mut().unwrap().push(n);
                }
                Event::End(n) => {
                    if ends.len() < batches.len() {
                        ends.push(Vec::new());
                    }
                    ends.last_mut().unwrap().push(n);
                }
            }
        }
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![5, 5, 2]);

        // Every check of a batch settles before the next batch starts
        for (k, (started, ended)) in batches.iter().zip(&ends).enumerate() {
            let mut started = started.clone();
            let mut ended = ended.clone();
            started.sort_unstable();
            ended.sort_unstable();
            let expected: Vec<usize> = (k * 5..(k * 5 + 5).min(12)).collect();
            assert_eq!(started, expected);
            assert_eq!(ended, expected);
        }
    }

    #[tokio::test]
    async fn test_mixed_outcomes_fill_every_list() {
        let client = CountingClient::default();
        let summary = probe(
            &client,
            &links(&["ok-a", "slow-b", "gone-c", "ok-d", "gone-e"]),
            &fast_config(2),
        )
        .await;

        assert_eq!(summary.total, 5);
        assert_eq!(summary.working_count, 2);
        assert_eq!(summary.unreachable_count, 1);
        assert_eq!(summary.broken_count, 2);
        assert_eq!(summary.broken[0].url.as_str(), "https://example.com/gone-c");
        assert!(!summary.all_working());
    }

    #[tokio::test]
    async fn test_total_holds_when_everything_breaks() {
        let client = CountingClient::default();
        let summary = probe(&client, &links(&["x", "y", "z"]), &fast_config(0)).await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.broken_count, 3);
        assert_eq!(client.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let client = CountingClient::default();
        let summary = probe(&client, &[], &ProbeConfig::default()).await;
        assert_eq!(summary, ProbeSummary::default());
        assert!(summary.all_working());
    }
}
