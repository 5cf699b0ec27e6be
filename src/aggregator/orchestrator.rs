// src/aggregator/orchestrator.rs
use futures::future::join_all;
use std::time::Duration;
use tracing::{info, warn};

use super::cache::SearchCache;
use super::client::Scraper;
use super::prompts::extraction_prompt;
use super::sites::{build_urls, no_results_marker, Site};
use super::{SearchQuery, SiteResult, SiteResults};
use crate::config::Settings;

/// Fans one search out across every configured board. Failures stay
/// per-site: a bad board shows up as an `error` string in its own slot and
/// never blocks the others.
pub struct Aggregator<S> {
    scraper: S,
    cache: SearchCache,
    batch_size: usize,
    sniff_no_results: bool,
}

impl<S: Scraper> Aggregator<S> {
    pub fn new(scraper: S, settings: &Settings) -> Self {
        Self {
            scraper,
            cache: SearchCache::new(Duration::from_secs(settings.cache_ttl_secs)),
            batch_size: settings.scrape_batch_size.max(1),
            sniff_no_results: settings.sniff_no_results,
        }
    }

    /// Run the search against every board and return one result per board,
    /// in board order. Never fails: per-site errors are folded into the
    /// returned mapping.
    pub async fn run_all(&self, query: &SearchQuery) -> SiteResults {
        if let Some(cached) = self.cache.get(query).await {
            info!(
                "serving cached results for '{}' in '{}'",
                query.job_title, query.location
            );
            return cached;
        }

        info!(
            "searching '{}' in '{}' across {} boards",
            query.job_title,
            query.location,
            Site::ALL.len()
        );

        let pairs: Vec<(Site, String)> = build_urls(query).into_iter().collect();
        let mut results = SiteResults::with_capacity(pairs.len());

        // Batches cap concurrent calls against the extraction API; a batch
        // size of 1 is the fully sequential mode.
        for batch in pairs.chunks(self.batch_size) {
            let outcomes = join_all(
                batch
                    .iter()
                    .map(|(site, url)| self.search_site(*site, url)),
            )
            .await;

            for ((site, _), outcome) in batch.iter().zip(outcomes) {
                results.insert(*site, outcome);
            }
        }

        self.cache.store(query, results.clone()).await;
        results
    }

    async fn search_site(&self, site: Site, url: &str) -> SiteResult {
        match self.scraper.extract_jobs(site, url, extraction_prompt(site)).await {
            Ok(mut jobs) => {
                if self.sniff_no_results && !jobs.is_empty() {
                    if let Some(marker) = no_results_marker(site) {
                        if self.page_reports_no_results(site, url, marker).await {
                            jobs.clear();
                        }
                    }
                }

                SiteResult {
                    url: url.to_string(),
                    jobs,
                    error: None,
                }
            }
            Err(e) => {
                warn!("{}: search failed: {}", site, e);
                SiteResult {
                    url: url.to_string(),
                    jobs: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Heuristic only: scan the raw page for the board's "no results" copy.
    /// A failed fetch keeps the extracted records.
    async fn page_reports_no_results(&self, site: Site, url: &str, marker: &str) -> bool {
        match self.scraper.fetch_page(url).await {
            Ok(body) => {
                let found = body.contains(marker);
                if found {
                    info!("{}: page body reports no results, dropping extracted records", site);
                }
                found
            }
            Err(e) => {
                warn!("{}: no-results check failed, keeping records: {}", site, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{JobRecord, ScrapeError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubScraper {
        extract_calls: AtomicUsize,
        fetch_calls: AtomicUsize,
        fail_sites: Vec<Site>,
        missing_credential: bool,
        page_body: Option<String>,
    }

    #[async_trait]
    impl Scraper for StubScraper {
        async fn extract_jobs(
            &self,
            site: Site,
            url: &str,
            _prompt: &str,
        ) -> Result<Vec<JobRecord>, ScrapeError> {
            self.extract_calls.fetch_add(1, Ordering::SeqCst);

            if self.missing_credential {
                return Err(ScrapeError::MissingCredential);
            }
            if self.fail_sites.contains(&site) {
                return Err(ScrapeError::Extraction {
                    site,
                    url: url.to_string(),
                    attempts: 3,
                    cause: "connection refused".to_string(),
                });
            }

            Ok(vec![JobRecord {
                job_title: Some(format!("{} role", site)),
                ..Default::default()
            }])
        }

        async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            match &self.page_body {
                Some(body) => Ok(body.clone()),
                None => Err(ScrapeError::Timeout {
                    url: url.to_string(),
                }),
            }
        }
    }

    fn test_settings() -> Settings {
        Settings {
            api_url: "http://unused.invalid".to_string(),
            request_timeout_secs: 5,
            cache_ttl_secs: 600,
            scrape_batch_size: 1,
            sniff_no_results: false,
        }
    }

    #[tokio::test]
    async fn one_failing_site_never_blocks_the_others() {
        let scraper = StubScraper {
            fail_sites: vec![Site::Jooble],
            ..Default::default()
        };
        let aggregator = Aggregator::new(scraper, &test_settings());
        let results = aggregator
            .run_all(&SearchQuery::new("Data Analyst", "London"))
            .await;

        assert_eq!(results.len(), Site::ALL.len());

        let failed = &results[&Site::Jooble];
        assert!(failed.jobs.is_empty());
        let message = failed.error.as_deref().unwrap();
        assert!(message.contains("Jooble"));
        assert!(message.contains("connection refused"));

        for (site, result) in &results {
            if *site != Site::Jooble {
                assert_eq!(result.jobs.len(), 1);
                assert!(result.error.is_none());
            }
        }
    }

    #[tokio::test]
    async fn results_keep_board_order_in_both_modes() {
        for batch_size in [1, 2, 3] {
            let settings = Settings {
                scrape_batch_size: batch_size,
                ..test_settings()
            };
            let aggregator = Aggregator::new(StubScraper::default(), &settings);
            let results = aggregator
                .run_all(&SearchQuery::new("Data Analyst", "London"))
                .await;

            let sites: Vec<Site> = results.keys().copied().collect();
            assert_eq!(sites, Site::ALL, "order broken at batch size {}", batch_size);
        }
    }

    #[tokio::test]
    async fn missing_credential_is_reported_per_site() {
        let scraper = StubScraper {
            missing_credential: true,
            ..Default::default()
        };
        let aggregator = Aggregator::new(scraper, &test_settings());
        let results = aggregator
            .run_all(&SearchQuery::new("Data Analyst", "London"))
            .await;

        assert_eq!(results.len(), Site::ALL.len());
        for result in results.values() {
            assert!(result.jobs.is_empty());
            assert!(result
                .error
                .as_deref()
                .unwrap()
                .contains("FIRECRAWL_API_KEY"));
        }
    }

    #[tokio::test]
    async fn repeated_query_is_served_from_cache() {
        let aggregator = Aggregator::new(StubScraper::default(), &test_settings());
        let query = SearchQuery::new("Data Analyst", "London");

        let first = aggregator.run_all(&query).await;
        let second = aggregator.run_all(&query).await;

        assert_eq!(first, second);
        assert_eq!(
            aggregator.scraper.extract_calls.load(Ordering::SeqCst),
            Site::ALL.len()
        );

        aggregator
            .run_all(&SearchQuery::new("Data Analyst", "Leeds"))
            .await;
        assert_eq!(
            aggregator.scraper.extract_calls.load(Ordering::SeqCst),
            Site::ALL.len() * 2
        );
    }

    #[tokio::test]
    async fn no_results_marker_clears_extracted_records() {
        let scraper = StubScraper {
            page_body: Some("Sorry, your search did not match any jobs near you".to_string()),
            ..Default::default()
        };
        let settings = Settings {
            sniff_no_results: true,
            ..test_settings()
        };
        let aggregator = Aggregator::new(scraper, &settings);
        let results = aggregator
            .run_all(&SearchQuery::new("Data Analyst", "London"))
            .await;

        // Indeed's marker matches the fetched body; its records are dropped
        // without an error being reported.
        assert!(results[&Site::Indeed].jobs.is_empty());
        assert!(results[&Site::Indeed].error.is_none());

        // Boards without a marker are never fetched and keep their records.
        assert_eq!(results[&Site::CwJobs].jobs.len(), 1);
        assert_eq!(results[&Site::TotalJobs].jobs.len(), 1);
    }

    #[tokio::test]
    async fn failed_no_results_fetch_keeps_records() {
        let scraper = StubScraper {
            page_body: None,
            ..Default::default()
        };
        let settings = Settings {
            sniff_no_results: true,
            ..test_settings()
        };
        let aggregator = Aggregator::new(scraper, &settings);
        let results = aggregator
            .run_all(&SearchQuery::new("Data Analyst", "London"))
            .await;

        assert_eq!(results[&Site::Indeed].jobs.len(), 1);
        assert!(results[&Site::Indeed].error.is_none());
    }

    #[tokio::test]
    async fn sniffing_disabled_never_fetches_pages() {
        let scraper = StubScraper {
            page_body: Some("did not match any jobs".to_string()),
            ..Default::default()
        };
        let aggregator = Aggregator::new(scraper, &test_settings());
        let results = aggregator
            .run_all(&SearchQuery::new("Data Analyst", "London"))
            .await;

        assert_eq!(aggregator.scraper.fetch_calls.load(Ordering::SeqCst), 0);
        assert_eq!(results[&Site::Indeed].jobs.len(), 1);
    }
}
