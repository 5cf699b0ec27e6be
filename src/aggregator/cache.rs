// src/aggregator/cache.rs
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{SearchQuery, SiteResults};

/// In-memory pull-through cache for whole search runs, keyed by the exact
/// trimmed (job title, location) pair. Expiry is checked on read; a zero
/// TTL disables caching entirely.
pub struct SearchCache {
    ttl: Duration,
    entries: Mutex<HashMap<(String, String), CacheEntry>>,
}

struct CacheEntry {
    results: SiteResults,
    stored_at: Instant,
}

impl SearchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, query: &SearchQuery) -> Option<SiteResults> {
        let key = key(query);
        let mut entries = self.entries.lock().await;

        if let Some(entry) = entries.get(&key) {
            if entry.stored_at.elapsed() < self.ttl {
                return Some(entry.results.clone());
            }
            entries.remove(&key);
        }
        None
    }

    pub async fn store(&self, query: &SearchQuery, results: SiteResults) {
        if self.ttl.is_zero() {
            return;
        }

        self.entries.lock().await.insert(
            key(query),
            CacheEntry {
                results,
                stored_at: Instant::now(),
            },
        );
    }
}

fn key(query: &SearchQuery) -> (String, String) {
    (query.job_title.clone(), query.location.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{Site, SiteResult};

    fn sample_results(marker: &str) -> SiteResults {
        SiteResults::from([(
            Site::Indeed,
            SiteResult {
                url: format!("https://uk.indeed.com/jobs?q={}", marker),
                jobs: Vec::new(),
                error: None,
            },
        )])
    }

    #[tokio::test]
    async fn returns_what_was_stored_for_the_same_query() {
        let cache = SearchCache::new(Duration::from_secs(600));
        let query = SearchQuery::new("Data Analyst", "London");

        cache.store(&query, sample_results("a")).await;
        assert_eq!(cache.get(&query).await, Some(sample_results("a")));
    }

    #[tokio::test]
    async fn distinct_queries_never_share_entries() {
        let cache = SearchCache::new(Duration::from_secs(600));
        let london = SearchQuery::new("Data Analyst", "London");
        let leeds = SearchQuery::new("Data Analyst", "Leeds");

        cache.store(&london, sample_results("london")).await;

        assert!(cache.get(&leeds).await.is_none());
        assert_eq!(cache.get(&london).await, Some(sample_results("london")));
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_the_ttl() {
        let cache = SearchCache::new(Duration::from_secs(600));
        let query = SearchQuery::new("Data Analyst", "London");

        cache.store(&query, sample_results("a")).await;
        tokio::time::advance(Duration::from_secs(599)).await;
        assert!(cache.get(&query).await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get(&query).await.is_none());
    }

    #[tokio::test]
    async fn zero_ttl_disables_caching() {
        let cache = SearchCache::new(Duration::ZERO);
        let query = SearchQuery::new("Data Analyst", "London");

        cache.store(&query, sample_results("a")).await;
        assert!(cache.get(&query).await.is_none());
    }
}
