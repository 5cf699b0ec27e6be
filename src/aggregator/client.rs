// src/aggregator/client.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use super::error::ScrapeError;
use super::sites::Site;
use super::JobRecord;
use crate::config::Settings;

/// Most listings a single board contributes to one search.
pub const MAX_JOBS_PER_SITE: usize = 10;

const MAX_ATTEMPTS: u32 = 3;
const TIMEOUT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Outbound side of a search, as the orchestrator sees it.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Extract job listings from a search-results page.
    async fn extract_jobs(
        &self,
        site: Site,
        url: &str,
        prompt: &str,
    ) -> Result<Vec<JobRecord>, ScrapeError>;

    /// Fetch a page body verbatim, with no extraction.
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Firecrawl-backed implementation. Holds the credential resolved once at
/// startup; nothing here reads the environment.
pub struct ExtractionClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'a str; 1],
    extract: ExtractSpec<'a>,
}

#[derive(Serialize)]
struct ExtractSpec<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    data: Option<ScrapeData>,
}

#[derive(Deserialize)]
struct ScrapeData {
    #[serde(default)]
    extract: Option<serde_json::Value>,
}

/// The `extract` field arrives in one of several shapes depending on the
/// API version: a record list, or a wrapper object nesting another
/// `extract`. Anything else degrades to no records rather than an error.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExtractPayload {
    Records(Vec<JobRecord>),
    Wrapped { extract: Box<ExtractPayload> },
    Other(serde_json::Value),
}

fn normalize_extract(value: Option<serde_json::Value>) -> Vec<JobRecord> {
    fn unwrap_payload(payload: ExtractPayload) -> Vec<JobRecord> {
        match payload {
            ExtractPayload::Records(records) => records,
            ExtractPayload::Wrapped { extract } => unwrap_payload(*extract),
            ExtractPayload::Other(_) => Vec::new(),
        }
    }

    match value {
        Some(value) => serde_json::from_value::<ExtractPayload>(value)
            .map(unwrap_payload)
            .unwrap_or_default(),
        None => Vec::new(),
    }
}

fn classify_request_error(url: &str, e: reqwest::Error) -> ScrapeError {
    if e.is_timeout() {
        ScrapeError::Timeout {
            url: url.to_string(),
        }
    } else {
        ScrapeError::Http(e)
    }
}

/// Run `op` up to three times. A timed-out attempt sleeps a fixed 2 s
/// before the next one; any other failure retries immediately. The last
/// failure is wrapped with the site and URL once attempts are exhausted.
async fn with_retries<T, F, Fut>(site: Site, url: &str, mut op: F) -> Result<T, ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScrapeError>>,
{
    let mut last_error: Option<ScrapeError> = None;

    for attempt in 1..=MAX_ATTEMPTS {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!("{}: attempt {}/{} failed: {}", site, attempt, MAX_ATTEMPTS, e);
                let timed_out = e.is_timeout();
                last_error = Some(e);
                if timed_out && attempt < MAX_ATTEMPTS {
                    tokio::time::sleep(TIMEOUT_RETRY_DELAY).await;
                }
            }
        }
    }

    Err(ScrapeError::Extraction {
        site,
        url: url.to_string(),
        attempts: MAX_ATTEMPTS,
        cause: last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown failure".to_string()),
    })
}

impl ExtractionClient {
    pub fn new(api_key: Option<String>, settings: &Settings) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    async fn attempt(
        &self,
        key: &str,
        url: &str,
        prompt: &str,
    ) -> Result<Vec<JobRecord>, ScrapeError> {
        let request = ScrapeRequest {
            url,
            formats: ["extract"],
            extract: ExtractSpec { prompt },
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", key))
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ScrapeError::Api { status, body });
        }

        let parsed: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| classify_request_error(url, e))?;
        let mut jobs = normalize_extract(parsed.data.and_then(|d| d.extract));
        jobs.truncate(MAX_JOBS_PER_SITE);
        Ok(jobs)
    }
}

#[async_trait]
impl Scraper for ExtractionClient {
    async fn extract_jobs(
        &self,
        site: Site,
        url: &str,
        prompt: &str,
    ) -> Result<Vec<JobRecord>, ScrapeError> {
        let key = self.api_key.as_deref().ok_or(ScrapeError::MissingCredential)?;

        let jobs = with_retries(site, url, || self.attempt(key, url, prompt)).await?;
        info!("{}: extracted {} records", site, jobs.len());
        Ok(jobs)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        response
            .text()
            .await
            .map_err(|e| classify_request_error(url, e))
    }
}
