// src/aggregator/error.rs
use super::sites::Site;

/// Failures raised by the extraction client.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The outbound API credential was never configured. Raised before any
    /// network I/O and never retried.
    #[error("FIRECRAWL_API_KEY is not configured")]
    MissingCredential,

    /// A single request attempt timed out. Internal to the retry loop.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("extraction API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("extraction API returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// Every attempt failed; carries the last underlying cause.
    #[error("{site} extraction failed after {attempts} attempts for {url}: {cause}")]
    Extraction {
        site: Site,
        url: String,
        attempts: u32,
        cause: String,
    },
}

impl ScrapeError {
    /// Timeouts get a fixed pause before the next attempt; everything else
    /// retries immediately.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ScrapeError::Timeout { .. })
    }
}
