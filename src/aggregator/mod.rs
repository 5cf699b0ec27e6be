// src/aggregator/mod.rs
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod cache;
pub mod client;
pub mod error;
pub mod orchestrator;
pub mod prompts;
pub mod sites;

pub use client::{ExtractionClient, Scraper};
pub use error::ScrapeError;
pub use orchestrator::Aggregator;
pub use sites::{build_urls, Site};

/// One search as entered by the caller. Both fields are free-form text,
/// trimmed of surrounding whitespace here and nowhere else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    pub job_title: String,
    pub location: String,
}

impl SearchQuery {
    pub fn new(job_title: &str, location: &str) -> Self {
        Self {
            job_title: job_title.trim().to_string(),
            location: location.trim().to_string(),
        }
    }
}

/// A single extracted listing. The shape is whatever the extraction API
/// returned: every field is optional and unrecognized fields are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
}

/// Per-board outcome of one search. `jobs` is empty when `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteResult {
    pub url: String,
    pub jobs: Vec<JobRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// All per-board outcomes, keyed in `Site` declaration order.
pub type SiteResults = IndexMap<Site, SiteResult>;
