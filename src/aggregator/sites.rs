// src/aggregator/sites.rs
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::SearchQuery;

/// The supported job boards, in the order results are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Site {
    Adzuna,
    #[serde(rename = "CWJobs")]
    CwJobs,
    TotalJobs,
    Jooble,
    Indeed,
    Reed,
    #[serde(rename = "CVLibrary")]
    CvLibrary,
}

impl Site {
    pub const ALL: [Site; 7] = [
        Site::Adzuna,
        Site::CwJobs,
        Site::TotalJobs,
        Site::Jooble,
        Site::Indeed,
        Site::Reed,
        Site::CvLibrary,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Site::Adzuna => "Adzuna",
            Site::CwJobs => "CWJobs",
            Site::TotalJobs => "TotalJobs",
            Site::Jooble => "Jooble",
            Site::Indeed => "Indeed",
            Site::Reed => "Reed",
            Site::CvLibrary => "CVLibrary",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Build one search-result URL per board. Infallible: every board gets a
/// syntactically valid URL even for empty input.
///
/// Two encodings, never mixed up: query-string parameters are
/// form-urlencoded, path segments use a lowercase hyphen slug.
pub fn build_urls(query: &SearchQuery) -> IndexMap<Site, String> {
    let q_job = query_encode(&query.job_title);
    let q_loc = query_encode(&query.location);

    let job_slug = slug(&query.job_title);
    let loc_slug = slug(&query.location);

    IndexMap::from([
        (
            Site::Adzuna,
            format!(
                "https://www.adzuna.co.uk/jobs/search?q={}&w={}",
                q_job, q_loc
            ),
        ),
        (
            Site::CwJobs,
            format!(
                "https://www.cwjobs.co.uk/jobs/{}/in-{}?radius=10&searchOrigin=Resultlist_top-search",
                job_slug, loc_slug
            ),
        ),
        (
            Site::TotalJobs,
            format!(
                "https://www.totaljobs.com/jobs/{}/in-{}?radius=10&searchOrigin=Resultlist_top-search",
                job_slug, loc_slug
            ),
        ),
        (
            Site::Jooble,
            format!(
                "https://uk.jooble.org/SearchResult?rgns={}&ukw={}",
                q_loc, q_job
            ),
        ),
        (
            Site::Indeed,
            format!("https://uk.indeed.com/jobs?q={}&l={}", q_job, q_loc),
        ),
        (
            Site::Reed,
            format!("https://www.reed.co.uk/jobs/{}-jobs-in-{}", job_slug, loc_slug),
        ),
        (
            Site::CvLibrary,
            format!("https://www.cv-library.co.uk/{}-jobs-in-{}", job_slug, loc_slug),
        ),
    ])
}

/// Literal "no results" copy per board, scanned in the raw page body by the
/// optional post-extraction check. Tracks third-party page copy and breaks
/// silently when that copy changes.
pub fn no_results_marker(site: Site) -> Option<&'static str> {
    match site {
        Site::Indeed => Some("did not match any jobs"),
        Site::Reed => Some("We couldn't find any jobs matching"),
        Site::Adzuna => Some("We don't have any jobs for this search"),
        _ => None,
    }
}

/// Form-urlencode text for query-string parameters (space becomes `+`,
/// reserved characters are percent-escaped).
fn query_encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Lowercase hyphen slug for path segments. Anything outside `[a-z0-9]`
/// separates words, so runs of whitespace or punctuation collapse to a
/// single hyphen and reserved characters can never corrupt a path.
fn slug(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
