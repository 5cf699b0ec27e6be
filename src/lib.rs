pub mod aggregator;
pub mod config;
pub mod web;

pub use aggregator::{
    build_urls, Aggregator, ExtractionClient, JobRecord, ScrapeError, Scraper, SearchQuery, Site,
    SiteResult, SiteResults,
};
pub use config::{AppConfig, Settings};
pub use web::start_web_server;
