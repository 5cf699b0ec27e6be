// src/web/handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use super::types::{DataResponse, SearchData, SearchRequest, TextResponse};
use crate::aggregator::{Aggregator, ExtractionClient, SearchQuery, Site};

/// The concrete aggregator managed as Rocket state.
pub type SharedAggregator = Aggregator<ExtractionClient>;

pub async fn search_handler(
    request: Json<SearchRequest>,
    aggregator: &State<SharedAggregator>,
) -> Json<DataResponse<SearchData>> {
    let query = SearchQuery::new(&request.job_title, &request.location);

    let results = aggregator.run_all(&query).await;
    let total_jobs: usize = results.values().map(|result| result.jobs.len()).sum();
    let failed = results.values().filter(|result| result.error.is_some()).count();

    info!(
        "search for '{}' in '{}' finished: {} jobs, {} boards failed",
        query.job_title, query.location, total_jobs, failed
    );

    Json(DataResponse::success(
        format!("Found {} jobs across {} boards", total_jobs, results.len()),
        SearchData {
            job_title: query.job_title,
            location: query.location,
            total_jobs,
            searched_at: chrono::Utc::now(),
            results,
        },
    ))
}

pub async fn sites_handler() -> Json<DataResponse<Vec<&'static str>>> {
    Json(DataResponse::success(
        "Supported job boards".to_string(),
        Site::ALL.iter().map(|site| site.label()).collect(),
    ))
}

pub async fn health_handler() -> Json<TextResponse> {
    Json(TextResponse::success("Job board aggregator is running".to_string()))
}
