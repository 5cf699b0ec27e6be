// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use types::*;

use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Request, Response, State};
use tracing::info;

use crate::aggregator::{Aggregator, ExtractionClient};
use crate::config::AppConfig;
use handlers::SharedAggregator;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/search", data = "<request>")]
pub async fn search(
    request: Json<SearchRequest>,
    aggregator: &State<SharedAggregator>,
) -> Json<DataResponse<SearchData>> {
    handlers::search_handler(request, aggregator).await
}

#[get("/sites")]
pub async fn sites() -> Json<DataResponse<Vec<&'static str>>> {
    handlers::sites_handler().await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify job_title and location are present".to_string(),
        ],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

// Main server start function
pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let client = ExtractionClient::new(config.api_key.clone(), &config.settings)?;
    let aggregator = Aggregator::new(client, &config.settings);

    info!("Starting job board aggregator API server");
    info!("Extraction API: {}", config.settings.api_url);

    let _rocket = rocket::build()
        .attach(Cors)
        .manage(aggregator)
        .register("/api", catchers![bad_request, internal_error])
        .mount("/api", routes![search, sites, health, options])
        .launch()
        .await?;

    Ok(())
}
