use anyhow::Result;
use job_aggregator::config::AppConfig;
use job_aggregator::start_web_server;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("job_aggregator=info,jobscout=info,rocket::server=off")),
        )
        .init();

    let config = AppConfig::load()?;

    tracing::info!("Starting multi-board job search aggregator");
    tracing::info!(
        "Cache TTL: {}s, scrape batch size: {}",
        config.settings.cache_ttl_secs,
        config.settings.scrape_batch_size
    );

    start_web_server(config).await
}
