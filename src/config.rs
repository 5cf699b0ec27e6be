// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything the process needs, resolved once at startup. The extraction
/// API credential lives here and nowhere else; nothing reads the
/// environment after boot.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub scrape_batch_size: usize,
    pub sniff_no_results: bool,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: Settings,
    production: Settings,
}

impl AppConfig {
    /// Load configuration for the current environment.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let api_key = std::env::var("FIRECRAWL_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            warn!("FIRECRAWL_API_KEY is not set; every search will report a credential error");
        }

        Ok(Self {
            api_key,
            settings: Settings::load_from_file(&environment)?,
        })
    }

    fn get_environment() -> String {
        std::env::var("JOBSCOUT_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }
}

impl Settings {
    fn load_from_file(environment: &str) -> Result<Self> {
        let config_path = PathBuf::from("config.yaml");
        if !config_path.exists() {
            anyhow::bail!("config.yaml not found in current directory. Server cannot start without configuration.");
        }

        let config_content =
            std::fs::read_to_string(&config_path).context("Failed to read config.yaml")?;

        let config_file: ConfigFile =
            serde_yaml::from_str(&config_content).context("Failed to parse config.yaml")?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }
}
