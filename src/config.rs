use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub enrichment: EnrichmentConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrichmentConfig {
    /// Row fields scanned for external URLs, in priority order.
    pub field_priority: Vec<String>,
    pub max_urls_per_row: usize,
    pub exclude_low_value_domains: bool,
    pub timeout_seconds: u64,
    pub max_pages_per_crawl: usize,
    pub crawl_enabled: bool,
    /// Process only the first N rows (debug). 0 = all.
    pub limit_rows: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub progress_interval: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
    pub pretty_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enrichment: EnrichmentConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                progress_interval: 10,
            },
            output: OutputConfig {
                directory: "out".to_string(),
                pretty_json: true,
            },
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            field_priority: vec![
                "bio_links".to_string(),
                "bio_text".to_string(),
                "description".to_string(),
            ],
            max_urls_per_row: 2,
            exclude_low_value_domains: true,
            timeout_seconds: 10,
            max_pages_per_crawl: 3,
            crawl_enabled: true,
            limit_rows: 0,
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}
