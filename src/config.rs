use serde::Deserialize;

use crate::error::CatalogError;
use crate::models::FeatureColumn;
use crate::services::catalog::CleaningOptions;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Location of the catalog CSV
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of titles returned when a request does not ask for a count
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Columns stripped of IQR outliers at load time, in order
    /// (comma separated, e.g. `duration,release_year`)
    #[serde(default)]
    pub outlier_columns: Vec<String>,
}

fn default_catalog_path() -> String {
    "data/titles.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_recommendation_count() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.recommendation_count == 0 {
            anyhow::bail!("RECOMMENDATION_COUNT must be at least 1");
        }

        Ok(config)
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Cleaning options derived from the outlier column list
    pub fn cleaning_options(&self) -> Result<CleaningOptions, CatalogError> {
        let outlier_columns = self
            .outlier_columns
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| name.parse::<FeatureColumn>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CleaningOptions { outlier_columns })
    }
}
