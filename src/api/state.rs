use std::sync::Arc;

use crate::{config::Config, error::AppResult, services::catalog::Catalog};

/// Shared application state
///
/// The catalog is loaded once at startup and never mutated afterwards, so
/// handlers read it without locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// Sorted distinct ratings, cached for the selector
    pub ratings: Arc<Vec<String>>,
    /// Result count used when a request does not specify one
    pub recommendation_count: usize,
}

impl AppState {
    pub fn new(catalog: Catalog, recommendation_count: usize) -> Self {
        let ratings = catalog.ratings();
        Self {
            catalog: Arc::new(catalog),
            ratings: Arc::new(ratings),
            recommendation_count,
        }
    }

    /// Loads and cleans the configured catalog
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let options = config.cleaning_options()?;
        let catalog = Catalog::from_path(&config.catalog_path, &options)?;
        Ok(Self::new(catalog, config.recommendation_count))
    }
}
