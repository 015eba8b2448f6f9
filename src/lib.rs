pub mod modules;
pub mod shared;

use modules::browse::{AggregatorConfig, CategoryAggregator};
use modules::catalog::{CatalogClient, TmdbCatalogClient};
use modules::search::{SearchConfig, SearchService};
use shared::config::AppConfig;
use shared::errors::AppResult;
use std::sync::Arc;

/// Long-lived services sharing one upstream client
pub struct AppServices {
    pub search: Arc<SearchService>,
    pub browse: Arc<CategoryAggregator>,
}

impl AppServices {
    /// Wire services against any catalog client
    pub fn with_client(
        client: Arc<dyn CatalogClient>,
        search_config: SearchConfig,
        aggregator_config: AggregatorConfig,
    ) -> AppResult<Self> {
        let search = Arc::new(SearchService::new(Arc::clone(&client), search_config)?);
        let browse = Arc::new(CategoryAggregator::new(client, aggregator_config)?);
        Ok(Self { search, browse })
    }
}

/// Build the TMDB-backed services from process configuration
pub fn build_services(config: &AppConfig) -> AppResult<AppServices> {
    config.validate()?;

    let client: Arc<dyn CatalogClient> = Arc::new(TmdbCatalogClient::new(config)?);

    let search_config = SearchConfig::default()
        .with_search_pages(config.search_pages)
        .with_cache_ttl(config.search_cache_ttl);

    let services = AppServices::with_client(client, search_config, AggregatorConfig::default())?;
    log_info!(
        "Services ready (TMDB at {}, {} req/s)",
        config.tmdb_base_url,
        config.requests_per_second
    );
    Ok(services)
}
