use crate::modules::catalog::{
    CatalogClient, CatalogRecord, CategorizedResult, CategoryEndpoint, CategoryParams,
    CategoryRequest,
};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::TimedOperation;
use crate::shared::utils::retry::{RetryPolicy, RetryUtil};
use crate::{log_debug, log_warn};
use std::collections::HashSet;
use std::sync::Arc;

/// Endpoints whose payload omits or mis-tags `media_type`; trending tags per record
pub fn default_media_type_override() -> HashSet<CategoryEndpoint> {
    [
        CategoryEndpoint::Discover,
        CategoryEndpoint::Popular,
        CategoryEndpoint::TopRated,
        CategoryEndpoint::NowPlaying,
        CategoryEndpoint::Upcoming,
        CategoryEndpoint::AiringToday,
        CategoryEndpoint::OnTheAir,
    ]
    .into_iter()
    .collect()
}

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Requests in flight at once; a batch fully settles before the next starts
    pub batch_size: usize,
    pub retry: RetryPolicy,
    /// Endpoints whose records get the request's declared media type
    pub media_type_override: HashSet<CategoryEndpoint>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            batch_size: 4,
            retry: RetryPolicy::default(),
            media_type_override: default_media_type_override(),
        }
    }
}

impl AggregatorConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_media_type_override(mut self, endpoints: HashSet<CategoryEndpoint>) -> Self {
        self.media_type_override = endpoints;
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.batch_size == 0 {
            return Err(AppError::ConfigError(
                "Aggregator batch size must be > 0".to_string(),
            ));
        }
        self.retry.validate()
    }
}

/// Fetches browsing shelves from the upstream catalog.
///
/// Output always has one entry per request, in request order. A request that
/// fails after retries yields an empty shelf instead of an error.
pub struct CategoryAggregator {
    client: Arc<dyn CatalogClient>,
    config: AggregatorConfig,
}

impl CategoryAggregator {
    pub fn new(client: Arc<dyn CatalogClient>, config: AggregatorConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub async fn get_categorized_shows(&self, requests: &[CategoryRequest]) -> Vec<CategorizedResult> {
        let timer = TimedOperation::new(&format!("{} category requests", requests.len()));
        let mut shelves = Vec::with_capacity(requests.len());

        for (batch_index, batch) in requests.chunks(self.config.batch_size).enumerate() {
            log_debug!(
                "Fetching category batch {} ({} requests)",
                batch_index + 1,
                batch.len()
            );

            let batch_futures = batch.iter().map(|request| self.fetch_shelf(request));

            // join_all keeps input order regardless of completion order
            shelves.extend(futures::future::join_all(batch_futures).await);
        }

        let empty = shelves.iter().filter(|shelf| shelf.shows.is_empty()).count();
        timer.finish_with_info(&format!("{} shelves, {} empty", shelves.len(), empty));

        shelves
    }

    async fn fetch_shelf(&self, request: &CategoryRequest) -> CategorizedResult {
        let operation_name = format!("category '{}'", request.label);
        let result = RetryUtil::with_retry(
            || self.client.fetch_category(&request.params),
            &self.config.retry,
            &operation_name,
        )
        .await;

        match result {
            Ok(page) => {
                let mut shows = page.results;
                self.apply_media_type_override(&request.params, &mut shows);
                CategorizedResult {
                    title: request.label.clone(),
                    shows,
                    visible: request.visible,
                }
            }
            Err(error) => {
                log_warn!(
                    "Category '{}' failed for {}: {}",
                    request.label,
                    request.params,
                    error
                );
                CategorizedResult::empty(request)
            }
        }
    }

    fn apply_media_type_override(
        &self,
        params: &CategoryParams,
        shows: &mut [CatalogRecord],
    ) {
        if !self.config.media_type_override.contains(&params.endpoint) {
            return;
        }
        let Some(media_type) = params.media_type else {
            return;
        };
        for show in shows.iter_mut() {
            show.media_type = Some(media_type);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AggregatorConfig::default();
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.retry, RetryPolicy::default());
        assert!(config.media_type_override.contains(&CategoryEndpoint::Discover));
        assert!(!config.media_type_override.contains(&CategoryEndpoint::Trending));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let config = AggregatorConfig::default().with_batch_size(0);
        assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));
    }
}
