use async_trait::async_trait;

use crate::modules::catalog::domain::{entities::CatalogPage, value_objects::CategoryParams};
use crate::shared::errors::AppResult;

/// Upstream catalog interface
/// This abstracts the HTTP provider from ranking, caching and aggregation
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one page of a list/discovery endpoint
    async fn fetch_category(&self, params: &CategoryParams) -> AppResult<CatalogPage>;

    /// Fetch one page of free-text search results, adult titles included
    async fn fetch_search(&self, query: &str, page: u32) -> AppResult<CatalogPage>;
}
