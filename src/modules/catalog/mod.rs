pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use domain::{
    CatalogClient, CatalogPage, CatalogRecord, CategorizedResult, CategoryEndpoint,
    CategoryParams, CategoryRequest, MediaType, TimeWindow,
};
pub use infrastructure::TmdbCatalogClient;
