mod adapter;

pub use adapter::TmdbCatalogClient;
