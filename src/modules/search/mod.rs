pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use application::{SearchConfig, SearchHandle, SearchResponse, SearchService, SearchStatus};
pub use domain::{ContentFilter, QueryAnalyzer, QueryIntent, RelevanceScorer, ScoredRecord};
pub use infrastructure::{CacheStats, RequestCoordinator, ResultCache};
