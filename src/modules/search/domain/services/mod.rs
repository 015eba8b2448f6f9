pub mod content_filter;
pub mod keyword_tables;
pub mod query_analyzer;
pub mod relevance_scorer;
pub mod similarity;

pub use content_filter::ContentFilter;
pub use query_analyzer::{normalize_query_key, QueryAnalyzer};
pub use relevance_scorer::{sort_scored, RelevanceScorer, ScoredRecord};
pub use similarity::{is_superseding, key_similarity, string_similarity};
