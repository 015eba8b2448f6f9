pub mod category_aggregator;

pub use category_aggregator::{AggregatorConfig, CategoryAggregator};
