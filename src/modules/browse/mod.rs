pub mod application;
pub mod domain;

pub use application::{AggregatorConfig, CategoryAggregator};
pub use domain::home_page_requests;
