pub mod service;

pub use service::{
    discover_params, SearchConfig, SearchHandle, SearchResponse, SearchService, SearchStatus,
};
