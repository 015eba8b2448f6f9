pub mod cache;
pub mod coordinator;

pub use cache::{CacheStats, ResultCache};
pub use coordinator::{RequestCoordinator, SearchTicket};
