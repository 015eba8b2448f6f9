pub mod logger;
pub mod retry;

pub use retry::{RetryPolicy, RetryUtil};
