/// Test helper functions and service builders
use reelshelf::shared::utils::retry::RetryPolicy;
use std::time::Duration;

/// Same shape as the production policy with millisecond backoff
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::default()
        .with_base_delay(Duration::from_millis(1))
        .with_max_delay(Duration::from_millis(4))
}

/// Poll `condition` until it holds, failing the test after two seconds
pub async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached within 2s"
        );
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}
